//! Create accounts table migration

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::FirstName).string_len(50).not_null())
                    .col(ColumnDef::new(Accounts::LastName).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Accounts::Email)
                            .string_len(50)
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Accounts::Phone)
                            .string_len(15)
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Accounts::BirthDate).date().null())
                    .col(
                        ColumnDef::new(Accounts::Gender)
                            .string_len(20)
                            .not_null()
                            .default("unspecified"),
                    )
                    .col(
                        ColumnDef::new(Accounts::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Accounts::SecurityQuestion).string_len(50).null())
                    .col(ColumnDef::new(Accounts::SecurityAnswer).string_len(40).null())
                    .col(ColumnDef::new(Accounts::PasswordHash).text().not_null())
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Contact lookups hit email or phone
        manager
            .create_index(
                Index::create()
                    .name("idx_accounts_email")
                    .table(Accounts::Table)
                    .col(Accounts::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_accounts_phone")
                    .table(Accounts::Table)
                    .col(Accounts::Phone)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Accounts {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    BirthDate,
    Gender,
    IsActive,
    SecurityQuestion,
    SecurityAnswer,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}
