//! Create admins table migration

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Admins::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Admins::FirstName).string_len(50).not_null())
                    .col(ColumnDef::new(Admins::LastName).string_len(50).not_null())
                    .col(ColumnDef::new(Admins::Email).string_len(50).not_null())
                    .col(ColumnDef::new(Admins::Phone).string_len(15).not_null())
                    .col(
                        ColumnDef::new(Admins::Username)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Admins::Level)
                            .string_len(20)
                            .not_null()
                            .default("reader"),
                    )
                    .col(
                        ColumnDef::new(Admins::TrustedDevices)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Admins::PasswordHash).text().not_null())
                    .col(
                        ColumnDef::new(Admins::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Admins::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_admins_username")
                    .table(Admins::Table)
                    .col(Admins::Username)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Admins {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    Username,
    Level,
    TrustedDevices,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}
