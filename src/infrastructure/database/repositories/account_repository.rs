use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::{query_err, Account, AccountRepository, Gender, NewAccount, ServiceError, ServiceResult};
use crate::infrastructure::database::entities::account;

pub struct SeaOrmAccountRepository {
    db: DatabaseConnection,
}

impl SeaOrmAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_gender_to_domain(gender: account::Gender) -> Gender {
    match gender {
        account::Gender::Male => Gender::Male,
        account::Gender::Female => Gender::Female,
        account::Gender::Unspecified => Gender::Unspecified,
    }
}

fn domain_gender_to_entity(gender: Gender) -> account::Gender {
    match gender {
        Gender::Male => account::Gender::Male,
        Gender::Female => account::Gender::Female,
        Gender::Unspecified => account::Gender::Unspecified,
    }
}

pub(crate) fn account_model_to_domain(model: account::Model) -> Account {
    Account {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        phone: model.phone,
        birth_date: model.birth_date,
        gender: entity_gender_to_domain(model.gender),
        is_active: model.is_active,
        security_question: model.security_question,
        security_answer: model.security_answer,
        password_hash: model.password_hash,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn is_unique_violation(e: &sea_orm::DbErr) -> bool {
    let msg = e.to_string();
    msg.contains("UNIQUE") || msg.contains("duplicate")
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    async fn insert(&self, new: NewAccount) -> ServiceResult<()> {
        let now = Utc::now();

        let row = account::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            email: Set(new.email),
            phone: Set(new.phone),
            birth_date: Set(new.birth_date),
            gender: Set(domain_gender_to_entity(new.gender)),
            is_active: Set(true),
            security_question: Set(new.security_question),
            security_answer: Set(new.security_answer),
            password_hash: Set(new.password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        };

        row.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                ServiceError::AccountExists
            } else {
                query_err("CreateUser (INSERT)")(e)
            }
        })?;

        Ok(())
    }

    async fn find_by_contact(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> ServiceResult<Option<Account>> {
        if email.is_none() && phone.is_none() {
            return Ok(None);
        }

        let model = account::Entity::find()
            .filter(
                Condition::any()
                    .add_option(email.map(|e| account::Column::Email.eq(e)))
                    .add_option(phone.map(|p| account::Column::Phone.eq(p))),
            )
            .one(&self.db)
            .await
            .map_err(query_err("GetProfile (SELECT)"))?;

        Ok(model.map(account_model_to_domain))
    }

    async fn page_after(&self, after_id: Option<&str>, limit: u64) -> ServiceResult<Vec<Account>> {
        let mut query = account::Entity::find()
            .order_by_asc(account::Column::Id)
            .limit(limit);

        if let Some(after) = after_id {
            query = query.filter(account::Column::Id.gt(after));
        }

        let models = query
            .all(&self.db)
            .await
            .map_err(query_err("ListUsers (SELECT)"))?;

        Ok(models.into_iter().map(account_model_to_domain).collect())
    }
}
