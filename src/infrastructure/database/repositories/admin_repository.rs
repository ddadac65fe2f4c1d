use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set,
};

use crate::domain::{query_err, Admin, AdminLevel, AdminRepository, NewAdmin, ServiceError, ServiceResult};
use crate::infrastructure::database::entities::admin;

pub struct SeaOrmAdminRepository {
    db: DatabaseConnection,
}

impl SeaOrmAdminRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_level_to_domain(level: admin::AdminLevel) -> AdminLevel {
    match level {
        admin::AdminLevel::Reader => AdminLevel::Reader,
        admin::AdminLevel::LimitedWriter => AdminLevel::LimitedWriter,
        admin::AdminLevel::SuperAdmin => AdminLevel::SuperAdmin,
    }
}

fn domain_level_to_entity(level: AdminLevel) -> admin::AdminLevel {
    match level {
        AdminLevel::Reader => admin::AdminLevel::Reader,
        AdminLevel::LimitedWriter => admin::AdminLevel::LimitedWriter,
        AdminLevel::SuperAdmin => admin::AdminLevel::SuperAdmin,
    }
}

/// The trusted-device list is stored JSON-encoded in a TEXT column.
fn decode_trusted_devices(raw: &str) -> ServiceResult<Vec<String>> {
    serde_json::from_str(raw).map_err(|e| ServiceError::Serialization {
        what: "Admin.TrustedDevices",
        source: e,
    })
}

fn encode_trusted_devices(devices: &[String]) -> ServiceResult<String> {
    serde_json::to_string(devices).map_err(|e| ServiceError::Serialization {
        what: "Admin.TrustedDevices",
        source: e,
    })
}

pub(crate) fn admin_model_to_domain(model: admin::Model) -> ServiceResult<Admin> {
    let trusted_devices = decode_trusted_devices(&model.trusted_devices)?;
    Ok(Admin {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        phone: model.phone,
        username: model.username,
        level: entity_level_to_domain(model.level),
        trusted_devices,
        password_hash: model.password_hash,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn is_unique_violation(e: &sea_orm::DbErr) -> bool {
    let msg = e.to_string();
    msg.contains("UNIQUE") || msg.contains("duplicate")
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl AdminRepository for SeaOrmAdminRepository {
    async fn insert(&self, new: NewAdmin) -> ServiceResult<()> {
        let now = Utc::now();
        let trusted_devices = encode_trusted_devices(&new.trusted_devices)?;

        let row = admin::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            email: Set(new.email),
            phone: Set(new.phone),
            username: Set(new.username),
            level: Set(domain_level_to_entity(new.level)),
            trusted_devices: Set(trusted_devices),
            password_hash: Set(new.password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        };

        row.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                ServiceError::AccountExists
            } else {
                query_err("CreateAdmin (INSERT)")(e)
            }
        })?;

        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> ServiceResult<Option<Admin>> {
        let model = admin::Entity::find()
            .filter(admin::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_err("GetAdmin (SELECT)"))?;

        model.map(admin_model_to_domain).transpose()
    }

    async fn level_of(&self, username: &str) -> ServiceResult<Option<AdminLevel>> {
        // Role-only projection; the authorization check needs nothing else
        let model = admin::Entity::find()
            .filter(admin::Column::Username.eq(username))
            .select_only()
            .column(admin::Column::Level)
            .into_tuple::<admin::AdminLevel>()
            .one(&self.db)
            .await
            .map_err(query_err("CheckAdminLevel (SELECT)"))?;

        Ok(model.map(entity_level_to_domain))
    }
}
