//! Admin entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Admin role stored on the row
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum AdminLevel {
    #[sea_orm(string_value = "reader")]
    Reader,
    #[sea_orm(string_value = "limited_writer")]
    LimitedWriter,
    #[sea_orm(string_value = "super_admin")]
    SuperAdmin,
}

impl Default for AdminLevel {
    fn default() -> Self {
        Self::Reader
    }
}

/// Admin model. `trusted_devices` holds a JSON-encoded string list.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[sea_orm(unique)]
    pub username: String,
    pub level: AdminLevel,
    #[sea_orm(column_type = "Text")]
    pub trusted_devices: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
