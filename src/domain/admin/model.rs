use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Administrative role. Privileged operations gate on an exact level
/// match; the derive order keeps `Reader < LimitedWriter < SuperAdmin`
/// should a hierarchy check ever be wanted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum AdminLevel {
    Reader,
    LimitedWriter,
    SuperAdmin,
}

impl Default for AdminLevel {
    fn default() -> Self {
        Self::Reader
    }
}

/// A stored administrative account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub level: AdminLevel,
    /// Device identifiers this admin has marked as trusted
    pub trusted_devices: Vec<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a new admin row
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub level: AdminLevel,
    pub trusted_devices: Vec<String>,
    pub password_hash: String,
}
