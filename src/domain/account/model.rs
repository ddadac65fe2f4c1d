use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Gender stored on an account profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Unspecified,
}

impl Default for Gender {
    fn default() -> Self {
        Self::Unspecified
    }
}

/// A stored user account. `password_hash` never leaves the service;
/// it is empty for accounts registered through a federated provider,
/// which makes password login impossible for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Gender,
    /// Status flag: inactive accounts exist but may not authenticate
    pub is_active: bool,
    pub security_question: Option<String>,
    pub security_answer: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a new account row
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Gender,
    pub security_question: Option<String>,
    pub security_answer: Option<String>,
    pub password_hash: String,
}
