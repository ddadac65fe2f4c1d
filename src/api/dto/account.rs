//! Account request/response DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use super::{require, require_either};
use crate::domain::{Account, Gender, ServiceResult};

/// Registration request for an ordinary account
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "first_name": "A",
    "last_name": "B",
    "email": "a@x.com",
    "password": "long-enough-secret"
}))]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    /// Email address; this or `phone` must be present
    #[validate(email)]
    pub email: Option<String>,
    /// Phone number; this or `email` must be present
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Gender,
    pub security_question: Option<String>,
    pub security_answer: Option<String>,
    /// Absent for accounts registered through a federated provider;
    /// such accounts cannot use password login
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
}

impl CreateAccountRequest {
    pub fn check_credentials(&self) -> ServiceResult<()> {
        require_either(
            "email address or phone number",
            self.email.as_deref(),
            self.phone.as_deref(),
        )?;
        require("first name", &self.first_name)?;
        require("last name", &self.last_name)?;
        Ok(())
    }
}

/// Identity provider for federated logins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FederatedProvider {
    Facebook,
    Google,
}

/// Login credential. The variant is explicit in the payload via
/// `method`; adding a provider is a compile-checked change because every
/// consumer matches exhaustively.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum LoginRequest {
    /// Phone + password login
    Phone { phone: String, password: String },
    /// Login via an identity already verified by a federated provider
    Federated {
        provider: FederatedProvider,
        #[serde(default)]
        email: Option<String>,
        #[serde(default)]
        phone: Option<String>,
    },
}

impl LoginRequest {
    pub fn check_credentials(&self) -> ServiceResult<()> {
        match self {
            Self::Phone { phone, password } => {
                require("phone", phone)?;
                require("password", password)?;
                Ok(())
            }
            Self::Federated { email, phone, .. } => require_either(
                "email address or phone number",
                email.as_deref(),
                phone.as_deref(),
            ),
        }
    }

    /// Contact pair used for the account lookup
    pub fn contact(&self) -> (Option<&str>, Option<&str>) {
        match self {
            Self::Phone { phone, .. } => (None, Some(phone.as_str())),
            Self::Federated { email, phone, .. } => (email.as_deref(), phone.as_deref()),
        }
    }
}

/// Lookup key for profile retrieval and credential checks
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ContactQuery {
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactQuery {
    pub fn check_credentials(&self) -> ServiceResult<()> {
        require_either(
            "email address or phone number",
            self.email.as_deref(),
            self.phone.as_deref(),
        )
    }
}

/// Public profile view; never carries the hashed secret or the
/// security answer
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileView {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Gender,
}

impl ProfileView {
    pub fn from_account(account: &Account) -> Self {
        Self {
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            phone: account.phone.clone(),
            birth_date: account.birth_date,
            gender: account.gender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> CreateAccountRequest {
        CreateAccountRequest {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: Some("a@x.com".to_string()),
            phone: None,
            birth_date: None,
            gender: Gender::Unspecified,
            security_question: None,
            security_answer: None,
            password: Some("p1p1p1p1".to_string()),
        }
    }

    #[test]
    fn test_create_requires_some_contact() {
        let mut req = full_request();
        req.email = None;
        req.phone = None;
        let err = req.check_credentials().unwrap_err();
        assert_eq!(err.kind(), "MISSING_CREDENTIAL");
        assert!(err.to_string().contains("email address or phone number"));
    }

    #[test]
    fn test_create_accepts_either_contact() {
        let mut req = full_request();
        req.email = None;
        req.phone = Some("0700000000".to_string());
        assert!(req.check_credentials().is_ok());
        assert!(full_request().check_credentials().is_ok());
    }

    #[test]
    fn test_create_rules_short_circuit_in_order() {
        let mut req = full_request();
        req.first_name = " ".to_string();
        req.last_name = String::new();
        // first name is checked before last name
        assert!(req
            .check_credentials()
            .unwrap_err()
            .to_string()
            .contains("first name"));
    }

    #[test]
    fn test_phone_login_credential_rules() {
        let req = LoginRequest::Phone {
            phone: "0700".to_string(),
            password: String::new(),
        };
        assert!(req
            .check_credentials()
            .unwrap_err()
            .to_string()
            .contains("password"));
    }

    #[test]
    fn test_login_payload_is_tagged() {
        let req: LoginRequest = serde_json::from_str(
            r#"{"method": "federated", "provider": "google", "email": "a@x.com"}"#,
        )
        .unwrap();
        assert!(matches!(
            req,
            LoginRequest::Federated {
                provider: FederatedProvider::Google,
                ..
            }
        ));
        assert_eq!(req.contact(), (Some("a@x.com"), None));
    }

    #[test]
    fn test_profile_view_has_no_secret_material() {
        let value = serde_json::to_value(ProfileView {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: None,
            phone: None,
            birth_date: None,
            gender: Gender::Unspecified,
        })
        .unwrap();
        assert!(value.get("password_hash").is_none());
        assert!(value.get("security_answer").is_none());
    }
}
