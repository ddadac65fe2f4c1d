//! Admin request/response DTOs

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use super::require;
use crate::domain::{Admin, AdminLevel, ServiceResult};

/// Identity fields of the admin being created
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdminPayload {
    pub first_name: String,
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    pub phone: String,
    pub username: String,
    #[serde(default)]
    pub level: AdminLevel,
    #[serde(default)]
    pub trusted_devices: Vec<String>,
}

/// Privileged request: only a super admin may create admins. The caller
/// names the authorising super admin; the level is resolved from the
/// store before anything is written.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "super_admin_username": "root",
    "admin": {
        "first_name": "New",
        "last_name": "Admin",
        "email": "new.admin@x.com",
        "phone": "0700000001",
        "username": "new-admin",
        "level": "reader"
    },
    "password": "long-enough-secret"
}))]
pub struct CreateAdminRequest {
    pub super_admin_username: String,
    #[validate(nested)]
    pub admin: AdminPayload,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

impl CreateAdminRequest {
    pub fn check_credentials(&self) -> ServiceResult<()> {
        require("super admin username", &self.super_admin_username)?;
        require("email address", &self.admin.email)?;
        require("first name", &self.admin.first_name)?;
        require("last name", &self.admin.last_name)?;
        require("username", &self.admin.username)?;
        require("password", &self.password)?;
        Ok(())
    }
}

/// Admin login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginAdminRequest {
    pub username: String,
    pub password: String,
}

impl LoginAdminRequest {
    pub fn check_credentials(&self) -> ServiceResult<()> {
        require("username", &self.username)?;
        require("password", &self.password)?;
        Ok(())
    }
}

/// Admin credential check: confirms the named admin exists and holds the
/// requested level
#[derive(Debug, Deserialize, ToSchema)]
pub struct AuthenticateAdminRequest {
    pub username: String,
    pub level: AdminLevel,
}

impl AuthenticateAdminRequest {
    pub fn check_credentials(&self) -> ServiceResult<()> {
        require("username", &self.username)
    }
}

/// Admin view returned by retrieval; never carries the hashed secret
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminView {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub level: AdminLevel,
    pub trusted_devices: Vec<String>,
}

impl AdminView {
    pub fn from_admin(admin: &Admin) -> Self {
        Self {
            first_name: admin.first_name.clone(),
            last_name: admin.last_name.clone(),
            email: admin.email.clone(),
            phone: admin.phone.clone(),
            username: admin.username.clone(),
            level: admin.level,
            trusted_devices: admin.trusted_devices.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> CreateAdminRequest {
        CreateAdminRequest {
            super_admin_username: "root".to_string(),
            admin: AdminPayload {
                first_name: "New".to_string(),
                last_name: "Admin".to_string(),
                email: "new@x.com".to_string(),
                phone: "0700".to_string(),
                username: "new-admin".to_string(),
                level: AdminLevel::Reader,
                trusted_devices: vec![],
            },
            password: "p1p1p1p1".to_string(),
        }
    }

    #[test]
    fn test_super_admin_username_is_checked_first() {
        let mut req = full_request();
        req.super_admin_username = "  ".to_string();
        req.admin.email = String::new();
        assert!(req
            .check_credentials()
            .unwrap_err()
            .to_string()
            .contains("super admin username"));
    }

    #[test]
    fn test_admin_level_defaults_to_reader() {
        let payload: AdminPayload = serde_json::from_str(
            r#"{"first_name": "N", "last_name": "A", "email": "n@x.com",
                "phone": "0700", "username": "n"}"#,
        )
        .unwrap();
        assert_eq!(payload.level, AdminLevel::Reader);
        assert!(payload.trusted_devices.is_empty());
    }

    #[test]
    fn test_login_admin_requires_both_fields() {
        let req = LoginAdminRequest {
            username: "root".to_string(),
            password: " ".to_string(),
        };
        assert!(req
            .check_credentials()
            .unwrap_err()
            .to_string()
            .contains("password"));
    }

    #[test]
    fn test_admin_view_has_no_secret_material() {
        let value = serde_json::to_value(AdminView {
            first_name: "N".to_string(),
            last_name: "A".to_string(),
            email: "n@x.com".to_string(),
            phone: "0700".to_string(),
            username: "n".to_string(),
            level: AdminLevel::Reader,
            trusted_devices: vec!["laptop".to_string()],
        })
        .unwrap();
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["trusted_devices"][0], "laptop");
    }
}
