//! JWT token issuance and verification
//!
//! Tokens are self-contained: validity is fully determined by signature
//! and expiry, so there is no server-side session state. The signing key
//! lives inside [`TokenService`], injected once at construction.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::{Account, Admin, AdminLevel, ServiceError, ServiceResult};

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "super-secret-key-change-in-production".to_string()),
            expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
            issuer: "account-service".to_string(),
        }
    }
}

/// Profile identity snapshot embedded in user tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProfileClaims {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Admin identity snapshot embedded in admin tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AdminClaims {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub level: AdminLevel,
}

/// Signed token payload
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (account or admin ID)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileClaims>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminClaims>,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.admin.is_some()
    }

    pub fn admin_level(&self) -> Option<AdminLevel> {
        self.admin.as_ref().map(|a| a.level)
    }
}

/// Issues and verifies signed tokens with a process-wide immutable key.
#[derive(Clone)]
pub struct TokenService {
    config: JwtConfig,
}

impl TokenService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// Token lifetime in seconds, for `expires_in` response fields
    pub fn expires_in_secs(&self) -> i64 {
        self.config.expiration_hours * 3600
    }

    fn issue(
        &self,
        sub: String,
        profile: Option<ProfileClaims>,
        admin: Option<AdminClaims>,
    ) -> ServiceResult<String> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.config.expiration_hours);

        let claims = Claims {
            sub,
            iss: self.config.issuer.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            profile,
            admin,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )
        .map_err(ServiceError::Signing)
    }

    /// Token for an ordinary account, embedding a profile snapshot
    pub fn issue_for_profile(&self, account: &Account) -> ServiceResult<String> {
        self.issue(
            account.id.clone(),
            Some(ProfileClaims {
                first_name: account.first_name.clone(),
                last_name: account.last_name.clone(),
                email: account.email.clone(),
                phone: account.phone.clone(),
            }),
            None,
        )
    }

    /// Token for an administrative account, embedding its role
    pub fn issue_for_admin(&self, admin: &Admin) -> ServiceResult<String> {
        self.issue(
            admin.id.clone(),
            None,
            Some(AdminClaims {
                first_name: admin.first_name.clone(),
                last_name: admin.last_name.clone(),
                username: admin.username.clone(),
                level: admin.level,
            }),
        )
    }

    /// Anonymous short-lived token for the unauthenticated probe. Carries
    /// no identity snapshot, only a random subject.
    pub fn issue_throwaway(&self) -> ServiceResult<String> {
        self.issue(uuid::Uuid::new_v4().to_string(), None, None)
    }

    /// Parse and validate a token. Expiry and signature failures are
    /// distinct observable outcomes.
    pub fn verify(&self, token: &str) -> ServiceResult<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => ServiceError::ExpiredToken,
            _ => ServiceError::InvalidToken,
        })
    }
}
