//! Service error taxonomy
//!
//! Every failure a caller can observe maps to exactly one variant here.
//! The `kind()` string is a stable machine-readable code; callers branch
//! on it rather than on message text. Secrets and password hashes must
//! never appear in any message.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// A required request field is blank or absent
    #[error("missing credentials: {0}")]
    MissingCredential(&'static str),

    #[error("account does not exist")]
    AccountNotFound,

    #[error("account already exists")]
    AccountExists,

    /// Status flag on the record forbids authentication
    #[error("account has been blocked - contact sysadmin")]
    AccountBlocked,

    #[error("wrong password")]
    WrongPassword,

    #[error("not authorised to perform {0} operation")]
    PermissionDenied(&'static str),

    /// Bearer token absent, malformed, or failed signature check
    #[error("authentication token is invalid")]
    InvalidToken,

    /// Token was well-formed and correctly signed but past its expiry
    #[error("authentication token has expired")]
    ExpiredToken,

    #[error("failed to generate hashed password")]
    Hashing(#[source] bcrypt::BcryptError),

    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("failed to execute {operation} query: {message}")]
    Query {
        operation: &'static str,
        message: String,
    },

    #[error("failed to json encode/decode {what}")]
    Serialization {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The caller-supplied deadline elapsed; the operation may be retried
    #[error("couldn't complete {0} operation: deadline exceeded")]
    DeadlineExceeded(&'static str),

    /// The call was canceled (e.g. shutdown in progress); not retryable here
    #[error("couldn't complete {0} operation: canceled")]
    Canceled(&'static str),

    /// Unexpected fault, including recovered panics. The payload is logged
    /// at the catch site and intentionally kept out of the response.
    #[error("internal server error")]
    Internal(String),
}

impl ServiceError {
    /// Stable error code for API consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential(_) => "MISSING_CREDENTIAL",
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::AccountExists => "ACCOUNT_EXISTS",
            Self::AccountBlocked => "ACCOUNT_BLOCKED",
            Self::WrongPassword => "WRONG_PASSWORD",
            Self::PermissionDenied(_) => "PERMISSION_DENIED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::ExpiredToken => "EXPIRED_TOKEN",
            Self::Hashing(_) => "HASHING_FAILED",
            Self::Signing(_) => "SIGNING_FAILED",
            Self::Query { .. } => "QUERY_FAILED",
            Self::Serialization { .. } => "SERIALIZATION_FAILED",
            Self::DeadlineExceeded(_) => "DEADLINE_EXCEEDED",
            Self::Canceled(_) => "CANCELED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCredential(_) => StatusCode::BAD_REQUEST,
            Self::AccountNotFound => StatusCode::NOT_FOUND,
            Self::AccountExists => StatusCode::CONFLICT,
            Self::AccountBlocked | Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Self::WrongPassword | Self::InvalidToken | Self::ExpiredToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Canceled(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Hashing(_)
            | Self::Signing(_)
            | Self::Query { .. }
            | Self::Serialization { .. }
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the caller may retry the same request and plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DeadlineExceeded(_))
    }
}

/// Wrap a database error with the operation that issued the query.
pub fn query_err(operation: &'static str) -> impl FnOnce(sea_orm::DbErr) -> ServiceError {
    move |e| ServiceError::Query {
        operation,
        message: e.to_string(),
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable_and_distinct() {
        assert_eq!(ServiceError::AccountNotFound.kind(), "ACCOUNT_NOT_FOUND");
        assert_eq!(ServiceError::ExpiredToken.kind(), "EXPIRED_TOKEN");
        assert_ne!(
            ServiceError::ExpiredToken.kind(),
            ServiceError::InvalidToken.kind()
        );
        assert_ne!(
            ServiceError::DeadlineExceeded("Login").kind(),
            ServiceError::Canceled("Login").kind()
        );
    }

    #[test]
    fn cancellation_kinds_map_to_distinct_statuses() {
        assert_eq!(
            ServiceError::DeadlineExceeded("GetUser").status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ServiceError::Canceled("GetUser").status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert!(ServiceError::DeadlineExceeded("GetUser").is_retryable());
        assert!(!ServiceError::Canceled("GetUser").is_retryable());
    }

    #[test]
    fn internal_error_hides_payload() {
        let err = ServiceError::Internal("secret backtrace".to_string());
        assert_eq!(err.to_string(), "internal server error");
    }
}
