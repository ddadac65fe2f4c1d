//! Request/response DTOs and per-operation credential validation

pub mod account;
pub mod admin;
pub mod common;
pub mod validated_json;

pub use account::*;
pub use admin::*;
pub use common::{ApiResponse, AuthenticateResponse, EmptyData, TokenResponse};
pub use validated_json::ValidatedJson;

use crate::domain::{ServiceError, ServiceResult};

/// Presence rules for the credential validator. Blank means empty after
/// trimming ASCII spaces; rules short-circuit on the first failure and
/// name the offending field.
pub(crate) fn require(field: &'static str, value: &str) -> ServiceResult<()> {
    if value.trim_matches(' ').is_empty() {
        Err(ServiceError::MissingCredential(field))
    } else {
        Ok(())
    }
}

pub(crate) fn require_either(
    field: &'static str,
    a: Option<&str>,
    b: Option<&str>,
) -> ServiceResult<()> {
    let blank = |v: Option<&str>| v.map_or(true, |s| s.trim_matches(' ').is_empty());
    if blank(a) && blank(b) {
        Err(ServiceError::MissingCredential(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_blank_and_space_only() {
        assert!(require("first name", "A").is_ok());
        assert_eq!(
            require("first name", "").unwrap_err().kind(),
            "MISSING_CREDENTIAL"
        );
        assert!(require("first name", "   ").is_err());
    }

    #[test]
    fn test_require_either_accepts_one_side() {
        assert!(require_either("email or phone", Some("a@x.com"), None).is_ok());
        assert!(require_either("email or phone", None, Some("0700")).is_ok());
        assert!(require_either("email or phone", Some("  "), Some("")).is_err());
        assert!(require_either("email or phone", None, None).is_err());
    }
}
