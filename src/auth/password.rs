//! Password hashing utilities

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::domain::{ServiceError, ServiceResult};

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> ServiceResult<String> {
    hash(password, DEFAULT_COST).map_err(ServiceError::Hashing)
}

/// Verify a password against a stored hash. A mismatch is `Ok(false)`;
/// `Err` means the hash itself could not be processed.
pub fn verify_password(password: &str, hashed: &str) -> ServiceResult<bool> {
    verify(password, hashed).map_err(ServiceError::Hashing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "secure_password_123";
        let hashed = hash_password(password).unwrap();

        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn test_appended_suffix_is_a_mismatch() {
        let password = "p1";
        let hashed = hash_password(password).unwrap();
        assert!(!verify_password("p1x", &hashed).unwrap());
    }

    #[test]
    fn test_hash_is_never_cleartext() {
        let hashed = hash_password("top-secret").unwrap();
        assert!(!hashed.contains("top-secret"));
    }
}
