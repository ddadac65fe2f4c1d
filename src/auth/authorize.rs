//! Admin-level authorization checks
//!
//! Invoked before any privileged mutation; a failure here aborts the
//! operation with nothing written to the store.

use crate::domain::{AdminLevel, AdminRepository, ServiceError, ServiceResult};

/// Look up the role of the admin identified by `username`.
pub async fn resolve_admin_level(
    repo: &dyn AdminRepository,
    username: &str,
) -> ServiceResult<AdminLevel> {
    repo.level_of(username)
        .await?
        .ok_or(ServiceError::AccountNotFound)
}

/// Gate a privileged operation on an exact level match.
pub fn require_level(
    actual: AdminLevel,
    required: AdminLevel,
    operation: &'static str,
) -> ServiceResult<()> {
    if actual == required {
        Ok(())
    } else {
        Err(ServiceError::PermissionDenied(operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::domain::{Admin, NewAdmin};

    struct FixedLevelRepo(Option<AdminLevel>);

    #[async_trait]
    impl AdminRepository for FixedLevelRepo {
        async fn insert(&self, _admin: NewAdmin) -> ServiceResult<()> {
            Ok(())
        }

        async fn find_by_username(&self, _username: &str) -> ServiceResult<Option<Admin>> {
            Ok(None)
        }

        async fn level_of(&self, _username: &str) -> ServiceResult<Option<AdminLevel>> {
            Ok(self.0)
        }
    }

    #[tokio::test]
    async fn test_resolve_known_admin() {
        let repo = FixedLevelRepo(Some(AdminLevel::SuperAdmin));
        let level = resolve_admin_level(&repo, "root").await.unwrap();
        assert_eq!(level, AdminLevel::SuperAdmin);
    }

    #[tokio::test]
    async fn test_resolve_unknown_admin() {
        let repo = FixedLevelRepo(None);
        let err = resolve_admin_level(&repo, "ghost").await.unwrap_err();
        assert_eq!(err.kind(), "ACCOUNT_NOT_FOUND");
    }

    #[test]
    fn test_require_level_exact_match_only() {
        assert!(require_level(AdminLevel::SuperAdmin, AdminLevel::SuperAdmin, "CreateAdmin").is_ok());

        for level in [AdminLevel::Reader, AdminLevel::LimitedWriter] {
            let err = require_level(level, AdminLevel::SuperAdmin, "CreateAdmin").unwrap_err();
            assert_eq!(err.kind(), "PERMISSION_DENIED");
        }
    }
}
