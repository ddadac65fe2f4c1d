use async_trait::async_trait;

use super::{Admin, AdminLevel, NewAdmin};
use crate::domain::ServiceResult;

/// Keyed lookup/insert collaborator for the `admins` table.
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn insert(&self, admin: NewAdmin) -> ServiceResult<()>;

    async fn find_by_username(&self, username: &str) -> ServiceResult<Option<Admin>>;

    /// Role-only lookup used by the authorization check before
    /// privileged mutations.
    async fn level_of(&self, username: &str) -> ServiceResult<Option<AdminLevel>>;
}
