use async_trait::async_trait;

use super::{Account, NewAccount};
use crate::domain::ServiceResult;

/// Keyed lookup/insert collaborator for the `accounts` table.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn insert(&self, account: NewAccount) -> ServiceResult<()>;

    /// Look up an account by email or phone. Either side may be absent;
    /// with both absent the lookup matches nothing.
    async fn find_by_contact(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> ServiceResult<Option<Account>>;

    /// Keyset page ordered by id, strictly after `after_id`. Backs the
    /// account stream: pages are fetched lazily as the stream drains.
    async fn page_after(&self, after_id: Option<&str>, limit: u64) -> ServiceResult<Vec<Account>>;
}
