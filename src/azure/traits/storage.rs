// ABOUTME: Storage account operations backing function apps.

use super::sealed::Sealed;
use crate::azure::{ArmError, StorageAccount};
use crate::types::ResourceGroupName;
use async_trait::async_trait;

#[async_trait]
pub trait StorageOps: Sealed + Send + Sync {
    /// Create the account and return it with a connection string.
    async fn create_storage_account(
        &self,
        group: &ResourceGroupName,
        name: &str,
    ) -> Result<StorageAccount, ArmError>;
}
