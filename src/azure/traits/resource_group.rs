// ABOUTME: Resource group lifecycle operations.
// ABOUTME: Create, delete, probe and list the groups every other resource lives in.

use super::sealed::Sealed;
use crate::azure::{ArmError, ResourceGroupHandle};
use crate::types::ResourceGroupName;
use async_trait::async_trait;

#[async_trait]
pub trait ResourceGroupOps: Sealed + Send + Sync {
    /// Create (or update) the group in the configured location.
    async fn create_group(
        &self,
        name: &ResourceGroupName,
    ) -> Result<ResourceGroupHandle, ArmError>;

    /// Delete the group and everything in it, waiting for completion.
    /// A group that does not exist counts as deleted.
    async fn delete_group(&self, name: &ResourceGroupName) -> Result<(), ArmError>;

    /// Point-in-time existence probe. Not cached.
    async fn group_exists(&self, name: &ResourceGroupName) -> Result<bool, ArmError>;

    async fn list_groups(&self) -> Result<Vec<ResourceGroupHandle>, ArmError>;
}
