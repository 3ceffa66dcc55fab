// ABOUTME: Container registry operations.

use super::sealed::Sealed;
use crate::azure::{ArmError, Registry};
use crate::image::RegistryCredentials;
use crate::types::ResourceGroupName;
use async_trait::async_trait;

#[async_trait]
pub trait RegistryOps: Sealed + Send + Sync {
    /// Create a registry with the admin user enabled.
    async fn create_registry(
        &self,
        group: &ResourceGroupName,
        name: &str,
    ) -> Result<Registry, ArmError>;

    async fn registry_credentials(
        &self,
        group: &ResourceGroupName,
        registry: &Registry,
    ) -> Result<RegistryCredentials, ArmError>;
}
