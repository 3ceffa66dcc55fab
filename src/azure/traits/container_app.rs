// ABOUTME: Managed environment and container app operations.

use super::sealed::Sealed;
use crate::azure::{ArmError, ContainerApp, ContainerAppSpec, ManagedEnvironment};
use crate::types::ResourceGroupName;
use async_trait::async_trait;

#[async_trait]
pub trait ContainerAppOps: Sealed + Send + Sync {
    async fn create_managed_environment(
        &self,
        group: &ResourceGroupName,
        name: &str,
    ) -> Result<ManagedEnvironment, ArmError>;

    /// Create the app with external ingress and return its public URL.
    async fn create_container_app(
        &self,
        group: &ResourceGroupName,
        name: &str,
        spec: &ContainerAppSpec,
    ) -> Result<ContainerApp, ArmError>;
}
