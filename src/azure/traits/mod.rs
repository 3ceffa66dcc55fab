// ABOUTME: Composable capability traits for the cloud provider.
// ABOUTME: ResourceGroupOps, StorageOps, WebSiteOps, RegistryOps, ContainerAppOps.

mod container_app;
mod registry;
mod resource_group;
pub(crate) mod sealed;
mod storage;
mod web_site;

pub use container_app::ContainerAppOps;
pub use registry::RegistryOps;
pub use resource_group::ResourceGroupOps;
pub use storage::StorageOps;
pub use web_site::WebSiteOps;

/// Everything a deployment needs from the provider.
pub trait CloudProvider:
    ResourceGroupOps + StorageOps + WebSiteOps + RegistryOps + ContainerAppOps
{
}

impl<T> CloudProvider for T where
    T: ResourceGroupOps + StorageOps + WebSiteOps + RegistryOps + ContainerAppOps
{
}
