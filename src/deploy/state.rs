// ABOUTME: Deployment state types for the type state pattern.
// ABOUTME: Each state from GroupCreated on carries the resource group it must roll back.

use crate::azure::{ContainerApp, ResourceGroupHandle, Site};
use crate::image::RegistryCredentials;
use crate::package::Package;
use crate::types::ImageRef;

/// Initial state: nothing created yet.
/// Available actions: `check_group_absent()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// No group with the deployment's name existed when checked, so the group
/// about to be created belongs to this attempt.
/// Available actions: `create_group()`
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupAbsent;

/// Resource group exists.
/// Available actions: `publish_package()`, `build_image()`, `rollback()`
#[derive(Debug)]
pub struct GroupCreated {
    pub(crate) group: ResourceGroupHandle,
}

/// Artifact built and ready to deploy.
/// Available actions: `create_compute()`, `rollback()`
#[derive(Debug)]
pub struct ArtifactReady {
    pub(crate) group: ResourceGroupHandle,
    pub(crate) artifact: BuildArtifact,
}

/// Compute resource exists with its app settings.
/// Available actions: `deploy_artifact()`, `rollback()`
#[derive(Debug)]
pub struct ComputeCreated {
    pub(crate) group: ResourceGroupHandle,
    pub(crate) artifact: BuildArtifact,
    pub(crate) target: ComputeTarget,
}

/// Artifact running on the compute resource.
/// Available actions: `wait_ready()`, `rollback()`
#[derive(Debug)]
pub struct ArtifactDeployed {
    pub(crate) group: ResourceGroupHandle,
    pub(crate) url: String,
}

/// Public endpoint answered.
/// Available actions: `url()`, `rollback()`
#[derive(Debug)]
pub struct Ready {
    pub(crate) group: ResourceGroupHandle,
    pub(crate) url: String,
}

/// A built artifact, consumed by exactly one deployment.
#[derive(Debug)]
pub enum BuildArtifact {
    /// Zip archive; deleted when dropped.
    Package(Package),
    /// Pushed image and the credentials the compute resource pulls it with.
    Image {
        image: ImageRef,
        registry: RegistryCredentials,
    },
}

/// The compute resource an artifact is deployed to.
#[derive(Debug)]
pub enum ComputeTarget {
    Site(Site),
    ContainerApp(ContainerApp),
}

impl ComputeTarget {
    pub fn url(&self) -> &str {
        match self {
            ComputeTarget::Site(site) => &site.url,
            ComputeTarget::ContainerApp(app) => &app.url,
        }
    }
}

/// States that own a resource group.
pub trait HasResourceGroup {
    fn resource_group(&self) -> &ResourceGroupHandle;
}

macro_rules! has_resource_group {
    ($($state:ty),*) => {
        $(
            impl HasResourceGroup for $state {
                fn resource_group(&self) -> &ResourceGroupHandle {
                    &self.group
                }
            }
        )*
    };
}

has_resource_group!(GroupCreated, ArtifactReady, ComputeCreated, ArtifactDeployed, Ready);
