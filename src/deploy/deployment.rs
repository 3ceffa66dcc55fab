// ABOUTME: Generic deployment struct parameterized by state.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::azure::ResourceGroupHandle;
use crate::types::AppName;

use super::request::{DeploymentKind, DeploymentRequest};
use super::state::{ArtifactReady, BuildArtifact, HasResourceGroup, Initialized, Ready};

/// A deployment in progress, parameterized by its current state.
///
/// Every state from `GroupCreated` on owns the resource group created for the
/// attempt, so a failed transition can always hand back something to roll
/// back.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) request: DeploymentRequest,
    pub(crate) state: S,
}

impl Deployment<Initialized> {
    pub fn new(request: DeploymentRequest) -> Self {
        Deployment {
            request,
            state: Initialized,
        }
    }
}

impl<S> Deployment<S> {
    pub fn request(&self) -> &DeploymentRequest {
        &self.request
    }

    pub fn name(&self) -> &AppName {
        self.request.name()
    }

    pub fn kind(&self) -> DeploymentKind {
        self.request.kind()
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}

impl<S: HasResourceGroup> Deployment<S> {
    pub fn resource_group(&self) -> &ResourceGroupHandle {
        self.state.resource_group()
    }
}

impl Deployment<ArtifactReady> {
    pub fn artifact(&self) -> &BuildArtifact {
        &self.state.artifact
    }
}

impl Deployment<Ready> {
    /// Public base URL that passed readiness.
    pub fn url(&self) -> &str {
        &self.state.url
    }
}
