// ABOUTME: Handle to a successful deployment; releasing it deletes the resource group.
// ABOUTME: Release is explicit and idempotent. Drop only warns about a forgotten handle.

use crate::azure::{ResourceGroupHandle, ResourceGroupOps};
use crate::types::AppName;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use super::error::{DeployError, DeployStage};
use super::request::DeploymentKind;

/// Plain description of a deployment, detached from its cleanup duty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentInfo {
    pub name: AppName,
    pub kind: DeploymentKind,
    pub url: String,
    pub resource_group: ResourceGroupHandle,
}

/// A live deployment.
///
/// Call [`release`](Self::release) to tear it down, or
/// [`into_detached`](Self::into_detached) to keep it running. Remote cleanup
/// never happens in `Drop`.
pub struct DeploymentHandle<P: ResourceGroupOps + ?Sized> {
    info: DeploymentInfo,
    provider: Arc<P>,
    released: bool,
}

impl<P: ResourceGroupOps + ?Sized> DeploymentHandle<P> {
    pub(crate) fn new(info: DeploymentInfo, provider: Arc<P>) -> Self {
        Self {
            info,
            provider,
            released: false,
        }
    }

    pub fn name(&self) -> &AppName {
        &self.info.name
    }

    pub fn kind(&self) -> DeploymentKind {
        self.info.kind
    }

    /// Public base URL of the deployed endpoint.
    pub fn url(&self) -> &str {
        &self.info.url
    }

    pub fn resource_group(&self) -> &ResourceGroupHandle {
        &self.info.resource_group
    }

    pub fn info(&self) -> &DeploymentInfo {
        &self.info
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Delete the deployment's resource group.
    ///
    /// Errors are returned, unlike rollback after a failure. Calling again
    /// after a successful release does nothing; after a failed one it retries.
    pub async fn release(&mut self) -> Result<(), DeployError> {
        if self.released {
            return Ok(());
        }

        let group = &self.info.resource_group.name;
        tracing::info!(group = %group, "releasing deployment");
        self.provider
            .delete_group(group)
            .await
            .map_err(DeployError::provider(DeployStage::Teardown))?;

        self.released = true;
        Ok(())
    }

    /// Give up ownership: the resources stay until torn down by name.
    pub fn into_detached(mut self) -> DeploymentInfo {
        self.released = true;
        self.info.clone()
    }

    /// Run `body` with the deployment, then release it whether `body`
    /// finished or panicked. A panic resumes after the release.
    pub async fn scoped<F, Fut, T>(mut self, body: F) -> Result<T, DeployError>
    where
        F: FnOnce(DeploymentInfo) -> Fut,
        Fut: Future<Output = T>,
    {
        let outcome = AssertUnwindSafe(body(self.info.clone()))
            .catch_unwind()
            .await;
        let released = self.release().await;

        match outcome {
            Ok(value) => released.map(|()| value),
            Err(panic) => {
                if let Err(e) = released {
                    tracing::warn!(error = %e, "release after panic failed");
                }
                std::panic::resume_unwind(panic)
            }
        }
    }
}

impl<P: ResourceGroupOps + ?Sized> std::fmt::Debug for DeploymentHandle<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentHandle")
            .field("info", &self.info)
            .field("released", &self.released)
            .finish()
    }
}

impl<P: ResourceGroupOps + ?Sized> Drop for DeploymentHandle<P> {
    fn drop(&mut self) {
        if !self.released {
            tracing::warn!(
                group = %self.info.resource_group.name,
                url = %self.info.url,
                "deployment handle dropped without release; resource group still exists"
            );
        }
    }
}
