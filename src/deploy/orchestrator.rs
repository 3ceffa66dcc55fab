// ABOUTME: Runs deployments end to end with rollback on failure and an optional deadline.
// ABOUTME: Also exposes the resource group operations callers use directly.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::azure::{CloudProvider, ResourceGroupHandle};
use crate::build::BuildService;
use crate::config::{Config, ReadinessConfig, RuntimeConfig};
use crate::image::ImageBuilder;
use crate::readiness::ReadinessPoller;
use crate::types::{AppName, ResourceGroupName};

use super::Deployment;
use super::error::{DeployError, DeployStage};
use super::handle::{DeploymentHandle, DeploymentInfo};
use super::request::{DeploymentKind, DeploymentRequest, EnvVars};
use super::rollback::rollback_group;
use super::state::{HasResourceGroup, Ready};
use super::transitions::TransitionResult;

/// Deploys to one provider.
///
/// Cheap to share: concurrent deployments through one orchestrator share
/// the build service, so toolchain runs are serialized across them.
pub struct Orchestrator<P: CloudProvider + ?Sized> {
    provider: Arc<P>,
    builds: Arc<BuildService>,
    images: ImageBuilder,
    poller: ReadinessPoller,
    readiness: ReadinessConfig,
    runtime: RuntimeConfig,
    deadline: Option<Duration>,
}

impl<P: CloudProvider + ?Sized> Orchestrator<P> {
    pub fn new(
        provider: Arc<P>,
        builds: Arc<BuildService>,
        config: &Config,
    ) -> Result<Self, DeployError> {
        Ok(Self {
            provider,
            builds,
            images: ImageBuilder::new(config.toolchain.docker.clone()),
            poller: ReadinessPoller::from_config(&config.readiness)?,
            readiness: config.readiness.clone(),
            runtime: config.runtime.clone(),
            deadline: config.deadline,
        })
    }

    /// Orchestrator with its own build service.
    pub fn from_config(provider: Arc<P>, config: &Config) -> Result<Self, DeployError> {
        let builds = Arc::new(BuildService::new(&config.toolchain));
        Self::new(provider, builds, config)
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    // =========================================================================
    // Deployments
    // =========================================================================

    pub async fn deploy_function(
        &self,
        source_dir: impl Into<PathBuf>,
        name: &AppName,
        env: EnvVars,
    ) -> Result<DeploymentHandle<P>, DeployError> {
        self.deploy(DeploymentRequest::new(
            DeploymentKind::Function,
            source_dir,
            name.clone(),
            env,
        ))
        .await
    }

    pub async fn deploy_web_app(
        &self,
        source_dir: impl Into<PathBuf>,
        name: &AppName,
        env: EnvVars,
    ) -> Result<DeploymentHandle<P>, DeployError> {
        self.deploy(DeploymentRequest::new(
            DeploymentKind::WebApp,
            source_dir,
            name.clone(),
            env,
        ))
        .await
    }

    pub async fn deploy_container_app(
        &self,
        source_dir: impl Into<PathBuf>,
        name: &AppName,
        env: EnvVars,
    ) -> Result<DeploymentHandle<P>, DeployError> {
        self.deploy(DeploymentRequest::new(
            DeploymentKind::ContainerApp,
            source_dir,
            name.clone(),
            env,
        ))
        .await
    }

    /// Run a deployment to readiness.
    ///
    /// Either returns a handle owning the new resource group, or returns the
    /// first error after the group has been rolled back.
    pub async fn deploy(&self, request: DeploymentRequest) -> Result<DeploymentHandle<P>, DeployError> {
        let name = request.name().clone();
        let group = name.resource_group();
        let group_requested = AtomicBool::new(false);

        tracing::info!(name = %name, kind = %request.kind(), "starting deployment");

        let ready = match self.deadline {
            None => self.run(request, &group_requested).await?,
            Some(deadline) => {
                match tokio::time::timeout(deadline, self.run(request, &group_requested)).await {
                    Ok(result) => result?,
                    Err(_) => {
                        tracing::warn!(name = %name, deadline = ?deadline, "deployment deadline exceeded");
                        if group_requested.load(Ordering::SeqCst) {
                            rollback_group(self.provider.as_ref(), &group).await;
                        }
                        return Err(DeployError::DeadlineExceeded {
                            name: name.to_string(),
                            deadline,
                        });
                    }
                }
            }
        };

        tracing::info!(name = %name, url = %ready.url(), "deployment ready");
        let info = DeploymentInfo {
            name,
            kind: ready.kind(),
            url: ready.url().to_string(),
            resource_group: ready.resource_group().clone(),
        };
        Ok(DeploymentHandle::new(info, Arc::clone(&self.provider)))
    }

    async fn run(
        &self,
        request: DeploymentRequest,
        group_requested: &AtomicBool,
    ) -> Result<Deployment<Ready>, DeployError> {
        let provider = self.provider.as_ref();
        let kind = request.kind();

        let deployment = Deployment::new(request)
            .check_group_absent(provider)
            .await?;
        group_requested.store(true, Ordering::SeqCst);
        let deployment = deployment.create_group(provider).await?;

        let deployment = match kind {
            DeploymentKind::ContainerApp => {
                self.settle(deployment.build_image(provider, &self.images).await)
                    .await?
            }
            DeploymentKind::Function | DeploymentKind::WebApp => {
                self.settle(deployment.publish_package(&self.builds).await)
                    .await?
            }
        };
        let deployment = self
            .settle(deployment.create_compute(provider, &self.runtime).await)
            .await?;
        let deployment = self
            .settle(deployment.deploy_artifact(provider).await)
            .await?;
        self.settle(deployment.wait_ready(&self.poller, &self.readiness).await)
            .await
    }

    /// Pass a successful transition through; roll back a failed one and
    /// return its error.
    async fn settle<T, S: HasResourceGroup>(
        &self,
        result: TransitionResult<T, S>,
    ) -> Result<Deployment<T>, DeployError> {
        match result {
            Ok(next) => Ok(next),
            Err((failed, error)) => {
                tracing::warn!(name = %failed.name(), error = %error, "deployment failed");
                failed.rollback(self.provider.as_ref()).await;
                Err(error)
            }
        }
    }

    // =========================================================================
    // Resource groups
    // =========================================================================

    pub async fn create_resource_group(
        &self,
        name: &ResourceGroupName,
    ) -> Result<ResourceGroupHandle, DeployError> {
        self.provider
            .create_group(name)
            .await
            .map_err(DeployError::provider(DeployStage::ResourceGroup))
    }

    /// Delete a group, surfacing any failure.
    pub async fn delete_resource_group(&self, name: &ResourceGroupName) -> Result<(), DeployError> {
        self.provider
            .delete_group(name)
            .await
            .map_err(DeployError::provider(DeployStage::Teardown))
    }

    pub async fn resource_group_exists(&self, name: &ResourceGroupName) -> Result<bool, DeployError> {
        self.provider
            .group_exists(name)
            .await
            .map_err(DeployError::provider(DeployStage::ResourceGroup))
    }

    pub async fn list_resource_groups(&self) -> Result<Vec<ResourceGroupHandle>, DeployError> {
        self.provider
            .list_groups()
            .await
            .map_err(DeployError::provider(DeployStage::ResourceGroup))
    }
}
