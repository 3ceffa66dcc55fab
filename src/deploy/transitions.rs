// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state, or the old state plus the error.

use chrono::Utc;

use crate::azure::{
    ContainerAppOps, ContainerAppSpec, PlanSku, RegistryOps, ResourceGroupOps, SiteKind, SiteSpec,
    StorageOps, WebSiteOps,
};
use crate::build::BuildService;
use crate::config::{ReadinessConfig, RuntimeConfig};
use crate::image::ImageBuilder;
use crate::package;
use crate::readiness::ReadinessPoller;

use super::Deployment;
use super::error::{DeployError, DeployStage};
use super::request::DeploymentKind;
use super::rollback::rollback_group;
use super::settings;
use super::state::{
    ArtifactDeployed, ArtifactReady, BuildArtifact, ComputeCreated, ComputeTarget, GroupAbsent,
    GroupCreated, HasResourceGroup, Initialized, Ready,
};

/// Result type for transitions that may need rollback on failure.
pub type TransitionResult<T, S> = Result<Deployment<T>, (Deployment<S>, DeployError)>;

// =============================================================================
// Internal Helpers
// =============================================================================

impl<S> Deployment<S> {
    fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            request: self.request,
            state,
        }
    }
}

impl<S: HasResourceGroup> Deployment<S> {
    /// Delete the attempt's resource group, best-effort.
    pub async fn rollback<P: ResourceGroupOps + ?Sized>(self, provider: &P) {
        rollback_group(provider, &self.state.resource_group().name).await;
    }
}

fn readiness_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

// =============================================================================
// Initialized -> GroupAbsent -> GroupCreated
// =============================================================================

impl Deployment<Initialized> {
    /// Make sure no group with the deployment's name exists yet.
    ///
    /// Creating a group is create-or-update, so without this check a later
    /// rollback could delete a group the caller already had.
    pub async fn check_group_absent<P: ResourceGroupOps + ?Sized>(
        self,
        provider: &P,
    ) -> Result<Deployment<GroupAbsent>, DeployError> {
        let name = self.request.name().resource_group();
        let exists = provider
            .group_exists(&name)
            .await
            .map_err(DeployError::provider(DeployStage::ResourceGroup))?;
        if exists {
            return Err(DeployError::GroupAlreadyExists {
                group: name.to_string(),
            });
        }
        Ok(self.transition(GroupAbsent))
    }
}

impl Deployment<GroupAbsent> {
    /// Create the resource group named after the deployment.
    ///
    /// A failed create may still have left a group behind, so it is deleted
    /// best-effort before the error is returned.
    pub async fn create_group<P: ResourceGroupOps + ?Sized>(
        self,
        provider: &P,
    ) -> Result<Deployment<GroupCreated>, DeployError> {
        let name = self.request.name().resource_group();
        tracing::info!(group = %name, "creating resource group");

        match provider.create_group(&name).await {
            Ok(group) => Ok(self.transition(GroupCreated { group })),
            Err(e) => {
                rollback_group(provider, &name).await;
                Err(DeployError::provider(DeployStage::ResourceGroup)(e))
            }
        }
    }
}

// =============================================================================
// GroupCreated -> ArtifactReady
// =============================================================================

impl Deployment<GroupCreated> {
    /// Publish the project and zip the output. The publish directory is
    /// removed once the archive exists.
    pub async fn publish_package(
        self,
        builds: &BuildService,
    ) -> TransitionResult<ArtifactReady, GroupCreated> {
        let published = match builds.publish(self.request.source_directory()).await {
            Ok(published) => published,
            Err(e) => return Err((self, e.into())),
        };

        let package = match package::package_directory(&published.path()).await {
            Ok(package) => package,
            Err(e) => return Err((self, e.into())),
        };
        drop(published);

        tracing::info!(
            name = %self.request.name(),
            archive = %package.archive_path().display(),
            "artifact ready"
        );
        let group = self.state.group.clone();
        Ok(self.transition(ArtifactReady {
            group,
            artifact: BuildArtifact::Package(package),
        }))
    }

    /// Create a registry in the group, then build and push the image to it.
    pub async fn build_image<P: RegistryOps + ?Sized>(
        self,
        provider: &P,
        images: &ImageBuilder,
    ) -> TransitionResult<ArtifactReady, GroupCreated> {
        let group_name = self.state.group.name.clone();
        let registry_name = self.request.name().registry_name();

        let registry = match provider.create_registry(&group_name, &registry_name).await {
            Ok(registry) => registry,
            Err(e) => return Err((self, DeployError::provider(DeployStage::Artifact)(e))),
        };
        let credentials = match provider.registry_credentials(&group_name, &registry).await {
            Ok(credentials) => credentials,
            Err(e) => return Err((self, DeployError::provider(DeployStage::Artifact)(e))),
        };

        let image = match images
            .build_and_push(
                self.request.source_directory(),
                &credentials,
                self.request.name().as_str(),
            )
            .await
        {
            Ok(image) => image,
            Err(e) => return Err((self, e.into())),
        };

        tracing::info!(name = %self.request.name(), image = %image, "artifact ready");
        let group = self.state.group.clone();
        Ok(self.transition(ArtifactReady {
            group,
            artifact: BuildArtifact::Image {
                image,
                registry: credentials,
            },
        }))
    }
}

// =============================================================================
// ArtifactReady -> ComputeCreated
// =============================================================================

impl Deployment<ArtifactReady> {
    /// Create the hosting resources and the compute resource with merged
    /// app settings.
    pub async fn create_compute<P>(
        self,
        provider: &P,
        runtime: &RuntimeConfig,
    ) -> TransitionResult<ComputeCreated, ArtifactReady>
    where
        P: StorageOps + WebSiteOps + ContainerAppOps + ?Sized,
    {
        match self.compute_target(provider, runtime).await {
            Ok(target) => {
                tracing::info!(name = %self.request.name(), url = %target.url(), "compute resource created");
                let ArtifactReady { group, artifact } = self.state;
                Ok(Deployment {
                    request: self.request,
                    state: ComputeCreated {
                        group,
                        artifact,
                        target,
                    },
                })
            }
            Err(e) => Err((self, e)),
        }
    }

    async fn compute_target<P>(
        &self,
        provider: &P,
        runtime: &RuntimeConfig,
    ) -> Result<ComputeTarget, DeployError>
    where
        P: StorageOps + WebSiteOps + ContainerAppOps + ?Sized,
    {
        let name = self.request.name();
        let group = &self.state.group;
        let now = Utc::now();

        match (&self.state.artifact, self.request.kind()) {
            (BuildArtifact::Package(_), DeploymentKind::Function) => {
                let storage = provider
                    .create_storage_account(&group.name, &name.storage_account_name())
                    .await
                    .map_err(DeployError::provider(DeployStage::Compute))?;
                let plan = provider
                    .create_plan(&group.name, &name.plan_name(), PlanSku::Consumption)
                    .await
                    .map_err(DeployError::provider(DeployStage::Compute))?;
                let spec = SiteSpec {
                    kind: SiteKind::FunctionApp,
                    plan_id: plan.id,
                    linux_fx_version: runtime.function_linux_fx_version.clone(),
                    app_settings: settings::merge(
                        settings::function_settings(now, &storage.connection_string, runtime),
                        self.request.env(),
                    ),
                };
                let site = provider
                    .create_site(&group.name, name.as_str(), &spec)
                    .await
                    .map_err(DeployError::provider(DeployStage::Compute))?;
                Ok(ComputeTarget::Site(site))
            }
            (BuildArtifact::Package(_), DeploymentKind::WebApp) => {
                let plan = provider
                    .create_plan(&group.name, &name.plan_name(), PlanSku::Basic)
                    .await
                    .map_err(DeployError::provider(DeployStage::Compute))?;
                let spec = SiteSpec {
                    kind: SiteKind::WebApp,
                    plan_id: plan.id,
                    linux_fx_version: runtime.web_app_linux_fx_version.clone(),
                    app_settings: settings::merge(
                        settings::web_app_settings(now),
                        self.request.env(),
                    ),
                };
                let site = provider
                    .create_site(&group.name, name.as_str(), &spec)
                    .await
                    .map_err(DeployError::provider(DeployStage::Compute))?;
                Ok(ComputeTarget::Site(site))
            }
            (BuildArtifact::Image { image, registry }, DeploymentKind::ContainerApp) => {
                let environment = provider
                    .create_managed_environment(&group.name, &name.environment_name())
                    .await
                    .map_err(DeployError::provider(DeployStage::Compute))?;
                let spec = ContainerAppSpec {
                    environment_id: environment.id,
                    image: image.clone(),
                    registry: registry.clone(),
                    target_port: runtime.container_port,
                    env: settings::merge(
                        settings::container_app_settings(now, runtime.container_port),
                        self.request.env(),
                    ),
                };
                let app = provider
                    .create_container_app(&group.name, &name.container_app_name(), &spec)
                    .await
                    .map_err(DeployError::provider(DeployStage::Compute))?;
                Ok(ComputeTarget::ContainerApp(app))
            }
            (_, kind) => Err(DeployError::Configuration(format!(
                "artifact does not match deployment kind {kind}"
            ))),
        }
    }
}

// =============================================================================
// ComputeCreated -> ArtifactDeployed
// =============================================================================

impl Deployment<ComputeCreated> {
    /// Upload the package to the site. Container apps already run the
    /// pushed image, so there is nothing to upload.
    pub async fn deploy_artifact<P: WebSiteOps + ?Sized>(
        self,
        provider: &P,
    ) -> TransitionResult<ArtifactDeployed, ComputeCreated> {
        if let (BuildArtifact::Package(package), ComputeTarget::Site(site)) =
            (&self.state.artifact, &self.state.target)
        {
            let archive = match package.read().await {
                Ok(archive) => archive,
                Err(e) => return Err((self, e.into())),
            };
            if let Err(e) = provider.deploy_zip(site, archive).await {
                return Err((self, DeployError::provider(DeployStage::Upload)(e)));
            }
        }

        let ComputeCreated { group, target, .. } = self.state;
        tracing::info!(name = %self.request.name(), "artifact deployed");
        Ok(Deployment {
            request: self.request,
            state: ArtifactDeployed {
                group,
                url: target.url().to_string(),
            },
        })
    }
}

// =============================================================================
// ArtifactDeployed -> Ready
// =============================================================================

impl Deployment<ArtifactDeployed> {
    pub async fn wait_ready(
        self,
        poller: &ReadinessPoller,
        readiness: &ReadinessConfig,
    ) -> TransitionResult<Ready, ArtifactDeployed> {
        let url = readiness_url(&self.state.url, &readiness.path);
        tracing::info!(url = %url, "waiting for endpoint");

        if let Err(e) = poller
            .wait_until_ready(&url, readiness.timeout, readiness.interval)
            .await
        {
            return Err((self, e.into()));
        }

        let ArtifactDeployed { group, url } = self.state;
        Ok(Deployment {
            request: self.request,
            state: Ready { group, url },
        })
    }
}
