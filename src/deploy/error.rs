// ABOUTME: Error types for deployment operations.
// ABOUTME: DeployErrorKind gives callers a stable taxonomy to match on.

use crate::azure::ArmError;
use crate::build::BuildError;
use crate::image::ImageError;
use crate::package::PackageError;
use crate::readiness::ReadinessError;
use std::fmt;
use std::time::Duration;

/// Deployment stage a provider call belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStage {
    ResourceGroup,
    Artifact,
    Compute,
    Upload,
    Readiness,
    Teardown,
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeployStage::ResourceGroup => "resource group",
            DeployStage::Artifact => "artifact",
            DeployStage::Compute => "compute resource",
            DeployStage::Upload => "upload",
            DeployStage::Readiness => "readiness",
            DeployStage::Teardown => "teardown",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during deployment state transitions.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Package(#[from] PackageError),

    #[error(transparent)]
    Image(#[from] ImageError),

    /// Provider rejected or failed a call.
    #[error("{stage} stage failed: {source}")]
    Provider {
        stage: DeployStage,
        #[source]
        source: ArmError,
    },

    #[error(transparent)]
    Readiness(#[from] ReadinessError),

    /// A group with the deployment's name already exists and is not ours to roll back.
    #[error("resource group {group} already exists; tear it down or pick another name")]
    GroupAlreadyExists { group: String },

    /// The overall deadline passed before the deployment finished.
    #[error("deployment of {name} exceeded its deadline of {deadline:?}")]
    DeadlineExceeded { name: String, deadline: Duration },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    /// No single project file in the source directory.
    ProjectNotFound,
    BuildFailed,
    /// No Dockerfile for a container build.
    BuildContextMissing,
    ContainerToolFailed,
    ProviderError,
    /// The deployment's resource group existed before the call.
    GroupAlreadyExists,
    DeploymentUploadFailed,
    ReadinessTimeout,
    AuthenticationFailed,
    SourceDirectoryMissing,
    DeadlineExceeded,
    Configuration,
    Io,
}

impl DeployError {
    pub(crate) fn provider(stage: DeployStage) -> impl FnOnce(ArmError) -> DeployError {
        move |source| DeployError::Provider { stage, source }
    }

    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Build(err) => match err {
                BuildError::ProjectNotFound { .. } | BuildError::AmbiguousProject { .. } => {
                    DeployErrorKind::ProjectNotFound
                }
                BuildError::BuildFailed { .. }
                | BuildError::ToolchainUnavailable(_)
                | BuildError::Tool(_) => DeployErrorKind::BuildFailed,
                BuildError::Io(_) => DeployErrorKind::Io,
            },
            DeployError::Package(err) => match err {
                PackageError::SourceDirectoryMissing { .. } => {
                    DeployErrorKind::SourceDirectoryMissing
                }
                _ => DeployErrorKind::Io,
            },
            DeployError::Image(err) => match err {
                ImageError::BuildContextMissing { .. } => DeployErrorKind::BuildContextMissing,
                ImageError::ContainerToolFailed { .. } | ImageError::Tool(_) => {
                    DeployErrorKind::ContainerToolFailed
                }
            },
            DeployError::Provider { source, .. } => match source {
                ArmError::Authentication { .. } => DeployErrorKind::AuthenticationFailed,
                ArmError::Upload { .. } => DeployErrorKind::DeploymentUploadFailed,
                _ => DeployErrorKind::ProviderError,
            },
            DeployError::Readiness(err) => match err {
                ReadinessError::Timeout { .. } => DeployErrorKind::ReadinessTimeout,
                ReadinessError::Client(_) => DeployErrorKind::Configuration,
            },
            DeployError::GroupAlreadyExists { .. } => DeployErrorKind::GroupAlreadyExists,
            DeployError::DeadlineExceeded { .. } => DeployErrorKind::DeadlineExceeded,
            DeployError::Configuration(_) => DeployErrorKind::Configuration,
            DeployError::Io(_) => DeployErrorKind::Io,
        }
    }

    /// Stage of a provider failure, if this is one.
    pub fn stage(&self) -> Option<DeployStage> {
        match self {
            DeployError::Provider { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
