// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Group, artifact, compute, upload and readiness run in order with rollback on failure.

mod deployment;
mod error;
mod handle;
mod orchestrator;
mod request;
mod rollback;
pub mod settings;
mod state;
mod transitions;

pub use deployment::Deployment;
pub use error::{DeployError, DeployErrorKind, DeployStage};
pub use handle::{DeploymentHandle, DeploymentInfo};
pub use orchestrator::Orchestrator;
pub use request::{DeploymentKind, DeploymentRequest, EnvVarError, EnvVars};
pub use rollback::rollback_group;
pub use state::{
    ArtifactDeployed, ArtifactReady, BuildArtifact, ComputeCreated, ComputeTarget, GroupAbsent,
    GroupCreated, HasResourceGroup, Initialized, Ready,
};
pub use transitions::TransitionResult;
