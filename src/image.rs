// ABOUTME: Builds container images and pushes them to a registry with an external engine.
// ABOUTME: Each engine stage is checked by exit code; the registry password goes over stdin.

use crate::process::{ToolCommand, ToolError, ToolOutput};
use crate::types::ImageRef;
use std::fmt;
use std::path::{Path, PathBuf};

const DOCKERFILE: &str = "Dockerfile";

/// Container engine stage, reported on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStage {
    Probe,
    Login,
    Build,
    Push,
}

impl fmt::Display for ImageStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageStage::Probe => "probe",
            ImageStage::Login => "login",
            ImageStage::Build => "build",
            ImageStage::Push => "push",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("no Dockerfile in {}", .directory.display())]
    BuildContextMissing { directory: PathBuf },

    #[error("container engine {stage} failed{}: {stderr}", .exit_code.map(|c| format!(" with exit code {c}")).unwrap_or_default())]
    ContainerToolFailed {
        stage: ImageStage,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// Login details for a container registry.
#[derive(Clone)]
pub struct RegistryCredentials {
    pub login_server: String,
    pub username: String,
    password: String,
}

impl RegistryCredentials {
    pub fn new(login_server: &str, username: &str, password: &str) -> Self {
        Self {
            login_server: login_server.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for RegistryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryCredentials")
            .field("login_server", &self.login_server)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Drives the container engine CLI.
#[derive(Debug, Clone)]
pub struct ImageBuilder {
    engine: PathBuf,
}

impl ImageBuilder {
    pub fn new(engine: impl Into<PathBuf>) -> Self {
        Self {
            engine: engine.into(),
        }
    }

    /// Build the image in `project_dir` and push it as
    /// `<login_server>/<image_name>:<timestamp>`.
    pub async fn build_and_push(
        &self,
        project_dir: &Path,
        registry: &RegistryCredentials,
        image_name: &str,
    ) -> Result<ImageRef, ImageError> {
        if !project_dir.join(DOCKERFILE).is_file() {
            return Err(ImageError::BuildContextMissing {
                directory: project_dir.to_path_buf(),
            });
        }

        let image = ImageRef::new(
            &registry.login_server,
            &image_name.to_ascii_lowercase(),
            &image_tag(),
        );
        let reference = image.to_string();

        let probe = ToolCommand::new(&self.engine)
            .args(["version", "--format", "{{.Server.Version}}"])
            .run()
            .await?;
        check(ImageStage::Probe, &probe)?;
        tracing::debug!(version = %probe.stdout.trim(), "container engine available");

        let login = ToolCommand::new(&self.engine)
            .arg("login")
            .arg(&registry.login_server)
            .arg("--username")
            .arg(&registry.username)
            .arg("--password-stdin")
            .stdin(registry.password().as_bytes())
            .run()
            .await?;
        check(ImageStage::Login, &login)?;

        tracing::info!(image = %reference, "building image");
        let build = ToolCommand::new(&self.engine)
            .arg("build")
            .arg("--tag")
            .arg(&reference)
            .arg(project_dir)
            .current_dir(project_dir)
            .run()
            .await?;
        check(ImageStage::Build, &build)?;

        tracing::info!(image = %reference, "pushing image");
        let push = ToolCommand::new(&self.engine)
            .arg("push")
            .arg(&reference)
            .run()
            .await?;
        check(ImageStage::Push, &push)?;

        Ok(image)
    }
}

fn check(stage: ImageStage, output: &ToolOutput) -> Result<(), ImageError> {
    if output.success() {
        return Ok(());
    }
    Err(ImageError::ContainerToolFailed {
        stage,
        exit_code: output.exit_code(),
        stderr: output.stderr.trim().to_string(),
    })
}

fn image_tag() -> String {
    chrono::Utc::now().format("%Y%m%d%H%M%S").to_string()
}
