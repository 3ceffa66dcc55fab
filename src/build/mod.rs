// ABOUTME: Publishes a .NET project with the dotnet toolchain.
// ABOUTME: Owns the one-time toolchain registration and the process-wide build lock.

mod error;
mod project;

pub use error::BuildError;
pub use project::{ProjectFile, find_project};

use crate::config::ToolchainConfig;
use crate::process::ToolCommand;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::sync::{Mutex, OnceCell};

/// Output of a successful publish. The directory is removed on drop.
#[derive(Debug)]
pub struct PublishedOutput {
    project: ProjectFile,
    workdir: TempDir,
}

impl PublishedOutput {
    pub fn project(&self) -> &ProjectFile {
        &self.project
    }

    /// Directory holding the published files.
    pub fn path(&self) -> PathBuf {
        publish_dir(self.workdir.path())
    }
}

fn publish_dir(workdir: &Path) -> PathBuf {
    workdir.join("publish")
}

/// Runs project builds.
///
/// The toolchain is not safe to run concurrently from one process, so every
/// publish takes `build_lock` for the duration of the toolchain call. Locating
/// the toolchain happens once, before the lock is taken. Share one instance
/// (behind an `Arc`) between all deployments in a process.
#[derive(Debug)]
pub struct BuildService {
    configured: Option<PathBuf>,
    configuration: String,
    registered: OnceCell<PathBuf>,
    build_lock: Mutex<()>,
}

impl BuildService {
    pub fn new(config: &ToolchainConfig) -> Self {
        Self {
            configured: config.dotnet.clone(),
            configuration: config.configuration.clone(),
            registered: OnceCell::new(),
            build_lock: Mutex::new(()),
        }
    }

    /// Locate and probe the toolchain. Runs at most once successfully per
    /// service; a failed registration is retried by the next caller.
    pub async fn toolchain(&self) -> Result<&Path, BuildError> {
        self.registered
            .get_or_try_init(|| async {
                let path = match &self.configured {
                    Some(path) => path.clone(),
                    None => which::which("dotnet").map_err(|e| {
                        BuildError::ToolchainUnavailable(format!("dotnet not found on PATH: {e}"))
                    })?,
                };

                let probe = ToolCommand::new(&path).arg("--version").run().await?;
                if !probe.success() {
                    return Err(BuildError::ToolchainUnavailable(format!(
                        "{} --version exited with {:?}: {}",
                        path.display(),
                        probe.exit_code(),
                        probe.combined_log()
                    )));
                }

                tracing::info!(
                    toolchain = %path.display(),
                    version = %probe.stdout.trim(),
                    "registered build toolchain"
                );
                Ok(path)
            })
            .await
            .map(PathBuf::as_path)
    }

    /// Publish the project found in `source_dir` in release mode.
    pub async fn publish(&self, source_dir: &Path) -> Result<PublishedOutput, BuildError> {
        let project = find_project(source_dir)?;
        let toolchain = self.toolchain().await?;

        let workdir = tempfile::Builder::new()
            .prefix("azdeploy-publish-")
            .tempdir()?;
        let output_dir = publish_dir(workdir.path());
        prepare_output_dir(&output_dir)?;

        let command = ToolCommand::new(toolchain)
            .arg("publish")
            .arg(project.path())
            .arg("--configuration")
            .arg(&self.configuration)
            .arg("--output")
            .arg(&output_dir)
            .current_dir(source_dir);

        let output = {
            let _guard = self.build_lock.lock().await;
            tracing::info!(project = %project.name(), "publishing project");
            command.run().await?
        };

        if !output.success() {
            return Err(BuildError::BuildFailed {
                project: project.name().to_string(),
                exit_code: output.exit_code(),
                log: output.combined_log(),
            });
        }

        tracing::debug!(
            project = %project.name(),
            output = %output_dir.display(),
            "publish finished"
        );
        Ok(PublishedOutput { project, workdir })
    }
}

/// Remove anything left at `dir` and create it empty.
pub fn prepare_output_dir(dir: &Path) -> std::io::Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)
}
