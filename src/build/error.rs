// ABOUTME: Error types for project discovery and the publish toolchain.
// ABOUTME: Build failures stay distinct from provider errors so rollback can tell them apart.

use crate::process::ToolError;
use std::path::PathBuf;

/// Errors from locating and publishing a project.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// No project file in the source directory.
    #[error("no project file found in {}", .directory.display())]
    ProjectNotFound { directory: PathBuf },

    /// More than one project file and no way to choose.
    #[error("multiple project files found in {}: {}", .directory.display(), .candidates.join(", "))]
    AmbiguousProject {
        directory: PathBuf,
        candidates: Vec<String>,
    },

    /// The toolchain could not be located or does not run.
    #[error("build toolchain unavailable: {0}")]
    ToolchainUnavailable(String),

    /// The toolchain ran and reported failure.
    #[error("build of project {project} failed{}:\n{log}", .exit_code.map(|c| format!(" with exit code {c}")).unwrap_or_default())]
    BuildFailed {
        project: String,
        exit_code: Option<i32>,
        log: String,
    },

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("publish directory error: {0}")]
    Io(#[from] std::io::Error),
}
