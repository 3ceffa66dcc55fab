// ABOUTME: Locations of the external build toolchain and container engine.

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct ToolchainConfig {
    /// Explicit toolchain binary. Located on `PATH` when unset.
    #[serde(default)]
    pub dotnet: Option<PathBuf>,

    #[serde(default = "default_docker")]
    pub docker: PathBuf,

    #[serde(default = "default_configuration")]
    pub configuration: String,
}

fn default_docker() -> PathBuf {
    PathBuf::from("docker")
}

fn default_configuration() -> String {
    "Release".to_string()
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        ToolchainConfig {
            dotnet: None,
            docker: default_docker(),
            configuration: default_configuration(),
        }
    }
}
