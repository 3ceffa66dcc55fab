// ABOUTME: Configuration types and parsing for azdeploy.yml.
// ABOUTME: Falls back to the standard AZURE_* environment variables when no file exists.

mod credentials;
mod endpoints;
mod env_value;
mod init;
mod readiness;
mod runtime;
mod toolchain;

pub use credentials::{CLIENT_ID_VAR, CLIENT_SECRET_VAR, CredentialsConfig, TENANT_ID_VAR};
pub use endpoints::EndpointsConfig;
pub use env_value::EnvValue;
pub use init::init_config;
pub use readiness::ReadinessConfig;
pub use runtime::RuntimeConfig;
pub use toolchain::ToolchainConfig;

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "azdeploy.yml";
pub const CONFIG_FILENAME_ALT: &str = "azdeploy.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".azdeploy/config.yml";

pub const SUBSCRIPTION_ID_VAR: &str = "AZURE_SUBSCRIPTION_ID";
pub const LOCATION_VAR: &str = "AZURE_LOCATION";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_subscription_id")]
    pub subscription_id: EnvValue,

    #[serde(default = "default_location")]
    pub location: String,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub endpoints: EndpointsConfig,

    #[serde(default)]
    pub readiness: ReadinessConfig,

    /// Upper bound on a whole deployment, rollback excluded.
    #[serde(default, with = "humantime_serde")]
    pub deadline: Option<Duration>,

    #[serde(default)]
    pub toolchain: ToolchainConfig,

    #[serde(default)]
    pub runtime: RuntimeConfig,
}

fn default_subscription_id() -> EnvValue {
    EnvValue::from_env(SUBSCRIPTION_ID_VAR)
}

fn default_location() -> String {
    "westeurope".to_string()
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Discover a config file, or build one from the environment if none exists.
    pub fn discover_or_env(dir: &Path) -> Result<Self> {
        match Self::discover(dir) {
            Err(Error::ConfigNotFound(_)) => {
                tracing::debug!("no configuration file, using environment");
                Ok(Self::from_env())
            }
            other => other,
        }
    }

    /// Configuration taken entirely from `AZURE_*` variables. Values are
    /// read when resolved, so missing variables surface at first use.
    pub fn from_env() -> Self {
        let location = std::env::var(LOCATION_VAR)
            .ok()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(default_location);

        Config {
            location,
            ..Self::template()
        }
    }

    pub fn template() -> Self {
        Config {
            subscription_id: default_subscription_id(),
            location: default_location(),
            credentials: CredentialsConfig::default(),
            endpoints: EndpointsConfig::default(),
            readiness: ReadinessConfig::default(),
            deadline: None,
            toolchain: ToolchainConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }

    pub fn subscription_id(&self) -> Result<String> {
        self.subscription_id.resolve()
    }

    fn validate(&self) -> Result<()> {
        if self.location.trim().is_empty() {
            return Err(Error::InvalidConfig("location must not be empty".into()));
        }
        if self.readiness.interval.is_zero() {
            return Err(Error::InvalidConfig(
                "readiness.interval must be greater than zero".into(),
            ));
        }
        if self.readiness.interval > self.readiness.timeout {
            return Err(Error::InvalidConfig(
                "readiness.interval must not exceed readiness.timeout".into(),
            ));
        }
        if !matches!(self.endpoints.site_scheme.as_str(), "http" | "https") {
            return Err(Error::InvalidConfig(format!(
                "endpoints.site_scheme must be http or https, got {}",
                self.endpoints.site_scheme
            )));
        }
        Ok(())
    }
}
