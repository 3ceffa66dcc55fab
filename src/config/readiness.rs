// ABOUTME: Readiness polling parameters for deployed endpoints.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct ReadinessConfig {
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,

    /// Timeout of a single probe request.
    #[serde(default = "default_probe_timeout", with = "humantime_serde")]
    pub probe_timeout: Duration,

    #[serde(default = "default_path")]
    pub path: String,
}

fn default_timeout() -> Duration {
    Duration::from_secs(300)
}

fn default_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_probe_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_path() -> String {
    "/".to_string()
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        ReadinessConfig {
            timeout: default_timeout(),
            interval: default_interval(),
            probe_timeout: default_probe_timeout(),
            path: default_path(),
        }
    }
}
