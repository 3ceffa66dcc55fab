// ABOUTME: Endpoints of the management API, the token authority and deployed sites.
// ABOUTME: Overridable so tests and sovereign clouds can point elsewhere.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_management")]
    pub management: String,

    #[serde(default = "default_authority")]
    pub authority: String,

    /// Scheme used for site and SCM host names returned by the provider.
    #[serde(default = "default_site_scheme")]
    pub site_scheme: String,

    /// Delay between polls of a long-running provider operation.
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    #[serde(default = "default_operation_timeout", with = "humantime_serde")]
    pub operation_timeout: Duration,
}

fn default_management() -> String {
    "https://management.azure.com".to_string()
}

fn default_authority() -> String {
    "https://login.microsoftonline.com".to_string()
}

fn default_site_scheme() -> String {
    "https".to_string()
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_operation_timeout() -> Duration {
    Duration::from_secs(30 * 60)
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        EndpointsConfig {
            management: default_management(),
            authority: default_authority(),
            site_scheme: default_site_scheme(),
            poll_interval: default_poll_interval(),
            operation_timeout: default_operation_timeout(),
        }
    }
}
