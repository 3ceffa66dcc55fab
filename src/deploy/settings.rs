// ABOUTME: System app settings per deployment kind and their merge with caller variables.
// ABOUTME: System keys come first in a fixed order; caller keys follow in caller order.

use super::EnvVars;
use crate::azure::AppSetting;
use crate::config::RuntimeConfig;
use chrono::{DateTime, SecondsFormat, Utc};

pub const DEPLOYMENT_TIMESTAMP: &str = "DEPLOYMENT_TIMESTAMP";
pub const WEB_JOBS_STORAGE: &str = "AzureWebJobsStorage";
pub const FUNCTIONS_WORKER_RUNTIME: &str = "FUNCTIONS_WORKER_RUNTIME";
pub const FUNCTIONS_EXTENSION_VERSION: &str = "FUNCTIONS_EXTENSION_VERSION";
pub const RUN_FROM_PACKAGE: &str = "WEBSITE_RUN_FROM_PACKAGE";
pub const BUILD_DURING_DEPLOYMENT: &str = "SCM_DO_BUILD_DURING_DEPLOYMENT";
pub const ASPNETCORE_URLS: &str = "ASPNETCORE_URLS";

fn timestamp(at: DateTime<Utc>) -> AppSetting {
    AppSetting::new(
        DEPLOYMENT_TIMESTAMP,
        at.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

pub fn function_settings(
    at: DateTime<Utc>,
    storage_connection: &str,
    runtime: &RuntimeConfig,
) -> Vec<AppSetting> {
    vec![
        timestamp(at),
        AppSetting::new(WEB_JOBS_STORAGE, storage_connection),
        AppSetting::new(FUNCTIONS_WORKER_RUNTIME, &runtime.functions_worker_runtime),
        AppSetting::new(FUNCTIONS_EXTENSION_VERSION, &runtime.functions_extension_version),
        AppSetting::new(RUN_FROM_PACKAGE, "1"),
    ]
}

pub fn web_app_settings(at: DateTime<Utc>) -> Vec<AppSetting> {
    vec![
        timestamp(at),
        AppSetting::new(RUN_FROM_PACKAGE, "1"),
        AppSetting::new(BUILD_DURING_DEPLOYMENT, "false"),
    ]
}

pub fn container_app_settings(at: DateTime<Utc>, port: u16) -> Vec<AppSetting> {
    vec![
        timestamp(at),
        AppSetting::new(ASPNETCORE_URLS, format!("http://+:{port}")),
    ]
}

/// Append caller variables after the system settings. Nothing is dropped or
/// renamed; a caller key equal to a system key appears twice and the
/// provider keeps the later one.
pub fn merge(mut system: Vec<AppSetting>, caller: &EnvVars) -> Vec<AppSetting> {
    system.extend(caller.iter().map(|(k, v)| AppSetting::new(k, v)));
    system
}
