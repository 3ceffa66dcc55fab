// ABOUTME: Provider resources returned by capability traits and specs passed to them.
// ABOUTME: Wire-level JSON shapes stay private to the client.

use crate::image::RegistryCredentials;
use crate::types::{ImageRef, ResourceGroupName};
use serde::Serialize;

/// A created resource group: the unit of rollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroupHandle {
    pub name: ResourceGroupName,
    pub location: String,
}

#[derive(Debug, Clone)]
pub struct StorageAccount {
    pub name: String,
    /// Connection string built from the account's first key.
    pub connection_string: String,
}

/// Hosting plan tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSku {
    /// Serverless consumption plan for function apps.
    Consumption,
    Basic,
}

impl PlanSku {
    pub(crate) fn name(self) -> &'static str {
        match self {
            PlanSku::Consumption => "Y1",
            PlanSku::Basic => "B1",
        }
    }

    pub(crate) fn tier(self) -> &'static str {
        match self {
            PlanSku::Consumption => "Dynamic",
            PlanSku::Basic => "Basic",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppServicePlan {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKind {
    FunctionApp,
    WebApp,
}

impl SiteKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            SiteKind::FunctionApp => "functionapp,linux",
            SiteKind::WebApp => "app,linux",
        }
    }
}

/// One name/value pair of site app settings or container env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppSetting {
    pub name: String,
    pub value: String,
}

impl AppSetting {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SiteSpec {
    pub kind: SiteKind,
    pub plan_id: String,
    pub linux_fx_version: String,
    /// Sent in order. Duplicate names are resolved by the provider.
    pub app_settings: Vec<AppSetting>,
}

/// A function app or web app.
#[derive(Debug, Clone)]
pub struct Site {
    pub name: String,
    /// Public base URL, e.g. `https://name.azurewebsites.net`.
    pub url: String,
    /// Base URL of the deployment (SCM) endpoint.
    pub scm_url: String,
}

#[derive(Debug, Clone)]
pub struct Registry {
    pub name: String,
    pub login_server: String,
}

#[derive(Debug, Clone)]
pub struct ManagedEnvironment {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ContainerAppSpec {
    pub environment_id: String,
    pub image: ImageRef,
    pub registry: RegistryCredentials,
    pub target_port: u16,
    pub env: Vec<AppSetting>,
}

#[derive(Debug, Clone)]
pub struct ContainerApp {
    pub name: String,
    /// Public base URL of the external ingress.
    pub url: String,
}
