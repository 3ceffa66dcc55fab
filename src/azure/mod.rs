// ABOUTME: Cloud provider access: credentials, the management API client and its capability traits.
// ABOUTME: Every resource a deployment creates lives in one resource group.

mod auth;
mod client;
mod error;
mod models;
pub mod traits;

pub use auth::{Credentials, TokenSource};
pub use client::ArmClient;
pub use error::ArmError;
pub use models::{
    AppServicePlan, AppSetting, ContainerApp, ContainerAppSpec, ManagedEnvironment, PlanSku,
    Registry, ResourceGroupHandle, Site, SiteKind, SiteSpec, StorageAccount,
};
pub use traits::{
    CloudProvider, ContainerAppOps, RegistryOps, ResourceGroupOps, StorageOps, WebSiteOps,
};
