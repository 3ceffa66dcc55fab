// ABOUTME: Hosting plan, site and zip deploy operations for function apps and web apps.

use super::sealed::Sealed;
use crate::azure::{AppServicePlan, ArmError, PlanSku, Site, SiteSpec};
use crate::types::ResourceGroupName;
use async_trait::async_trait;

#[async_trait]
pub trait WebSiteOps: Sealed + Send + Sync {
    async fn create_plan(
        &self,
        group: &ResourceGroupName,
        name: &str,
        sku: PlanSku,
    ) -> Result<AppServicePlan, ArmError>;

    async fn create_site(
        &self,
        group: &ResourceGroupName,
        name: &str,
        spec: &SiteSpec,
    ) -> Result<Site, ArmError>;

    /// Upload a zip archive and wait for the synchronous deployment to finish.
    async fn deploy_zip(&self, site: &Site, archive: Vec<u8>) -> Result<(), ArmError>;
}
