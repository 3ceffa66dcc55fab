// ABOUTME: Command module aggregator for the azdeploy CLI.
// ABOUTME: Re-exports deploy, teardown and resource group command handlers.

mod deploy;
mod group;
mod teardown;

pub use deploy::{DeployArgs, deploy};
pub use group::group;
pub use teardown::teardown;

use azdeploy::azure::ArmClient;
use azdeploy::config::Config;
use azdeploy::deploy::Orchestrator;
use azdeploy::error::Result;
use std::sync::Arc;

fn orchestrator(config: &Config) -> Result<Orchestrator<ArmClient>> {
    let client = ArmClient::from_config(config)?;
    Ok(Orchestrator::from_config(Arc::new(client), config)?)
}
