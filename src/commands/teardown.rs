// ABOUTME: Teardown command implementation.
// ABOUTME: Deletes the resource group of a detached deployment and surfaces failures.

use azdeploy::config::Config;
use azdeploy::error::{Error, Result};
use azdeploy::output::{Event, Output};
use azdeploy::types::AppName;

pub async fn teardown(config: &Config, name: &str, output: Output) -> Result<()> {
    let name = AppName::new(name).map_err(|e| Error::InvalidArgument(e.to_string()))?;
    let group = name.resource_group();
    let orchestrator = super::orchestrator(config)?;

    tracing::info!(group = %group, "tearing down deployment");
    orchestrator.delete_resource_group(&group).await?;
    output.emit(&Event::TornDown {
        name: name.to_string(),
        resource_group: group.to_string(),
        duration_secs: output.elapsed_secs(),
    });
    Ok(())
}
