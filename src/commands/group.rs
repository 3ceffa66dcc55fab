// ABOUTME: Resource group subcommands.

use crate::cli::GroupCommands;
use azdeploy::config::Config;
use azdeploy::error::{Error, Result};
use azdeploy::output::{Event, GroupSummary, Output};
use azdeploy::types::ResourceGroupName;

fn group_name(name: &str) -> Result<ResourceGroupName> {
    ResourceGroupName::new(name).map_err(|e| Error::InvalidArgument(e.to_string()))
}

pub async fn group(config: &Config, command: GroupCommands, output: Output) -> Result<()> {
    let orchestrator = super::orchestrator(config)?;

    let event = match command {
        GroupCommands::Create { name } => {
            let group = orchestrator.create_resource_group(&group_name(&name)?).await?;
            Event::GroupCreated(GroupSummary::from(&group))
        }
        GroupCommands::Delete { name } => {
            let name = group_name(&name)?;
            orchestrator.delete_resource_group(&name).await?;
            Event::GroupDeleted {
                name: name.to_string(),
            }
        }
        GroupCommands::Exists { name } => {
            let name = group_name(&name)?;
            let exists = orchestrator.resource_group_exists(&name).await?;
            Event::GroupExists {
                name: name.to_string(),
                exists,
            }
        }
        GroupCommands::List => {
            let groups = orchestrator.list_resource_groups().await?;
            Event::Groups {
                groups: groups.iter().map(GroupSummary::from).collect(),
            }
        }
    };
    output.emit(&event);
    Ok(())
}
