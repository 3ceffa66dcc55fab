// ABOUTME: Deploy command implementation.
// ABOUTME: Runs one deployment and either detaches or releases the handle.

use azdeploy::config::Config;
use azdeploy::deploy::{DeploymentKind, DeploymentRequest, EnvVars};
use azdeploy::error::{Error, Result};
use azdeploy::output::{Event, Output};
use azdeploy::types::AppName;
use std::path::PathBuf;

pub struct DeployArgs {
    pub kind: DeploymentKind,
    pub source: PathBuf,
    pub name: String,
    pub env: Vec<String>,
    pub ephemeral: bool,
}

pub async fn deploy(config: &Config, args: DeployArgs, output: Output) -> Result<()> {
    let name = AppName::new(&args.name).map_err(|e| Error::InvalidArgument(e.to_string()))?;
    let env =
        EnvVars::parse_assignments(&args.env).map_err(|e| Error::InvalidArgument(e.to_string()))?;
    let orchestrator = super::orchestrator(config)?;

    output.emit(&Event::Deploying {
        name: name.to_string(),
        kind: args.kind.to_string(),
        source: args.source.display().to_string(),
    });

    let request = DeploymentRequest::new(args.kind, args.source, name, env);
    let mut handle = orchestrator.deploy(request).await?;
    output.emit(&Event::EndpointReady {
        name: handle.name().to_string(),
        url: handle.url().to_string(),
    });

    if args.ephemeral {
        handle.release().await?;
    }

    let released = handle.is_released();
    let info = handle.into_detached();
    output.emit(&Event::deployed(&info, released, output.elapsed_secs()));
    Ok(())
}
