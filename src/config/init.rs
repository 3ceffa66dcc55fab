// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates azdeploy.yml template files.

use std::path::Path;

use crate::error::{Error, Result};

use super::{CONFIG_FILENAME, Config, SUBSCRIPTION_ID_VAR};
use super::{CLIENT_ID_VAR, CLIENT_SECRET_VAR, TENANT_ID_VAR};

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let yaml = generate_template_yaml(&Config::template());
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"subscription_id:
  env: {SUBSCRIPTION_ID_VAR}
location: {location}
credentials:
  tenant_id:
    env: {TENANT_ID_VAR}
  client_id:
    env: {CLIENT_ID_VAR}
  client_secret:
    env: {CLIENT_SECRET_VAR}
readiness:
  timeout: {timeout}
  interval: {interval}
  path: {path}
# Abort and roll back deployments that take longer than this.
# deadline: 20m
toolchain:
  configuration: {configuration}
runtime:
  container_port: {port}
"#,
        location = config.location,
        timeout = format!("{}s", config.readiness.timeout.as_secs()),
        interval = format!("{}s", config.readiness.interval.as_secs()),
        path = config.readiness.path,
        configuration = config.toolchain.configuration,
        port = config.runtime.container_port,
    )
}
