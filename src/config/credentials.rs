// ABOUTME: Service principal credentials or a pre-issued access token.
// ABOUTME: Values default to the standard AZURE_* environment variables.

use crate::azure::Credentials;
use crate::error::Result;
use serde::Deserialize;

use super::EnvValue;

pub const TENANT_ID_VAR: &str = "AZURE_TENANT_ID";
pub const CLIENT_ID_VAR: &str = "AZURE_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "AZURE_CLIENT_SECRET";

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_tenant_id")]
    pub tenant_id: EnvValue,

    #[serde(default = "default_client_id")]
    pub client_id: EnvValue,

    #[serde(default = "default_client_secret")]
    pub client_secret: EnvValue,

    /// Bearer token used as-is, bypassing the token endpoint.
    #[serde(default)]
    pub access_token: Option<EnvValue>,
}

fn default_tenant_id() -> EnvValue {
    EnvValue::from_env(TENANT_ID_VAR)
}

fn default_client_id() -> EnvValue {
    EnvValue::from_env(CLIENT_ID_VAR)
}

fn default_client_secret() -> EnvValue {
    EnvValue::from_env(CLIENT_SECRET_VAR)
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        CredentialsConfig {
            tenant_id: default_tenant_id(),
            client_id: default_client_id(),
            client_secret: default_client_secret(),
            access_token: None,
        }
    }
}

impl CredentialsConfig {
    pub fn resolve(&self) -> Result<Credentials> {
        if let Some(token) = &self.access_token {
            return Ok(Credentials::AccessToken(token.resolve()?));
        }

        Ok(Credentials::ClientSecret {
            tenant_id: self.tenant_id.resolve()?,
            client_id: self.client_id.resolve()?,
            client_secret: self.client_secret.resolve()?,
        })
    }
}
