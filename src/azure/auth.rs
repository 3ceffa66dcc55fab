// ABOUTME: Bearer tokens for the management API via the client-credentials flow.
// ABOUTME: Tokens are cached until shortly before they expire.

use super::ArmError;
use parking_lot::Mutex;
use serde::Deserialize;
use std::fmt;
use std::time::{Duration, Instant};

/// Refresh this long before the token actually expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub enum Credentials {
    /// Service principal with a client secret.
    ClientSecret {
        tenant_id: String,
        client_id: String,
        client_secret: String,
    },
    /// Pre-issued bearer token, used as-is.
    AccessToken(String),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ClientSecret {
                tenant_id,
                client_id,
                ..
            } => f
                .debug_struct("ClientSecret")
                .field("tenant_id", tenant_id)
                .field("client_id", client_id)
                .field("client_secret", &"<redacted>")
                .finish(),
            Credentials::AccessToken(_) => f.debug_tuple("AccessToken").field(&"<redacted>").finish(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: String,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Issues tokens for one scope and caches the latest.
#[derive(Debug)]
pub struct TokenSource {
    http: reqwest::Client,
    authority: String,
    scope: String,
    credentials: Credentials,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(
        http: reqwest::Client,
        authority: &str,
        resource: &str,
        credentials: Credentials,
    ) -> Self {
        Self {
            http,
            authority: authority.trim_end_matches('/').to_string(),
            scope: format!("{}/.default", resource.trim_end_matches('/')),
            credentials,
            cached: Mutex::new(None),
        }
    }

    /// A valid bearer token, fetching a new one when the cached token is
    /// missing or about to expire.
    pub async fn token(&self) -> Result<String, ArmError> {
        let (tenant_id, client_id, client_secret) = match &self.credentials {
            Credentials::AccessToken(token) => return Ok(token.clone()),
            Credentials::ClientSecret {
                tenant_id,
                client_id,
                client_secret,
            } => (tenant_id, client_id, client_secret),
        };

        let cached = self.cached.lock().clone();
        if let Some(cached) = cached
            && Instant::now() < cached.refresh_at
        {
            return Ok(cached.value);
        }

        let url = format!("{}/{}/oauth2/v2.0/token", self.authority, tenant_id);
        tracing::debug!(url = %url, client_id = %client_id, "requesting access token");

        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) if !err.error.is_empty() => {
                    format!("{}: {}", err.error, err.error_description)
                }
                _ => format!("token endpoint returned {status}"),
            };
            return Err(ArmError::Authentication { message });
        }

        let token: TokenResponse = response.json().await.map_err(|e| ArmError::Decode {
            operation: "token request".into(),
            message: e.to_string(),
        })?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        *self.cached.lock() = Some(CachedToken {
            value: token.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });

        Ok(token.access_token)
    }
}
