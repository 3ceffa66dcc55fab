// ABOUTME: Polls a deployed endpoint until it answers with a success status.
// ABOUTME: Fixed interval, per-probe timeout capped by the time left, never sleeping past the deadline.

use crate::config::ReadinessConfig;
use std::time::{Duration, Instant};

#[derive(Debug, thiserror::Error)]
pub enum ReadinessError {
    #[error("{url} did not become ready within {elapsed:?}")]
    Timeout { url: String, elapsed: Duration },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ReadinessPoller {
    http: reqwest::Client,
    probe_timeout: Duration,
}

impl ReadinessPoller {
    pub fn new(probe_timeout: Duration) -> Result<Self, ReadinessError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("azdeploy/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            probe_timeout,
        })
    }

    pub fn from_config(config: &ReadinessConfig) -> Result<Self, ReadinessError> {
        Self::new(config.probe_timeout)
    }

    /// Probe `url` every `interval` until it returns 2xx or `timeout` elapses.
    ///
    /// Non-success statuses and transport errors count as "not ready yet".
    /// The last sleep is shortened so one final probe lands on the deadline.
    /// A probe may run at most `min(probe_timeout, interval)` past it.
    pub async fn wait_until_ready(
        &self,
        url: &str,
        timeout: Duration,
        interval: Duration,
    ) -> Result<(), ReadinessError> {
        let started = Instant::now();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let remaining = timeout.saturating_sub(started.elapsed());
            let budget = self.probe_timeout.min(remaining.max(interval));
            if self.probe(url, attempt, budget).await {
                tracing::info!(url = %url, attempts = attempt, elapsed = ?started.elapsed(), "endpoint ready");
                return Ok(());
            }

            let remaining = timeout.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                return Err(ReadinessError::Timeout {
                    url: url.to_string(),
                    elapsed: started.elapsed(),
                });
            }
            tokio::time::sleep(interval.min(remaining)).await;
        }
    }

    async fn probe(&self, url: &str, attempt: u32, budget: Duration) -> bool {
        match self.http.get(url).timeout(budget).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::debug!(url = %url, attempt, status = %response.status(), "endpoint not ready");
                false
            }
            Err(e) => {
                tracing::debug!(url = %url, attempt, error = %e, "endpoint unreachable");
                false
            }
        }
    }
}
