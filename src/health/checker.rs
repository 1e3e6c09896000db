// src/health/checker.rs
use crate::config::DbConfig;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

/// Failure modes of the liveness probe.
///
/// One top-level error type; transport failures keep the underlying
/// `reqwest` cause in the source chain, status mismatches carry the
/// returned code. The message always names the probed URL so operators
/// can tell a wrong URL from a down server from an error status.
#[derive(Debug, Error)]
pub enum HealthCheckError {
    #[error("Failed to connect to gost server. url: {url}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected status from gost server. url: {url}, status: {status}")]
    UnexpectedStatus { url: String, status: StatusCode },
}

/// Probes `{url}/health` on the configured gost server.
pub struct HealthChecker {
    client: Client,
}

impl HealthChecker {
    /// Creates a checker. The client enforces no timeout; callers that
    /// need a deadline wrap `check` with one.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Verifies the gost server answers `GET /health` with 200.
    ///
    /// A no-op for every backend other than `http`: the other drivers
    /// surface connection failures on first use. Each call probes again;
    /// nothing is cached.
    pub async fn check(&self, config: &DbConfig) -> Result<(), HealthCheckError> {
        if !config.fetches_via_http() {
            return Ok(());
        }

        let url = format!("{}/health", config.url);
        debug!("Checking gost server health endpoint");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|source| HealthCheckError::Unreachable {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(HealthCheckError::UnexpectedStatus { url, status });
        }

        Ok(())
    }
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new()
    }
}
