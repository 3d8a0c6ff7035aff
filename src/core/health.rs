//! Liveness probe for the bootstrapped service.
//!
//! The orchestrator expects the service on a fixed port with a health
//! endpoint that answers `200` once the process is ready.

use std::time::Instant;
use tracing::debug;

use crate::core::config::ServiceConfig;
use crate::core::http::{self, HttpSettings};
use crate::error::{HealthError, Result, VaultError};

/// Where the service listens and what it answers on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceContract {
    pub port: u16,
    pub health_path: String,
}

impl From<&ServiceConfig> for ServiceContract {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            port: config.port,
            health_path: config.health_path.clone(),
        }
    }
}

impl Default for ServiceContract {
    fn default() -> Self {
        Self::from(&ServiceConfig::default())
    }
}

impl ServiceContract {
    /// Health endpoint URL on `host`.
    pub fn health_url(&self, host: &str) -> String {
        format!("http://{}:{}{}", host, self.port, self.health_path)
    }
}

/// `GET` the URL; healthy only on HTTP 200.
///
/// Returns the status code on success.
///
/// # Errors
///
/// Returns `HealthError::Unreachable` when no response arrives, or
/// `HealthError::Unhealthy` for any status other than 200.
pub fn probe(url: &str, settings: &HttpSettings) -> Result<u16> {
    let client = settings.probe_client(settings.timeout)?;
    let started = Instant::now();

    debug!(url = %url, "probing health endpoint");
    let response = client.get(url).send().map_err(|e| {
        let reason = match http::transport_error(url, e, started) {
            VaultError::Timeout { elapsed, .. } => format!("timed out after {:?}", elapsed),
            other => other.to_string(),
        };
        HealthError::Unreachable {
            url: url.to_string(),
            reason,
        }
    })?;

    let status = response.status().as_u16();
    debug!(url = %url, status, "health endpoint answered");
    if status != 200 {
        return Err(HealthError::Unhealthy {
            url: url.to_string(),
            status,
        }
        .into());
    }
    Ok(status)
}
