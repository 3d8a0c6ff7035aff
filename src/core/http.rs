//! Shared blocking HTTP client setup and error mapping.

use std::time::{Duration, Instant};

use reqwest::blocking::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;

use crate::core::constants;
use crate::core::retry::RetryPolicy;
use crate::error::{Result, VaultError};

/// Timeout and retry settings shared by every remote call.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Upper bound for a single request, connect included
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(constants::DEFAULT_REQUEST_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }
}

impl HttpSettings {
    /// Build a client honoring these settings.
    pub fn client(&self) -> Result<Client> {
        Self::build(self.builder())
    }

    /// Build a client for link-local endpoints that may not exist on this
    /// host: tighter connect timeout, never proxied.
    pub fn probe_client(&self, connect: Duration) -> Result<Client> {
        Self::build(
            self.builder()
                .connect_timeout(connect.min(self.timeout))
                .no_proxy(),
        )
    }

    fn builder(&self) -> ClientBuilder {
        Client::builder()
            .user_agent(constants::USER_AGENT)
            .timeout(self.timeout)
            .connect_timeout(self.timeout)
    }

    fn build(builder: ClientBuilder) -> Result<Client> {
        builder.build().map_err(|e| {
            VaultError::Connectivity {
                target: "http client".to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// Map a transport error onto the vault taxonomy.
pub(crate) fn transport_error(target: &str, err: reqwest::Error, started: Instant) -> VaultError {
    if err.is_timeout() {
        VaultError::Timeout {
            target: target.to_string(),
            elapsed: started.elapsed(),
        }
    } else {
        VaultError::Connectivity {
            target: target.to_string(),
            reason: root_cause(&err),
        }
    }
}

/// Innermost error message; reqwest wraps the interesting part.
fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(next) = current.source() {
        current = next;
    }
    current.to_string()
}

/// Decode a JSON body.
pub(crate) fn read_json<T: DeserializeOwned>(target: &str, response: Response) -> Result<T> {
    response.json::<T>().map_err(|e| {
        VaultError::Malformed {
            target: target.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Best-effort human-readable message from an error body.
///
/// Understands the Azure `{"error": {"code", "message"}}` shape and the
/// OAuth `{"error", "error_description"}` shape, else returns raw text.
pub(crate) fn error_message(response: Response) -> String {
    let text = response.text().unwrap_or_default();

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
        if let Some(message) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }
        if let Some(description) = value.get("error_description").and_then(|d| d.as_str()) {
            return description.lines().next().unwrap_or_default().to_string();
        }
        if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
            return error.to_string();
        }
    }

    text.trim().chars().take(200).collect()
}
