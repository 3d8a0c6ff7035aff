//! Ambient credentials.
//!
//! A credential turns whatever identity the process runs under into a
//! bearer token for the vault resource. Several sources are supported and
//! tried in order by [`ChainedCredential`]:
//!
//! - **environment**: service principal with a client secret
//! - **workload-identity**: federated token file (AKS workload identity)
//! - **managed-identity**: App Service identity endpoint or IMDS
//! - **azure-cli**: `az account get-access-token`
//!
//! ## Adding a New Source
//!
//! 1. Implement the `Credential` trait
//! 2. Add a `from_lookup` constructor returning `None` when unconfigured
//! 3. Register it in `ChainedCredential::from_lookup`

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use std::fmt;

use crate::core::retry::Deadline;
use crate::core::types::SecretValue;
use crate::error::{Result, VaultError};

mod azure_cli;
mod chain;
mod environment;
mod managed;

pub use azure_cli::AzureCliCredential;
pub use chain::ChainedCredential;
pub use environment::{ClientSecretCredential, WorkloadIdentityCredential};
pub use managed::ManagedIdentityCredential;

/// Source of bearer tokens for the vault.
pub trait Credential {
    /// Short name for logs and error messages.
    fn name(&self) -> &'static str;

    /// Obtain a token for the vault resource.
    ///
    /// # Errors
    ///
    /// `AuthError::Rejected` when the identity provider refused the
    /// identity; `AuthError::Failed` or a transport error when this source
    /// could not produce a token.
    fn get_token(&self) -> Result<AccessToken>;

    /// [`get_token`](Self::get_token), finished by `deadline`.
    fn get_token_until(&self, _deadline: Deadline) -> Result<AccessToken> {
        self.get_token()
    }
}

impl<C: Credential + ?Sized> Credential for Box<C> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn get_token(&self) -> Result<AccessToken> {
        (**self).get_token()
    }

    fn get_token_until(&self, deadline: Deadline) -> Result<AccessToken> {
        (**self).get_token_until(deadline)
    }
}

/// A bearer token with its expiry, if known.
#[derive(Clone)]
pub struct AccessToken {
    token: SecretValue,
    expires_on: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, expires_on: Option<DateTime<Utc>>) -> Self {
        Self {
            token: SecretValue::new(token),
            expires_on,
        }
    }

    pub fn secret(&self) -> &str {
        self.token.expose()
    }

    pub fn expires_on(&self) -> Option<DateTime<Utc>> {
        self.expires_on
    }

    /// Whether the token expires within the next five minutes.
    pub fn expires_soon(&self, now: DateTime<Utc>) -> bool {
        match self.expires_on {
            Some(expiry) => expiry - chrono::Duration::minutes(5) <= now,
            None => false,
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_on", &self.expires_on)
            .finish()
    }
}

/// Token payload returned by the identity endpoints and the Azure CLI.
///
/// The endpoints disagree on field names and on whether numbers are
/// strings, so every variant is accepted.
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(alias = "accessToken")]
    access_token: String,
    #[serde(default)]
    expires_in: Option<serde_json::Value>,
    #[serde(default)]
    expires_on: Option<serde_json::Value>,
    #[serde(default, rename = "expiresOn")]
    expires_on_local: Option<String>,
}

impl TokenResponse {
    pub(crate) fn into_token(self, now: DateTime<Utc>) -> AccessToken {
        let expires_on = self
            .expires_on
            .as_ref()
            .and_then(as_seconds)
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .or_else(|| {
                self.expires_in
                    .as_ref()
                    .and_then(as_seconds)
                    .map(|secs| now + chrono::Duration::seconds(secs))
            })
            .or_else(|| self.expires_on_local.as_deref().and_then(parse_local_time));

        AccessToken::new(self.access_token, expires_on)
    }
}

/// Parse a token payload, mapping JSON errors to `Malformed`.
pub(crate) fn parse_token(target: &str, body: &[u8], now: DateTime<Utc>) -> Result<AccessToken> {
    let response: TokenResponse = serde_json::from_slice(body).map_err(|e| VaultError::Malformed {
        target: target.to_string(),
        reason: e.to_string(),
    })?;
    Ok(response.into_token(now))
}

fn as_seconds(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The Azure CLI reports `expiresOn` in local time without an offset.
fn parse_local_time(raw: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}
