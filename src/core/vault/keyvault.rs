//! Azure Key Vault secret source.
//!
//! Reads the current version of each secret with
//! `GET {vault}/secrets/{name}?api-version=7.4`, authorized by a bearer
//! token from a [`Credential`]. The token is cached across reads; a 401
//! drops it and the read is tried once more with a fresh one.
//!
//! ## Usage
//!
//! ```ignore
//! let settings = HttpSettings::default();
//! let credential = ChainedCredential::from_env(&settings)?;
//! let vault = KeyVault::new("https://my-vault.vault.azure.net", credential, &settings)?;
//! vault.authenticate()?;
//! ```

use std::cell::RefCell;
use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, trace};

use super::SecretSource;
use crate::core::constants;
use crate::core::credential::{AccessToken, Credential};
use crate::core::http::{self, HttpSettings};
use crate::core::retry::{retry, Deadline, RetryPolicy};
use crate::core::types::{SecretName, SecretValue};
use crate::error::{AuthError, Error, Result, VaultError};

/// Body of a successful secret read; other fields are ignored.
#[derive(Deserialize)]
struct SecretBundle {
    value: Option<String>,
}

/// Client for one vault.
pub struct KeyVault<C: Credential> {
    url: Url,
    credential: C,
    token: RefCell<Option<AccessToken>>,
    http: Client,
    timeout: Duration,
    retry: RetryPolicy,
}

impl<C: Credential> KeyVault<C> {
    /// Create a client for the vault at `url`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidUrl` if `url` is not an absolute URL.
    pub fn new(url: &str, credential: C, settings: &HttpSettings) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| VaultError::InvalidUrl(format!("{}: {}", url, e)))?;
        if url.cannot_be_a_base() {
            return Err(VaultError::InvalidUrl(url.to_string()).into());
        }

        Ok(Self {
            url,
            credential,
            token: RefCell::new(None),
            http: settings.client()?,
            timeout: settings.timeout,
            retry: settings.retry.clone(),
        })
    }

    /// Vault base URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    fn secret_url(&self, name: &SecretName) -> Result<Url> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|_| VaultError::InvalidUrl(self.url.to_string()))?
            .pop_if_empty()
            .push("secrets")
            .push(name.as_str());
        url.query_pairs_mut()
            .append_pair("api-version", constants::VAULT_API_VERSION);
        Ok(url)
    }

    /// Current token, fetching a new one when missing or about to expire.
    fn bearer(&self, deadline: Deadline) -> Result<String> {
        if let Some(token) = self.token.borrow().as_ref() {
            if !token.expires_soon(Utc::now()) {
                return Ok(token.secret().to_string());
            }
        }

        debug!(credential = self.credential.name(), "acquiring vault token");
        let token = self.credential.get_token_until(deadline)?;
        let secret = token.secret().to_string();
        *self.token.borrow_mut() = Some(token);
        Ok(secret)
    }

    fn fetch_once(&self, name: &SecretName, url: &Url, deadline: Deadline) -> Result<SecretValue> {
        let bearer = self.bearer(deadline)?;
        trace!(secret = %name, url = %url, "fetching secret");

        let started = Instant::now();
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&bearer)
            .timeout(deadline.cap(self.timeout))
            .send()
            .map_err(|e| http::transport_error(self.url.as_str(), e, started))?;

        let status = response.status().as_u16();
        match status {
            200 => {
                let bundle: SecretBundle = http::read_json(name.as_str(), response)?;
                let value = bundle.value.ok_or_else(|| VaultError::Malformed {
                    target: name.to_string(),
                    reason: "response has no value".to_string(),
                })?;
                trace!(secret = %name, "secret fetched");
                Ok(SecretValue::new(value))
            }
            401 => {
                // Token revoked or expired early.
                self.token.borrow_mut().take();
                Err(AuthError::Denied {
                    secret: name.to_string(),
                    status,
                }
                .into())
            }
            403 => Err(AuthError::Denied {
                secret: name.to_string(),
                status,
            }
            .into()),
            404 => Err(VaultError::NotFound {
                secret: name.to_string(),
            }
            .into()),
            _ => Err(VaultError::Service {
                target: format!("vault {} (secret {})", self.url, name),
                status,
                message: http::error_message(response),
            }
            .into()),
        }
    }
}

impl<C: Credential> SecretSource for KeyVault<C> {
    fn describe(&self) -> String {
        self.url.as_str().trim_end_matches('/').to_string()
    }

    fn authenticate(&self) -> Result<()> {
        self.authenticate_until(Deadline::none())
    }

    fn fetch(&self, name: &SecretName) -> Result<SecretValue> {
        self.fetch_until(name, Deadline::none())
    }

    fn authenticate_until(&self, deadline: Deadline) -> Result<()> {
        self.bearer(deadline).map(|_| ())
    }

    fn fetch_until(&self, name: &SecretName, deadline: Deadline) -> Result<SecretValue> {
        let url = self.secret_url(name)?;
        let read = || {
            retry(&self.retry, name.as_str(), deadline, || {
                self.fetch_once(name, &url, deadline)
            })
        };

        match read() {
            Err(Error::Auth(AuthError::Denied { status: 401, .. })) => {
                debug!(secret = %name, "token refused, retrying with a fresh one");
                read()
            }
            other => other,
        }
    }
}
