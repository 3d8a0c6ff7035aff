//! Managed identity.
//!
//! App Service, Functions and Container Apps expose `IDENTITY_ENDPOINT` and
//! `IDENTITY_HEADER`. Everywhere else the instance metadata service (IMDS)
//! is probed; off Azure it is simply unreachable, which makes this source
//! unavailable rather than failed.

use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::blocking::Client;
use tracing::{debug, trace};

use super::{parse_token, AccessToken, Credential};
use crate::core::constants;
use crate::core::http::{self, HttpSettings};
use crate::core::retry::{retry, Deadline, RetryPolicy};
use crate::core::types::SecretValue;
use crate::error::{AuthError, Error, Result, VaultError};

/// IMDS answers quickly or not at all.
const IMDS_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug)]
enum Endpoint {
    AppService { url: String, header: SecretValue },
    Imds { url: String },
}

/// Token source for system- or user-assigned managed identities.
pub struct ManagedIdentityCredential {
    endpoint: Endpoint,
    client_id: Option<String>,
    http: Client,
    timeout: Duration,
    retry: RetryPolicy,
}

impl ManagedIdentityCredential {
    /// App Service style identity endpoint.
    pub fn app_service(
        url: impl Into<String>,
        header: impl Into<String>,
        client_id: Option<String>,
        settings: &HttpSettings,
    ) -> Result<Self> {
        Ok(Self {
            endpoint: Endpoint::AppService {
                url: url.into(),
                header: SecretValue::new(header),
            },
            client_id,
            http: settings.client()?,
            timeout: settings.timeout,
            retry: settings.retry.clone(),
        })
    }

    /// Instance metadata service at `url`.
    ///
    /// Not retried: a probe that cannot connect means there is no IMDS.
    pub fn imds(
        url: impl Into<String>,
        client_id: Option<String>,
        settings: &HttpSettings,
    ) -> Result<Self> {
        Ok(Self {
            endpoint: Endpoint::Imds { url: url.into() },
            client_id,
            http: settings.probe_client(IMDS_CONNECT_TIMEOUT)?,
            timeout: settings.timeout,
            retry: RetryPolicy::none(),
        })
    }

    /// Pick the endpoint advertised by the environment, defaulting to IMDS.
    pub fn from_lookup(
        lookup: &dyn Fn(&str) -> Option<String>,
        settings: &HttpSettings,
    ) -> Result<Self> {
        let client_id = lookup("AZURE_CLIENT_ID").filter(|v| !v.trim().is_empty());

        match (lookup("IDENTITY_ENDPOINT"), lookup("IDENTITY_HEADER")) {
            (Some(url), Some(header)) => {
                debug!(endpoint = %url, "app service managed identity configured");
                Self::app_service(url, header, client_id, settings)
            }
            _ => Self::imds(constants::IMDS_ENDPOINT, client_id, settings),
        }
    }

    fn url(&self) -> &str {
        match &self.endpoint {
            Endpoint::AppService { url, .. } | Endpoint::Imds { url } => url,
        }
    }

    fn request_once(&self, deadline: Deadline) -> Result<AccessToken> {
        let mut query: Vec<(&str, &str)> = vec![("resource", constants::VAULT_RESOURCE)];
        if let Some(client_id) = &self.client_id {
            query.push(("client_id", client_id.as_str()));
        }

        let request = match &self.endpoint {
            Endpoint::AppService { url, header } => {
                query.push(("api-version", constants::APP_SERVICE_API_VERSION));
                self.http
                    .get(url)
                    .header("X-IDENTITY-HEADER", header.expose())
            }
            Endpoint::Imds { url } => {
                query.push(("api-version", constants::IMDS_API_VERSION));
                self.http.get(url).header("Metadata", "true")
            }
        };

        trace!(url = %self.url(), "requesting managed identity token");
        let started = Instant::now();
        let response = request
            .query(&query)
            .timeout(deadline.cap(self.timeout))
            .send()
            .map_err(|e| http::transport_error(self.url(), e, started))?;

        let status = response.status().as_u16();
        match status {
            200 => {
                let body = response
                    .bytes()
                    .map_err(|e| http::transport_error(self.url(), e, started))?;
                parse_token(self.name(), &body, Utc::now())
            }
            401 | 403 => Err(AuthError::Rejected {
                credential: self.name(),
                reason: http::error_message(response),
            }
            .into()),
            // IMDS answers 400 when no identity is assigned to the host.
            400 | 404 => Err(AuthError::Failed {
                credential: self.name(),
                reason: http::error_message(response),
            }
            .into()),
            _ => Err(VaultError::Service {
                target: self.url().to_string(),
                status,
                message: http::error_message(response),
            }
            .into()),
        }
    }
}

impl Credential for ManagedIdentityCredential {
    fn name(&self) -> &'static str {
        "managed-identity"
    }

    fn get_token(&self) -> Result<AccessToken> {
        self.get_token_until(Deadline::none())
    }

    fn get_token_until(&self, deadline: Deadline) -> Result<AccessToken> {
        let result = retry(&self.retry, self.name(), deadline, || {
            self.request_once(deadline)
        });

        result.map_err(|err| match err {
            Error::Vault(VaultError::Connectivity { .. }) | Error::Vault(VaultError::Timeout { .. })
                if matches!(self.endpoint, Endpoint::Imds { .. }) =>
            {
                AuthError::Failed {
                    credential: self.name(),
                    reason: "instance metadata service unreachable".to_string(),
                }
                .into()
            }
            other => other,
        })
    }
}
