//! Service principal credentials read from the environment.
//!
//! Both credentials exchange something for a token at the Entra v2 token
//! endpoint:
//!
//! - `ClientSecretCredential`: `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`,
//!   `AZURE_CLIENT_SECRET`
//! - `WorkloadIdentityCredential`: `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`,
//!   `AZURE_FEDERATED_TOKEN_FILE`
//!
//! `AZURE_AUTHORITY_HOST` overrides the authority for sovereign clouds.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::blocking::Client;
use tracing::{debug, trace};

use super::{parse_token, AccessToken, Credential};
use crate::core::constants;
use crate::core::http::{self, HttpSettings};
use crate::core::retry::{retry, Deadline, RetryPolicy};
use crate::core::types::SecretValue;
use crate::error::{AuthError, Result, VaultError};

const CLIENT_ASSERTION_TYPE: &str = "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// Entra v2 token endpoint for one tenant.
struct TokenEndpoint {
    url: String,
    http: Client,
    timeout: Duration,
    retry: RetryPolicy,
}

impl TokenEndpoint {
    fn new(authority: &str, tenant_id: &str, settings: &HttpSettings) -> Result<Self> {
        Ok(Self {
            url: format!(
                "{}/{}/oauth2/v2.0/token",
                authority.trim_end_matches('/'),
                tenant_id
            ),
            http: settings.client()?,
            timeout: settings.timeout,
            retry: settings.retry.clone(),
        })
    }

    fn request(
        &self,
        credential: &'static str,
        form: &[(&str, &str)],
        deadline: Deadline,
    ) -> Result<AccessToken> {
        retry(&self.retry, credential, deadline, || {
            trace!(url = %self.url, credential, "requesting token");
            let started = Instant::now();

            let response = self
                .http
                .post(&self.url)
                .form(form)
                .timeout(deadline.cap(self.timeout))
                .send()
                .map_err(|e| http::transport_error(&self.url, e, started))?;

            let status = response.status().as_u16();
            match status {
                200 => {
                    let body = response
                        .bytes()
                        .map_err(|e| http::transport_error(&self.url, e, started))?;
                    parse_token(credential, &body, Utc::now())
                }
                400 | 401 | 403 => Err(AuthError::Rejected {
                    credential,
                    reason: http::error_message(response),
                }
                .into()),
                _ => Err(VaultError::Service {
                    target: self.url.clone(),
                    status,
                    message: http::error_message(response),
                }
                .into()),
            }
        })
    }
}

fn authority(lookup: &dyn Fn(&str) -> Option<String>) -> String {
    lookup("AZURE_AUTHORITY_HOST")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| constants::DEFAULT_AUTHORITY_HOST.to_string())
}

fn non_empty(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Service principal authenticated with a client secret.
pub struct ClientSecretCredential {
    client_id: String,
    client_secret: SecretValue,
    endpoint: TokenEndpoint,
}

impl ClientSecretCredential {
    pub fn new(
        authority: &str,
        tenant_id: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        settings: &HttpSettings,
    ) -> Result<Self> {
        Ok(Self {
            client_id: client_id.into(),
            client_secret: SecretValue::new(client_secret),
            endpoint: TokenEndpoint::new(authority, tenant_id, settings)?,
        })
    }

    /// Build from environment variables, or `None` if any is missing.
    pub fn from_lookup(
        lookup: &dyn Fn(&str) -> Option<String>,
        settings: &HttpSettings,
    ) -> Option<Result<Self>> {
        let tenant = non_empty(lookup, "AZURE_TENANT_ID")?;
        let client_id = non_empty(lookup, "AZURE_CLIENT_ID")?;
        let secret = non_empty(lookup, "AZURE_CLIENT_SECRET")?;

        debug!(tenant = %tenant, client_id = %client_id, "client secret credential configured");
        Some(Self::new(
            &authority(lookup),
            &tenant,
            client_id,
            secret,
            settings,
        ))
    }
}

impl Credential for ClientSecretCredential {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn get_token(&self) -> Result<AccessToken> {
        self.get_token_until(Deadline::none())
    }

    fn get_token_until(&self, deadline: Deadline) -> Result<AccessToken> {
        self.endpoint.request(
            self.name(),
            &[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose()),
                ("scope", constants::VAULT_SCOPE),
            ],
            deadline,
        )
    }
}

/// Federated workload identity (e.g. AKS) using a projected token file.
pub struct WorkloadIdentityCredential {
    client_id: String,
    token_file: PathBuf,
    endpoint: TokenEndpoint,
}

impl WorkloadIdentityCredential {
    pub fn new(
        authority: &str,
        tenant_id: &str,
        client_id: impl Into<String>,
        token_file: impl Into<PathBuf>,
        settings: &HttpSettings,
    ) -> Result<Self> {
        Ok(Self {
            client_id: client_id.into(),
            token_file: token_file.into(),
            endpoint: TokenEndpoint::new(authority, tenant_id, settings)?,
        })
    }

    /// Build from environment variables, or `None` if any is missing.
    pub fn from_lookup(
        lookup: &dyn Fn(&str) -> Option<String>,
        settings: &HttpSettings,
    ) -> Option<Result<Self>> {
        let token_file = non_empty(lookup, "AZURE_FEDERATED_TOKEN_FILE")?;
        let tenant = non_empty(lookup, "AZURE_TENANT_ID")?;
        let client_id = non_empty(lookup, "AZURE_CLIENT_ID")?;

        debug!(token_file = %token_file, "workload identity credential configured");
        Some(Self::new(
            &authority(lookup),
            &tenant,
            client_id,
            token_file,
            settings,
        ))
    }
}

impl Credential for WorkloadIdentityCredential {
    fn name(&self) -> &'static str {
        "workload-identity"
    }

    fn get_token(&self) -> Result<AccessToken> {
        self.get_token_until(Deadline::none())
    }

    fn get_token_until(&self, deadline: Deadline) -> Result<AccessToken> {
        // The projected token is rotated by the kubelet; read it on every use.
        let assertion = std::fs::read_to_string(&self.token_file).map_err(|e| {
            AuthError::Failed {
                credential: self.name(),
                reason: format!("cannot read {}: {}", self.token_file.display(), e),
            }
        })?;
        let assertion = SecretValue::new(assertion.trim());

        self.endpoint.request(
            self.name(),
            &[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_assertion_type", CLIENT_ASSERTION_TYPE),
                ("client_assertion", assertion.expose()),
                ("scope", constants::VAULT_SCOPE),
            ],
            deadline,
        )
    }
}
