//! Ordered credential chain.
//!
//! Sources are tried in order and the first token wins. A source that
//! cannot produce a token is skipped; a source whose identity provider
//! rejects the identity ends the chain, since a misconfigured principal
//! should not silently fall through to someone else's login.

use std::time::Duration;
use tracing::{debug, info};

use super::{
    AccessToken, AzureCliCredential, ClientSecretCredential, Credential,
    ManagedIdentityCredential, WorkloadIdentityCredential,
};
use crate::core::http::HttpSettings;
use crate::core::retry::Deadline;
use crate::error::{AuthError, Error, Result};

/// Tries each credential in turn.
pub struct ChainedCredential {
    sources: Vec<Box<dyn Credential>>,
}

impl ChainedCredential {
    pub fn new(sources: Vec<Box<dyn Credential>>) -> Self {
        Self { sources }
    }

    /// The default ambient chain, configured from the process environment.
    pub fn from_env(settings: &HttpSettings) -> Result<Self> {
        Self::from_lookup(&|key: &str| std::env::var(key).ok(), settings)
    }

    /// The default ambient chain: environment, workload identity, managed
    /// identity, then Azure CLI.
    pub fn from_lookup(
        lookup: &dyn Fn(&str) -> Option<String>,
        settings: &HttpSettings,
    ) -> Result<Self> {
        let mut sources: Vec<Box<dyn Credential>> = Vec::new();

        if let Some(credential) = ClientSecretCredential::from_lookup(lookup, settings) {
            sources.push(Box::new(credential?));
        }
        if let Some(credential) = WorkloadIdentityCredential::from_lookup(lookup, settings) {
            sources.push(Box::new(credential?));
        }
        sources.push(Box::new(ManagedIdentityCredential::from_lookup(
            lookup, settings,
        )?));
        if let Some(credential) = AzureCliCredential::from_path(cli_timeout(settings)) {
            sources.push(Box::new(credential));
        }

        debug!(
            sources = ?sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            "credential chain configured"
        );
        Ok(Self::new(sources))
    }

    /// Names of the configured sources, in order.
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }
}

/// `az` is a Python program and can be slow to start.
fn cli_timeout(settings: &HttpSettings) -> Duration {
    settings.timeout.max(Duration::from_secs(10))
}

impl Credential for ChainedCredential {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn get_token(&self) -> Result<AccessToken> {
        self.get_token_until(Deadline::none())
    }

    fn get_token_until(&self, deadline: Deadline) -> Result<AccessToken> {
        let mut attempts = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            deadline.check("credential chain")?;

            match source.get_token_until(deadline) {
                Ok(token) => {
                    info!(credential = source.name(), "authenticated");
                    return Ok(token);
                }
                Err(err @ Error::Auth(AuthError::Rejected { .. })) => return Err(err),
                Err(err) => {
                    debug!(credential = source.name(), error = %err, "credential unavailable");
                    attempts.push(format!("{}: {}", source.name(), err));
                }
            }
        }

        let attempts = if attempts.is_empty() {
            "no credential sources configured".to_string()
        } else {
            attempts.join("; ")
        };
        Err(AuthError::Unavailable { attempts }.into())
    }
}
