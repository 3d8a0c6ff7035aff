//! Resolve where secrets come from for a CLI invocation.
//!
//! Combines command-line flags, environment variables and the config file
//! into a ready-to-use secret source.

use std::path::PathBuf;
use tracing::debug;

use crate::cli::{output, Cli};
use crate::core::bootstrap::{self, Resolved};
use crate::core::config::Config;
use crate::core::constants;
use crate::core::credential::ChainedCredential;
use crate::core::http::HttpSettings;
use crate::core::types::SecretName;
use crate::core::vault::{KeyVault, LocalFile, SecretSource};
use crate::error::Result;

/// Everything a command needs to reach its secrets.
pub struct Context {
    pub config: Config,
    vault_url: Option<String>,
    vault: Option<String>,
    local: Option<PathBuf>,
}

impl Context {
    /// Load configuration and capture the relevant flags.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?;
        Ok(Self {
            config,
            vault_url: cli.vault_url.clone(),
            vault: cli.vault.clone(),
            local: cli.local.clone().filter(|p| !p.as_os_str().is_empty()),
        })
    }

    /// Secret names to fetch, in order.
    pub fn secret_names(&self) -> Result<Vec<SecretName>> {
        self.config.secret_names()
    }

    fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            timeout: self.config.request_timeout(),
            retry: self.config.retry_policy(),
        }
    }

    fn options(&self) -> bootstrap::Options {
        bootstrap::Options {
            deadline: Some(self.config.total_timeout()),
        }
    }

    /// Vault URL after applying flag, environment and config precedence.
    pub fn vault_url(&self) -> Result<String> {
        let env_name = std::env::var(constants::VAULT_NAME_ENV).ok();
        self.config.vault_url(
            self.vault_url.as_deref(),
            self.vault.as_deref(),
            env_name.as_deref(),
        )
    }

    /// Open the configured secret source.
    ///
    /// A local file wins over any vault setting.
    pub fn open_source(&self) -> Result<Box<dyn SecretSource>> {
        if let Some(path) = &self.local {
            output::warn(&format!(
                "reading secrets from local file {}, not a vault",
                path.display()
            ));
            return Ok(Box::new(LocalFile::open(path)?));
        }

        let url = self.vault_url()?;
        let settings = self.http_settings();
        let credential = ChainedCredential::from_env(&settings)?;
        debug!(url = %url, credentials = ?credential.source_names(), "opening vault");

        Ok(Box::new(KeyVault::new(&url, credential, &settings)?))
    }

    /// Resolve every configured secret without touching this process's
    /// environment.
    ///
    /// Returns the source description alongside the values.
    pub fn resolve(&self) -> Result<(String, Resolved)> {
        let names = self.secret_names()?;
        let source = self.open_source()?;
        let resolved = bootstrap::resolve(&source, &names, &self.options())?;
        Ok((source.describe(), resolved))
    }
}
