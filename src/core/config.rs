//! Configuration file management.
//!
//! Handles reading and validating `.vaultenv.toml`, and resolving where
//! secrets come from once command-line flags and environment variables are
//! taken into account.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::core::constants;
use crate::core::retry::RetryPolicy;
use crate::core::types::{parse_secret_names, SecretName, VaultName};
use crate::error::{ConfigError, Result};

/// Configuration stored in `.vaultenv.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

/// `[vault]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Vault instance name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Full vault URL, for sovereign clouds or private endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Secret names to fetch, in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets: Option<Vec<String>>,
}

/// `[timeouts]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeoutConfig {
    #[serde(default = "default_request_secs")]
    pub request_secs: u64,
    #[serde(default = "default_total_secs")]
    pub total_secs: u64,
}

/// `[retry]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

/// `[service]` section: the contract the orchestrator expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_health_path")]
    pub health_path: String,
}

fn default_request_secs() -> u64 {
    constants::DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_total_secs() -> u64 {
    constants::DEFAULT_TOTAL_TIMEOUT_SECS
}

fn default_max_attempts() -> u32 {
    constants::DEFAULT_MAX_ATTEMPTS
}

fn default_base_delay_ms() -> u64 {
    constants::DEFAULT_BASE_DELAY_MS
}

fn default_max_delay_ms() -> u64 {
    constants::DEFAULT_MAX_DELAY_MS
}

fn default_port() -> u16 {
    constants::DEFAULT_SERVICE_PORT
}

fn default_health_path() -> String {
    constants::DEFAULT_HEALTH_PATH.to_string()
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: default_request_secs(),
            total_secs: default_total_secs(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            health_path: default_health_path(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `./.vaultenv.toml` is tried,
    /// then `<config dir>/vaultenv/config.toml`, then built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` for a missing explicit path,
    /// `ConfigError::Parse` for malformed TOML, or a validation error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.display().to_string()).into());
            }
            return Self::load_from(path);
        }

        for candidate in Self::search_paths() {
            if candidate.exists() {
                return Self::load_from(&candidate);
            }
        }

        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Load and validate a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config = Self::parse(&contents)?;

        debug!(
            secrets = config.vault.secrets.as_ref().map_or(0, |s| s.len()),
            "config loaded"
        );
        Ok(config)
    }

    /// Parse and validate TOML contents.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(constants::CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("vaultenv").join("config.toml"));
        }
        paths
    }

    /// Validate the configuration structure and contents.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` or a `ValidationError` on failure.
    pub fn validate(&self) -> Result<()> {
        debug!("validating config");

        if let Some(name) = &self.vault.name {
            VaultName::new(name.as_str())?;
        }
        if let Some(url) = &self.vault.url {
            reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidValue {
                field: "vault.url",
                reason: e.to_string(),
            })?;
        }
        if let Some(secrets) = &self.vault.secrets {
            parse_secret_names(secrets)?;
        }

        if self.timeouts.request_secs == 0 {
            return Err(invalid("timeouts.request_secs", "must be greater than zero"));
        }
        if self.timeouts.total_secs == 0 {
            return Err(invalid("timeouts.total_secs", "must be greater than zero"));
        }
        if self.retry.max_attempts == 0 {
            return Err(invalid("retry.max_attempts", "must be at least 1"));
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(invalid(
                "retry.base_delay_ms",
                "cannot exceed retry.max_delay_ms",
            ));
        }
        if !self.service.health_path.starts_with('/') {
            return Err(invalid("service.health_path", "must start with '/'"));
        }

        Ok(())
    }

    /// Secret names to fetch, falling back to the built-in set.
    pub fn secret_names(&self) -> Result<Vec<SecretName>> {
        match &self.vault.secrets {
            Some(secrets) => parse_secret_names(secrets),
            None => parse_secret_names(constants::DEFAULT_SECRETS),
        }
    }

    /// Per-request HTTP timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.request_secs)
    }

    /// Deadline for a whole bootstrap.
    pub fn total_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.total_secs)
    }

    /// Retry policy for remote calls.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry.max_attempts,
            base_delay: Duration::from_millis(self.retry.base_delay_ms),
            max_delay: Duration::from_millis(self.retry.max_delay_ms),
            ..RetryPolicy::default()
        }
    }

    /// Resolve the vault URL.
    ///
    /// Precedence: `url_flag` > `name_flag` > `env_name` > `vault.url` >
    /// `vault.name`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoVault` if nothing names a vault.
    pub fn vault_url(
        &self,
        url_flag: Option<&str>,
        name_flag: Option<&str>,
        env_name: Option<&str>,
    ) -> Result<String> {
        if let Some(url) = url_flag {
            reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidValue {
                field: "--vault-url",
                reason: e.to_string(),
            })?;
            return Ok(url.trim_end_matches('/').to_string());
        }

        let name = name_flag.or(env_name).filter(|n| !n.trim().is_empty());
        if let Some(name) = name {
            return Ok(VaultName::new(name.trim())?.url());
        }

        if let Some(url) = &self.vault.url {
            return Ok(url.trim_end_matches('/').to_string());
        }
        if let Some(name) = &self.vault.name {
            return Ok(VaultName::new(name.as_str())?.url());
        }

        Err(ConfigError::NoVault.into())
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}
