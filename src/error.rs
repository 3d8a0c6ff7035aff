//! Error types.
//!
//! Each concern has its own enum; [`Error`] wraps them so every public
//! operation can return the same [`Result`]. Callers that only need to
//! branch on the broad failure category use [`Error::kind`].

use std::time::Duration;
use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Health(#[from] HealthError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Configuration loading and resolution failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no vault configured: set AZURE_KEY_VAULT_NAME or pass --vault")]
    NoVault,

    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read local secrets file {path}: {reason}")]
    LocalFile { path: String, reason: String },
}

/// Name and value validation failures.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("secret name cannot be empty")]
    EmptySecretName,

    #[error("invalid secret name '{name}': {reason}")]
    InvalidSecretName { name: String, reason: String },

    #[error("invalid vault name '{name}': {reason}")]
    InvalidVaultName { name: String, reason: String },

    #[error("secret {0} has an empty value")]
    EmptyValue(String),

    #[error("secret {0} contains a NUL byte and cannot be an environment variable")]
    InvalidValue(String),

    #[error("secret {0} is listed more than once")]
    DuplicateSecret(String),

    #[error("no secrets requested")]
    NoSecrets,
}

/// Identity and authorization failures.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("no ambient credential available: {attempts}")]
    Unavailable { attempts: String },

    #[error("{credential} credential rejected: {reason}")]
    Rejected {
        credential: &'static str,
        reason: String,
    },

    #[error("{credential} credential failed: {reason}")]
    Failed {
        credential: &'static str,
        reason: String,
    },

    #[error("access to secret {secret} denied (HTTP {status})")]
    Denied { secret: String, status: u16 },
}

/// Failures talking to a secret source.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("secret not found: {secret}")]
    NotFound { secret: String },

    #[error("cannot reach {target}: {reason}")]
    Connectivity { target: String, reason: String },

    #[error("timed out after {elapsed:?} waiting for {target}")]
    Timeout { target: String, elapsed: Duration },

    #[error("{target} returned HTTP {status}: {message}")]
    Service {
        target: String,
        status: u16,
        message: String,
    },

    #[error("invalid vault url: {0}")]
    InvalidUrl(String),

    #[error("malformed response from {target}: {reason}")]
    Malformed { target: String, reason: String },
}

/// Service health probe failures.
#[derive(Error, Debug)]
pub enum HealthError {
    #[error("health check against {url} failed: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("health check against {url} returned HTTP {status}")]
    Unhealthy { url: String, status: u16 },
}

/// Coarse failure category for callers that branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Auth,
    NotFound,
    Connectivity,
    Timeout,
    Config,
    Other,
}

impl Error {
    /// Broad category of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Auth(_) => FailureKind::Auth,
            Error::Vault(VaultError::NotFound { .. }) => FailureKind::NotFound,
            Error::Vault(VaultError::Connectivity { .. }) => FailureKind::Connectivity,
            Error::Vault(VaultError::Timeout { .. }) => FailureKind::Timeout,
            Error::Health(HealthError::Unreachable { .. }) => FailureKind::Connectivity,
            Error::Config(_) | Error::Validation(_) => FailureKind::Config,
            _ => FailureKind::Other,
        }
    }

    /// Whether a fresh attempt might succeed.
    ///
    /// Transport failures, timeouts and throttling/5xx responses are
    /// transient. Authentication and missing secrets are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Vault(VaultError::Connectivity { .. })
            | Error::Vault(VaultError::Timeout { .. }) => true,
            Error::Vault(VaultError::Service { status, .. }) => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// HTTP statuses worth retrying.
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

pub type Result<T> = std::result::Result<T, Error>;
