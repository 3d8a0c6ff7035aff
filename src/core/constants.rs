//! Constants used throughout vaultenv.
//!
//! Centralizes environment variable names, Azure endpoints and the
//! defaults of the service contract.

/// Environment variable naming the vault instance.
pub const VAULT_NAME_ENV: &str = "AZURE_KEY_VAULT_NAME";

/// Environment variable pointing at a local JSON secrets file.
pub const LOCAL_SECRETS_ENV: &str = "VAULTENV_LOCAL_SECRETS";

/// Environment variable controlling the log filter.
pub const LOG_ENV: &str = "VAULTENV_LOG";

/// Project configuration file name.
pub const CONFIG_FILE: &str = ".vaultenv.toml";

/// Secrets fetched when no list is configured.
pub const DEFAULT_SECRETS: &[&str] = &[
    "DATABASE-URL",
    "OPENAI-API-KEY",
    "COHERE-API-KEY",
    "TWILIO-ACCOUNT-SID",
    "TWILIO-AUTH-TOKEN",
    "INSTAGRAM-ACCESS-TOKEN",
];

/// DNS suffix of public-cloud vaults.
pub const VAULT_DNS_SUFFIX: &str = "vault.azure.net";

/// Key Vault REST API version.
pub const VAULT_API_VERSION: &str = "7.4";

/// Resource identifier tokens are requested for.
pub const VAULT_RESOURCE: &str = "https://vault.azure.net";

/// OAuth2 scope for the vault resource.
pub const VAULT_SCOPE: &str = "https://vault.azure.net/.default";

/// Default Microsoft Entra authority.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Instance metadata service token endpoint.
pub const IMDS_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";

/// IMDS API version.
pub const IMDS_API_VERSION: &str = "2018-02-01";

/// App Service / Functions managed identity API version.
pub const APP_SERVICE_API_VERSION: &str = "2019-08-01";

/// Port the wrapped service listens on.
pub const DEFAULT_SERVICE_PORT: u16 = 8000;

/// Liveness endpoint of the wrapped service.
pub const DEFAULT_HEALTH_PATH: &str = "/health";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default deadline for a whole bootstrap in seconds.
pub const DEFAULT_TOTAL_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts per remote call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default first retry delay in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 200;

/// Default retry delay cap in milliseconds.
pub const DEFAULT_MAX_DELAY_MS: u64 = 2000;

/// User agent sent on every request.
pub const USER_AGENT: &str = concat!("vaultenv/", env!("CARGO_PKG_VERSION"));
