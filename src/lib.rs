//! Vaultenv - fail-closed secret bootstrap for services on Azure.
//!
//! At startup a service needs a handful of secrets from Azure Key Vault as
//! environment variables. Vaultenv fetches every configured secret, and
//! either publishes all of them or fails without touching the environment.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── check         # Resolve and report
//! │   ├── run           # Run a child with secrets injected
//! │   ├── export        # Print resolved secrets
//! │   ├── list          # Show name mapping
//! │   ├── health        # Probe the service
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── bootstrap     # Atomic resolve-then-apply
//!     ├── config        # .vaultenv.toml management
//!     ├── credential/   # Ambient Azure identity chain
//!     ├── vault/        # Secret sources (Key Vault, local file, memory)
//!     ├── retry         # Backoff for transient failures
//!     └── health        # Service contract and probe
//! ```
//!
//! # Example
//!
//! ```no_run
//! use vaultenv::core::bootstrap::{self, Options};
//! use vaultenv::core::credential::ChainedCredential;
//! use vaultenv::core::http::HttpSettings;
//! use vaultenv::core::types::parse_secret_names;
//! use vaultenv::core::vault::KeyVault;
//!
//! # fn main() -> vaultenv::error::Result<()> {
//! let settings = HttpSettings::default();
//! let credential = ChainedCredential::from_env(&settings)?;
//! let vault = KeyVault::new("https://my-vault.vault.azure.net", credential, &settings)?;
//!
//! let names = parse_secret_names(&["DATABASE-URL", "OPENAI-API-KEY"])?;
//! bootstrap::bootstrap(&vault, &names, &Options::default())?;
//! assert!(std::env::var("DATABASE_URL").is_ok());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod error;
