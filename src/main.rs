//! Vaultenv - load Azure Key Vault secrets into a service's environment.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vaultenv::cli::output;
use vaultenv::cli::{execute, Cli};
use vaultenv::core::constants;
use vaultenv::error::{AuthError, ConfigError, Error, VaultError};

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so `export` output stays clean.
    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("vaultenv=debug")
        } else {
            EnvFilter::new("vaultenv=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Config(ConfigError::NoVault) => {
                Some("set AZURE_KEY_VAULT_NAME, pass --vault, or use --local <file>")
            }
            Error::Auth(AuthError::Unavailable { .. }) => {
                Some("run: az login, or set AZURE_TENANT_ID, AZURE_CLIENT_ID and AZURE_CLIENT_SECRET")
            }
            Error::Auth(AuthError::Denied { .. }) => {
                Some("grant the identity 'get' permission on secrets in this vault")
            }
            Error::Vault(VaultError::NotFound { .. }) => {
                Some("run: vaultenv list, to see which secrets are expected")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
