//! Command-line interface.

pub mod check;
pub mod completions;
pub mod export;
pub mod health;
pub mod list;
pub mod output;
pub mod run;
pub mod source;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::constants;

/// Vaultenv - load Azure Key Vault secrets into a service's environment.
#[derive(Parser)]
#[command(
    name = "vaultenv",
    about = "Load Azure Key Vault secrets into a service's environment, or fail",
    version,
    after_help = "The vault is taken from --vault-url, --vault, AZURE_KEY_VAULT_NAME or .vaultenv.toml, in that order."
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a config file (default: ./.vaultenv.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Key Vault name (e.g. my-vault)
    #[arg(long, global = true, value_name = "NAME")]
    pub vault: Option<String>,

    /// Full Key Vault URL, overrides --vault
    #[arg(long, global = true, value_name = "URL")]
    pub vault_url: Option<String>,

    /// Read secrets from a local JSON file instead of a vault
    #[arg(long, global = true, value_name = "FILE", env = constants::LOCAL_SECRETS_ENV)]
    pub local: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Resolve every secret and report success without printing values
    Check,

    /// Run a command with the secrets injected as environment variables
    Run {
        /// Command and arguments to run
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },

    /// Resolve every secret and print it
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Env)]
        format: ExportFormat,
    },

    /// Show which environment variable each secret becomes
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Probe the service health endpoint
    Health {
        /// Full health URL, overrides --host/--port
        #[arg(long, conflicts_with_all = ["host", "port"])]
        url: Option<String>,
        /// Host to probe
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to probe (default: service.port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Formats accepted by `export`.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// KEY="value" lines, dotenv style
    Env,
    /// export KEY='value' lines for `eval`
    Shell,
    /// A single JSON object
    Json,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a parsed command line.
pub fn execute(cli: Cli) -> crate::error::Result<()> {
    // Completions never depend on configuration.
    if let Command::Completions { shell } = cli.command {
        return completions::execute(shell);
    }

    let ctx = source::Context::load(&cli)?;

    match cli.command {
        Command::Check => check::execute(&ctx),
        Command::Run { command } => run::execute(&ctx, &command),
        Command::Export { format } => export::execute(&ctx, format),
        Command::List { json } => list::execute(&ctx, json),
        Command::Health { url, host, port } => {
            health::execute(&ctx, url.as_deref(), &host, port)
        }
        Command::Completions { .. } => Ok(()),
    }
}
