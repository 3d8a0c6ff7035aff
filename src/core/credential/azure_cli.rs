//! Azure CLI credential.
//!
//! Borrows the developer's `az login` session via
//! `az account get-access-token`. Only available when `az` is on `PATH`.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::trace;

use super::{parse_token, AccessToken, Credential};
use crate::core::constants;
use crate::core::retry::Deadline;
use crate::error::{AuthError, Result, VaultError};

/// Token source backed by the Azure CLI.
pub struct AzureCliCredential {
    program: PathBuf,
    timeout: Duration,
}

impl AzureCliCredential {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Locate `az` on `PATH`.
    pub fn from_path(timeout: Duration) -> Option<Self> {
        which::which("az").ok().map(|program| Self::new(program, timeout))
    }

    fn failed(&self, reason: impl Into<String>) -> crate::error::Error {
        AuthError::Failed {
            credential: self.name(),
            reason: reason.into(),
        }
        .into()
    }
}

impl Credential for AzureCliCredential {
    fn name(&self) -> &'static str {
        "azure-cli"
    }

    fn get_token(&self) -> Result<AccessToken> {
        self.get_token_until(Deadline::none())
    }

    fn get_token_until(&self, deadline: Deadline) -> Result<AccessToken> {
        deadline.check("az account get-access-token")?;
        let timeout = deadline.cap(self.timeout);
        trace!(program = %self.program.display(), "requesting token from azure cli");

        let mut child = Command::new(&self.program)
            .args([
                "account",
                "get-access-token",
                "--resource",
                constants::VAULT_RESOURCE,
                "--output",
                "json",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.failed(format!("failed to spawn az: {}", e)))?;

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if started.elapsed() >= timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(VaultError::Timeout {
                    target: "az account get-access-token".to_string(),
                    elapsed: started.elapsed(),
                }
                .into());
            }
            std::thread::sleep(Duration::from_millis(50));
        };

        let mut stdout = Vec::new();
        let mut stderr = String::new();
        if let Some(mut out) = child.stdout.take() {
            out.read_to_end(&mut stdout)?;
        }
        if let Some(mut err) = child.stderr.take() {
            err.read_to_string(&mut stderr)?;
        }

        if !status.success() {
            let reason = stderr
                .lines()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("az exited with an error")
                .trim()
                .to_string();
            return Err(self.failed(reason));
        }

        parse_token(self.name(), &stdout, Utc::now())
    }
}
