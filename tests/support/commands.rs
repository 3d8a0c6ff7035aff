//! Command helper methods for Test.

use super::{FakeServer, Test};
use assert_cmd::Command;
use std::process::Output;

/// Variables that would leak the developer's identity or proxy into tests.
const SCRUBBED: &[&str] = &[
    "AZURE_KEY_VAULT_NAME",
    "AZURE_TENANT_ID",
    "AZURE_CLIENT_ID",
    "AZURE_CLIENT_SECRET",
    "AZURE_FEDERATED_TOKEN_FILE",
    "AZURE_AUTHORITY_HOST",
    "IDENTITY_ENDPOINT",
    "IDENTITY_HEADER",
    "VAULTENV_LOCAL_SECRETS",
    "VAULTENV_LOG",
    "HTTP_PROXY",
    "HTTPS_PROXY",
    "ALL_PROXY",
    "http_proxy",
    "https_proxy",
    "all_proxy",
];

impl Test {
    /// Create a vaultenv command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - HOME and XDG_CONFIG_HOME inside the temporary home directory
    /// - Current directory set to the test working directory
    /// - Azure identity, proxy and vaultenv variables removed
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("vaultenv").expect("failed to find vaultenv binary");
        for var in SCRUBBED {
            cmd.env_remove(var);
        }
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("XDG_CONFIG_HOME", self.home.path().join(".config"));
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Command authenticated as a service principal against `server`, with
    /// `server` as the vault.
    pub fn vault_cmd(&self, server: &FakeServer) -> Command {
        let mut cmd = self.cmd();
        cmd.env("AZURE_TENANT_ID", "00000000-0000-0000-0000-000000000000")
            .env("AZURE_CLIENT_ID", "11111111-1111-1111-1111-111111111111")
            .env("AZURE_CLIENT_SECRET", "client-secret")
            .env("AZURE_AUTHORITY_HOST", server.url())
            .arg("--vault-url")
            .arg(server.url());
        cmd
    }

    /// Shortcut for `vaultenv check` against `server`.
    pub fn check(&self, server: &FakeServer) -> Output {
        self.vault_cmd(server)
            .arg("check")
            .output()
            .expect("failed to run vaultenv check")
    }

    /// Shortcut for `vaultenv export --format <format>` against `server`.
    pub fn export(&self, server: &FakeServer, format: &str) -> Output {
        self.vault_cmd(server)
            .args(["export", "--format", format])
            .output()
            .expect("failed to run vaultenv export")
    }

    /// Shortcut for `vaultenv run -- <command>` against `server`.
    pub fn run(&self, server: &FakeServer, command: &[&str]) -> Output {
        let mut cmd = self.vault_cmd(server);
        cmd.arg("run").arg("--");
        for arg in command {
            cmd.arg(arg);
        }
        cmd.output().expect("failed to run vaultenv run")
    }

    /// Shortcut for `vaultenv list`.
    pub fn list(&self) -> Output {
        self.cmd()
            .arg("list")
            .output()
            .expect("failed to run vaultenv list")
    }

    /// Shortcut for `vaultenv list --json`.
    pub fn list_json(&self) -> Output {
        self.cmd()
            .args(["list", "--json"])
            .output()
            .expect("failed to run vaultenv list --json")
    }
}
