//! Tests for error handling, CLI flags and configuration.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_help() {
    let t = Test::new();

    t.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    let output = t.cmd().arg("unknown-command").output().unwrap();
    assert_failure(&output);
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    t.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions_bash_outputs_script() {
    let t = Test::new();

    let output = t.cmd().args(["completions", "bash"]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "_vaultenv");
}

#[test]
fn test_completions_zsh() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#compdef vaultenv"));
}

#[test]
fn test_completions_ignore_broken_config() {
    let t = Test::new();
    t.write_config("this is not toml [");

    let output = t.cmd().args(["completions", "fish"]).output().unwrap();
    assert_success(&output);
}

#[test]
fn test_malformed_config_fails() {
    let t = Test::new();
    t.write_config("[vault\nname = ");

    let output = t.list();
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse config");
}

#[test]
fn test_unknown_config_key_fails() {
    let t = Test::new();
    t.write_config("[vault]\nsecretz = [\"A-B\"]\n");

    let output = t.list();
    assert_failure(&output);
    assert_stderr_contains(&output, "secretz");
}

#[test]
fn test_explicit_config_must_exist() {
    let t = Test::new();

    t.cmd()
        .args(["--config", "missing.toml", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config file not found: missing.toml"))
        .stderr(predicate::str::contains("→").not());
}

#[test]
fn test_explicit_config_path() {
    let t = Test::new();
    let path = t.dir.path().join("custom.toml");
    std::fs::write(&path, config_for(&["ONLY-ONE"])).unwrap();

    let output = t.cmd().arg("--config").arg(&path).arg("list").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "ONLY_ONE");
}

#[cfg(target_os = "linux")]
#[test]
fn test_user_config_dir_is_searched() {
    let t = Test::new();
    let dir = t.home.path().join(".config").join("vaultenv");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), config_for(&["FROM-HOME"])).unwrap();

    let output = t.list();
    assert_success(&output);
    assert_stdout_contains(&output, "FROM_HOME");
}

#[test]
fn test_invalid_retry_config_fails() {
    let t = Test::new();
    t.write_config("[retry]\nmax_attempts = 0\n");

    let output = t.list();
    assert_failure(&output);
    assert_stderr_contains(&output, "retry.max_attempts");
}

#[test]
fn test_vault_url_flag_beats_environment() {
    let t = Test::with_secrets(STANDARD_NAMES);
    let server = FakeServer::vault(STANDARD_SECRETS);

    // The env var names a vault that would never resolve here.
    let output = t
        .vault_cmd(&server)
        .env("AZURE_KEY_VAULT_NAME", "unreachable-vault")
        .arg("check")
        .output()
        .unwrap();
    assert_success(&output);
}
