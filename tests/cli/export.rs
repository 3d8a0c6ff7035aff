//! Tests for `vaultenv export`.

use crate::support::*;

#[test]
fn test_export_env_format() {
    let t = Test::with_secrets(STANDARD_NAMES);
    let server = FakeServer::vault(STANDARD_SECRETS);

    let output = t.export(&server, "env");
    assert_success(&output);
    assert_eq!(
        stdout(&output),
        "DATABASE_URL=postgres://app:pw@db:5432/app\nOPENAI_API_KEY=sk-test-openai\nCOHERE_API_KEY=co-test-cohere\n"
    );
    assert_stderr_contains(&output, "loaded 3 secrets from");
}

#[test]
fn test_export_shell_format() {
    let t = Test::with_secrets(&["GREETING"]);
    let server = FakeServer::vault(&[("GREETING", "hello world")]);

    let output = t.export(&server, "shell");
    assert_success(&output);
    assert_eq!(stdout(&output), "export GREETING='hello world'\n");
}

#[test]
fn test_export_json_format() {
    let t = Test::with_secrets(STANDARD_NAMES);
    let server = FakeServer::vault(STANDARD_SECRETS);

    let output = t.export(&server, "json");
    assert_success(&output);

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["DATABASE_URL"], "postgres://app:pw@db:5432/app");
    assert_eq!(parsed["COHERE_API_KEY"], "co-test-cohere");
    assert_eq!(parsed.as_object().unwrap().len(), 3);
}

#[test]
fn test_export_prints_nothing_on_failure() {
    let t = Test::with_secrets(&["DATABASE-URL", "NOT-THERE"]);
    let server = FakeServer::vault(STANDARD_SECRETS);

    let output = t.export(&server, "env");
    assert_failure(&output);
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_export_rejects_unknown_format() {
    let t = Test::with_secrets(STANDARD_NAMES);
    let server = FakeServer::vault(STANDARD_SECRETS);

    let output = t.export(&server, "yaml");
    assert_failure(&output);
    assert!(server.requests().is_empty());
}
