//! Tests for `vaultenv check`.

use crate::support::*;

#[test]
fn test_check_succeeds_with_all_secrets() {
    let t = Test::with_secrets(STANDARD_NAMES);
    let server = FakeServer::vault(STANDARD_SECRETS);

    let output = t.check(&server);
    assert_success(&output);
    assert_stderr_contains(&output, "loaded 3 secrets from");
    assert_stderr_contains(&output, &server.url());
    for (_, value) in STANDARD_SECRETS {
        assert_output_excludes(&output, value);
    }
}

#[test]
fn test_check_missing_secret_fails_with_name() {
    let t = Test::with_secrets(&["DATABASE-URL", "TWILIO-AUTH-TOKEN"]);
    let server = FakeServer::vault(STANDARD_SECRETS);

    let output = t.check(&server);
    assert_failure(&output);
    assert_eq!(output.status.code(), Some(1));
    assert_stderr_contains(&output, "secret not found: TWILIO-AUTH-TOKEN");
}

#[test]
fn test_check_authenticates_before_fetching() {
    let t = Test::with_secrets(STANDARD_NAMES);
    let server = FakeServer::vault(STANDARD_SECRETS);

    let output = t.check(&server);
    assert_success(&output);

    let requests = server.requests();
    assert!(requests[0].url.path().ends_with("/oauth2/v2.0/token"));
    assert!(requests[1..]
        .iter()
        .all(|r| r.url.path().starts_with("/secrets/")));
}

#[test]
fn test_check_without_vault_fails() {
    let t = Test::with_secrets(STANDARD_NAMES);

    let output = t.cmd().arg("check").output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "no vault configured");
    assert_stderr_contains(&output, "AZURE_KEY_VAULT_NAME");
}

#[test]
fn test_check_rejects_invalid_vault_name() {
    let t = Test::with_secrets(STANDARD_NAMES);

    let output = t
        .cmd()
        .env("AZURE_KEY_VAULT_NAME", "x")
        .arg("check")
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid vault name 'x'");
}

#[test]
fn test_check_without_identity_fails() {
    let t = Test::with_secrets(STANDARD_NAMES);
    // Managed identity endpoint that reports no identity assigned.
    let server = FakeServer::start(|req| {
        if req.url.path() == "/msi/token" {
            ResponseTemplate::new(400).set_body_json(
                serde_json::json!({"error": "invalid_request", "error_description": "Identity not found"}),
            )
        } else {
            secret_response("DATABASE-URL", "should-not-be-read")
        }
    });

    let output = t
        .cmd()
        .env("IDENTITY_ENDPOINT", format!("{}/msi/token", server.url()))
        .env("IDENTITY_HEADER", "header")
        .env("PATH", t.empty_path())
        .arg("--vault-url")
        .arg(server.url())
        .arg("check")
        .output()
        .unwrap();

    assert_failure(&output);
    assert_stderr_contains(&output, "no ambient credential available");
    assert_stderr_contains(&output, "Identity not found");
    assert_eq!(server.count("/secrets/"), 0);
}

#[test]
fn test_check_with_local_file() {
    let t = Test::with_secrets(STANDARD_NAMES);
    let local = t.write_local(STANDARD_SECRETS);

    let output = t.cmd().arg("--local").arg(&local).arg("check").output().unwrap();
    assert_success(&output);
    assert_stderr_contains(&output, "loaded 3 secrets from local file");
}

#[test]
fn test_check_with_local_file_from_env() {
    let t = Test::with_secrets(STANDARD_NAMES);
    let local = t.write_local(STANDARD_SECRETS);

    let output = t
        .cmd()
        .env("VAULTENV_LOCAL_SECRETS", &local)
        .arg("check")
        .output()
        .unwrap();
    assert_success(&output);
}

#[test]
fn test_check_local_file_missing_secret() {
    let t = Test::with_secrets(&["DATABASE-URL", "REDIS-URL"]);
    let local = t.write_local(STANDARD_SECRETS);

    let output = t.cmd().arg("--local").arg(&local).arg("check").output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "REDIS-URL");
}

#[test]
fn test_check_empty_value_fails() {
    let t = Test::with_secrets(&["DATABASE-URL"]);
    let server = FakeServer::vault(&[("DATABASE-URL", "")]);

    let output = t.check(&server);
    assert_failure(&output);
    assert_stderr_contains(&output, "empty value");
}

#[test]
fn test_check_nul_value_fails() {
    let t = Test::with_secrets(&["DATABASE-URL"]);
    let server = FakeServer::vault(&[("DATABASE-URL", "post\u{0}gres")]);

    let output = t.check(&server);
    assert_failure(&output);
    assert_stderr_contains(&output, "secret DATABASE-URL contains a NUL byte");
}
