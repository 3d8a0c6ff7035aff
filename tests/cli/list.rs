//! Tests for `vaultenv list`.

use crate::support::*;

#[test]
fn test_list_default_mapping() {
    let t = Test::new();

    let output = t.list();
    assert_success(&output);
    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), DEFAULT_MAPPING.len());
    for (line, (secret, env)) in lines.iter().zip(DEFAULT_MAPPING) {
        assert!(line.trim_start().starts_with(secret), "unexpected row: {}", line);
        assert!(line.ends_with(&format!("→  {}", env)), "unexpected row: {}", line);
    }
}

#[test]
fn test_list_json_follows_config() {
    let t = Test::with_secrets(&["A-B", "C-D"]);

    let output = t.list_json();
    assert_success(&output);

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["count"], 2);
    assert_eq!(parsed["secrets"][0]["secret"], "A-B");
    assert_eq!(parsed["secrets"][0]["env"], "A_B");
    assert_eq!(parsed["secrets"][1]["env"], "C_D");
}

#[test]
fn test_list_needs_no_vault() {
    let t = Test::with_secrets(STANDARD_NAMES);

    // No vault, no identity: list still works.
    let output = t.list();
    assert_success(&output);
    assert_stdout_contains(&output, "OPENAI_API_KEY");
}

#[test]
fn test_list_rejects_duplicate_secrets() {
    let t = Test::with_secrets(&["A-B", "A-B"]);

    let output = t.list();
    assert_failure(&output);
    assert_stderr_contains(&output, "A-B");
}

#[test]
fn test_list_rejects_duplicates_differing_in_case() {
    let t = Test::with_secrets(&["db-url", "DB-URL"]);

    let output = t.list();
    assert_failure(&output);
    assert_stderr_contains(&output, "listed more than once");
}

#[test]
fn test_list_rejects_invalid_secret_name() {
    let t = Test::with_secrets(&["DATABASE_URL"]);

    let output = t.list();
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid secret name 'DATABASE_URL'");
}
