//! Test fixtures and constants.

/// Secrets the fake vault holds in most tests.
pub const STANDARD_SECRETS: &[(&str, &str)] = &[
    ("DATABASE-URL", "postgres://app:pw@db:5432/app"),
    ("OPENAI-API-KEY", "sk-test-openai"),
    ("COHERE-API-KEY", "co-test-cohere"),
];

/// Names of [`STANDARD_SECRETS`], in order.
pub const STANDARD_NAMES: &[&str] = &["DATABASE-URL", "OPENAI-API-KEY", "COHERE-API-KEY"];

/// The built-in secret set and the variables it becomes.
pub const DEFAULT_MAPPING: &[(&str, &str)] = &[
    ("DATABASE-URL", "DATABASE_URL"),
    ("OPENAI-API-KEY", "OPENAI_API_KEY"),
    ("COHERE-API-KEY", "COHERE_API_KEY"),
    ("TWILIO-ACCOUNT-SID", "TWILIO_ACCOUNT_SID"),
    ("TWILIO-AUTH-TOKEN", "TWILIO_AUTH_TOKEN"),
    ("INSTAGRAM-ACCESS-TOKEN", "INSTAGRAM_ACCESS_TOKEN"),
];
