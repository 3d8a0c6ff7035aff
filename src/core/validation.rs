//! Input validation for vault and secret names.

use crate::error::{Result, ValidationError};

/// Longest secret name Key Vault accepts.
const MAX_SECRET_NAME_LEN: usize = 127;

/// Validate a secret name as stored in the vault.
///
/// Key Vault secret names:
/// - Are 1-127 characters long
/// - Contain only ASCII letters, digits and hyphens
///
/// # Errors
///
/// Returns `ValidationError` if the name is invalid.
pub fn validate_secret_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ValidationError::EmptySecretName.into());
    }

    if name.len() > MAX_SECRET_NAME_LEN {
        return Err(ValidationError::InvalidSecretName {
            name: name.to_string(),
            reason: format!("longer than {} characters", MAX_SECRET_NAME_LEN),
        }
        .into());
    }

    for (i, ch) in name.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && ch != '-' {
            return Err(ValidationError::InvalidSecretName {
                name: name.to_string(),
                reason: format!(
                    "invalid character '{}' at position {}. Only A-Z, a-z, 0-9 and '-' are allowed",
                    ch,
                    i + 1
                ),
            }
            .into());
        }
    }

    Ok(())
}

/// Validate a vault instance name.
///
/// Vault names:
/// - Are 3-24 characters long
/// - Start with a letter
/// - Contain only ASCII letters, digits and hyphens
/// - Do not end with a hyphen or contain consecutive hyphens
///
/// # Errors
///
/// Returns `ValidationError` if the name is invalid.
pub fn validate_vault_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| -> crate::error::Error {
        ValidationError::InvalidVaultName {
            name: name.to_string(),
            reason: reason.to_string(),
        }
        .into()
    };

    if !(3..=24).contains(&name.len()) {
        return Err(invalid("must be 3-24 characters long"));
    }
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(invalid("must start with a letter"));
    }
    if name.ends_with('-') {
        return Err(invalid("cannot end with a hyphen"));
    }
    if name.contains("--") {
        return Err(invalid("cannot contain consecutive hyphens"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(invalid("only letters, digits and hyphens are allowed"));
    }

    Ok(())
}

/// Validate a fetched secret value.
///
/// Values cannot be empty: consumers treat a present variable as configured.
/// Nor can they hold NUL, which no process environment can carry.
///
/// # Errors
///
/// Returns `ValidationError::EmptyValue` if the value is empty, or
/// `ValidationError::InvalidValue` if it contains `\0`.
pub fn validate_value(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ValidationError::EmptyValue(name.to_string()).into());
    }
    if value.contains('\0') {
        return Err(ValidationError::InvalidValue(name.to_string()).into());
    }

    Ok(())
}
