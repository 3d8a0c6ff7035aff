//! Domain types.
//!
//! Newtypes for the names and values that flow from the vault into the
//! environment, so a vault-style name can never be used where an
//! environment variable name is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroizing;

use crate::core::validation;
use crate::error::{Error, Result};

/// A secret name as stored in the vault (e.g. `DATABASE-URL`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SecretName(String);

impl SecretName {
    /// Parse and validate a secret name.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the name is not a valid vault secret name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validation::validate_secret_name(&name)?;
        Ok(Self(name))
    }

    /// The name as stored in the vault.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Environment variable this secret is published under.
    pub fn env_var(&self) -> EnvVarName {
        EnvVarName(self.0.replace('-', "_"))
    }
}

impl fmt::Display for SecretName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SecretName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl Serialize for SecretName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SecretName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// An environment variable name derived from a [`SecretName`].
///
/// Only constructed through [`SecretName::env_var`], so it never contains a
/// hyphen.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnvVarName(String);

impl EnvVarName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnvVarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<std::ffi::OsStr> for EnvVarName {
    fn as_ref(&self) -> &std::ffi::OsStr {
        self.0.as_ref()
    }
}

/// An opaque secret value.
///
/// Wiped from memory on drop; `Debug` never prints the contents.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(Zeroizing<String>);

impl SecretValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// The plaintext value.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretValue([REDACTED; {} bytes])", self.0.len())
    }
}

/// A vault instance name (e.g. `my-vault`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultName(String);

impl VaultName {
    /// Parse and validate a vault name.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the name breaks Key Vault naming rules.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validation::validate_vault_name(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Public-cloud URL of this vault.
    pub fn url(&self) -> String {
        format!(
            "https://{}.{}",
            self.0,
            crate::core::constants::VAULT_DNS_SUFFIX
        )
    }
}

impl fmt::Display for VaultName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a list of raw names into validated secret names.
///
/// Rejects empty lists and duplicates; order is preserved. Key Vault names
/// are case-insensitive, so `db-url` and `DB-URL` count as the same secret.
///
/// # Errors
///
/// Returns `ValidationError` on the first invalid or repeated name.
pub fn parse_secret_names<S: AsRef<str>>(raw: &[S]) -> Result<Vec<SecretName>> {
    if raw.is_empty() {
        return Err(crate::error::ValidationError::NoSecrets.into());
    }

    let mut names: Vec<SecretName> = Vec::with_capacity(raw.len());
    for name in raw {
        let name = SecretName::new(name.as_ref())?;
        if names
            .iter()
            .any(|seen| seen.as_str().eq_ignore_ascii_case(name.as_str()))
        {
            return Err(crate::error::ValidationError::DuplicateSecret(name.0).into());
        }
        names.push(name);
    }

    Ok(names)
}
