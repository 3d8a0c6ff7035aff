//! In-memory secret source.

use std::collections::BTreeMap;

use super::SecretSource;
use crate::core::types::{SecretName, SecretValue};
use crate::error::{Result, VaultError};

/// Secrets held in a map.
#[derive(Debug, Default, Clone)]
pub struct Memory {
    secrets: BTreeMap<String, SecretValue>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.secrets
            .insert(name.to_string(), SecretValue::new(value));
    }

    pub fn remove(&mut self, name: &str) -> Option<SecretValue> {
        self.secrets.remove(name)
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for Memory {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut memory = Self::new();
        for (k, v) in iter {
            memory.insert(k.as_ref(), v.as_ref());
        }
        memory
    }
}

impl SecretSource for Memory {
    fn describe(&self) -> String {
        format!("memory ({} secrets)", self.secrets.len())
    }

    fn fetch(&self, name: &SecretName) -> Result<SecretValue> {
        self.secrets.get(name.as_str()).cloned().ok_or_else(|| {
            VaultError::NotFound {
                secret: name.to_string(),
            }
            .into()
        })
    }
}
