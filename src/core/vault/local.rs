//! Local JSON secrets file.
//!
//! Lets a service start without a vault during local development. The file
//! is a flat JSON object keyed by vault-style names:
//!
//! ```json
//! { "DATABASE-URL": "postgres://localhost/app", "OPENAI-API-KEY": "sk-..." }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{Memory, SecretSource};
use crate::core::types::{SecretName, SecretValue};
use crate::error::{ConfigError, Result};

/// Secrets read once from a JSON file.
#[derive(Debug)]
pub struct LocalFile {
    path: PathBuf,
    secrets: Memory,
}

impl LocalFile {
    /// Read and parse the file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LocalFile` if the file is missing, is not a JSON
    /// object, or contains non-string values.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let failed = |reason: String| ConfigError::LocalFile {
            path: path.display().to_string(),
            reason,
        };

        let contents = std::fs::read_to_string(path).map_err(|e| failed(e.to_string()))?;
        let raw: BTreeMap<String, String> =
            serde_json::from_str(&contents).map_err(|e| failed(e.to_string()))?;

        debug!(path = %path.display(), count = raw.len(), "loaded local secrets file");

        Ok(Self {
            path: path.to_path_buf(),
            secrets: raw.into_iter().collect(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SecretSource for LocalFile {
    fn describe(&self) -> String {
        format!("local file {}", self.path.display())
    }

    fn fetch(&self, name: &SecretName) -> Result<SecretValue> {
        self.secrets.fetch(name)
    }
}
