//! Environment bootstrap.
//!
//! Resolves an ordered list of secret names against a [`SecretSource`] into
//! a [`Resolved`] set of environment variables. Resolution is fail-closed
//! and atomic: the source is authenticated before the first fetch, any
//! single failure aborts the whole run, and nothing is published until
//! every secret has a usable value. The deadline covers authentication,
//! every fetch and every retry in between.
//!
//! ```ignore
//! let resolved = bootstrap::resolve(&vault, &names, &Options::default())?;
//! resolved.apply(); // before any other thread starts
//! ```

use std::process::Command;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::constants;
use crate::core::retry::Deadline;
use crate::core::types::{EnvVarName, SecretName, SecretValue};
use crate::core::validation;
use crate::core::vault::SecretSource;
use crate::error::Result;

/// Knobs for a bootstrap run.
#[derive(Debug, Clone)]
pub struct Options {
    /// Deadline for the whole run, authentication included
    pub deadline: Option<Duration>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            deadline: Some(Duration::from_secs(constants::DEFAULT_TOTAL_TIMEOUT_SECS)),
        }
    }
}

/// Fully resolved secrets, in request order, ready to publish.
#[derive(Debug, Clone, Default)]
pub struct Resolved {
    entries: Vec<(EnvVarName, SecretValue)>,
}

impl Resolved {
    /// Value published under `var`, if any.
    pub fn get(&self, var: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == var)
            .map(|(_, v)| v.expose())
    }

    /// Iterate over `(variable, value)` pairs in request order.
    pub fn iter(&self) -> impl Iterator<Item = (&EnvVarName, &SecretValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Variable names in request order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(k, _)| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Publish into this process's environment.
    ///
    /// Must run before any other thread is spawned: the process environment
    /// is shared and unsynchronized.
    pub fn apply(&self) {
        for (name, value) in &self.entries {
            std::env::set_var(name.as_str(), value.expose());
        }
        debug!(count = self.entries.len(), "environment updated");
    }

    /// Inject into a child process without touching this process.
    pub fn apply_to(&self, cmd: &mut Command) {
        for (name, value) in &self.entries {
            cmd.env(name.as_str(), value.expose());
        }
    }
}

/// Resolve every name from `source`, in order.
///
/// # Errors
///
/// Fails on the first authentication, lookup, connectivity or timeout
/// error, or when a secret value is empty or contains NUL. No partial
/// result is returned. The error is returned, not printed: reporting it is
/// the caller's job.
pub fn resolve<S: SecretSource + ?Sized>(
    source: &S,
    names: &[SecretName],
    options: &Options,
) -> Result<Resolved> {
    let deadline = options.deadline.map_or_else(Deadline::none, Deadline::after);
    let target = source.describe();

    let result = resolve_inner(source, names, deadline, &target);
    match &result {
        Ok(resolved) => info!(
            source = %target,
            count = resolved.len(),
            elapsed_ms = deadline.elapsed().as_millis() as u64,
            "bootstrap complete"
        ),
        Err(err) => debug!(source = %target, error = %err, "bootstrap failed"),
    }
    result
}

fn resolve_inner<S: SecretSource + ?Sized>(
    source: &S,
    names: &[SecretName],
    deadline: Deadline,
    target: &str,
) -> Result<Resolved> {
    if names.is_empty() {
        return Err(crate::error::ValidationError::NoSecrets.into());
    }

    debug!(source = %target, "authenticating");
    source.authenticate_until(deadline)?;

    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        deadline.check(target)?;

        debug!(secret = %name, "resolving");
        let value = source.fetch_until(name, deadline)?;
        validation::validate_value(name.as_str(), value.expose())?;
        entries.push((name.env_var(), value));
    }

    deadline.check(target)?;
    Ok(Resolved { entries })
}

/// Resolve and publish into the process environment.
///
/// The environment is only written when resolution succeeded completely.
pub fn bootstrap<S: SecretSource + ?Sized>(
    source: &S,
    names: &[SecretName],
    options: &Options,
) -> Result<Resolved> {
    let resolved = resolve(source, names, options)?;
    resolved.apply();
    Ok(resolved)
}
