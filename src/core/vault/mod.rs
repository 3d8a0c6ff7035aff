//! Secret sources.
//!
//! A source resolves vault-style secret names to values. Three backends are
//! provided:
//!
//! - **KeyVault**: Azure Key Vault over its REST API (production)
//! - **LocalFile**: a JSON file of name/value pairs (local development)
//! - **Memory**: an in-process map (tests, embedding)

use crate::core::retry::Deadline;
use crate::core::types::{SecretName, SecretValue};
use crate::error::Result;

mod keyvault;
mod local;
mod memory;

pub use keyvault::KeyVault;
pub use local::LocalFile;
pub use memory::Memory;

/// Backend that can resolve secret names to values.
pub trait SecretSource {
    /// Short description for logs and console output.
    fn describe(&self) -> String;

    /// Establish identity before any secret is requested.
    ///
    /// Sources without authentication succeed immediately.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if no usable identity is available.
    fn authenticate(&self) -> Result<()> {
        Ok(())
    }

    /// Fetch the current value of one secret.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` when the secret does not exist, or an
    /// authentication, connectivity or timeout error.
    fn fetch(&self, name: &SecretName) -> Result<SecretValue>;

    /// [`authenticate`](Self::authenticate), bounded by `deadline`.
    ///
    /// Local sources never block, so the default ignores the deadline.
    fn authenticate_until(&self, _deadline: Deadline) -> Result<()> {
        self.authenticate()
    }

    /// [`fetch`](Self::fetch), bounded by `deadline`: remote sources cap
    /// request timeouts and retries so the call ends by then.
    fn fetch_until(&self, name: &SecretName, _deadline: Deadline) -> Result<SecretValue> {
        self.fetch(name)
    }
}

impl<S: SecretSource + ?Sized> SecretSource for Box<S> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn authenticate(&self) -> Result<()> {
        (**self).authenticate()
    }

    fn fetch(&self, name: &SecretName) -> Result<SecretValue> {
        (**self).fetch(name)
    }

    fn authenticate_until(&self, deadline: Deadline) -> Result<()> {
        (**self).authenticate_until(deadline)
    }

    fn fetch_until(&self, name: &SecretName, deadline: Deadline) -> Result<SecretValue> {
        (**self).fetch_until(name, deadline)
    }
}
