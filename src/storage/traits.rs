//! Key-value storage trait.
//!
//! The app persists everything as string values under string keys, the same
//! shape as browser local storage. Gate flags and parent settings are layered
//! on top in [`crate::storage::flags`] and [`crate::storage::settings`].

use std::sync::Arc;

use crate::error::Result;

/// Trait for key-value storage backends.
///
/// Implementations must survive application restarts (except the in-memory
/// store, which exists for tests and embedding).
pub trait LocalStore: Send + Sync {
    /// Read a value.
    ///
    /// Returns `Ok(None)` if the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value.
    ///
    /// Returns `Ok(())` even if the key doesn't exist.
    fn remove(&self, key: &str) -> Result<()>;

    /// List all keys currently stored, sorted.
    fn keys(&self) -> Result<Vec<String>>;

    /// Check if a key exists.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Blanket implementation for Arc-wrapped stores.
///
/// Lets the sequencer and the language context share one store.
impl<T: LocalStore + ?Sized> LocalStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}
