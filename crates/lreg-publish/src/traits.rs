//! The [`KeyValueStore`] trait defining the external cache interface.

use crate::error::Result;

/// External keyed string store the registry address is published into.
///
/// Implementations must be thread-safe. `set` overwrites any existing value.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write (create or overwrite) a value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Short description of the backend for log lines.
    fn describe(&self) -> String;
}
