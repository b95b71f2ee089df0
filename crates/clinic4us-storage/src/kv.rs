//! The durable key/value seam.
//!
//! Models the browser-local storage the client persists its session into:
//! string keys, string values, synchronous reads and writes, whole-value
//! replacement on every `set`.

use crate::error::StorageResult;

/// Storage trait for durable string slots.
///
/// Implementations must write each value in a single operation; callers
/// never observe a partially written slot.
pub trait KeyValueStorage: Send + Sync {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}
