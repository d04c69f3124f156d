//! Durable key-value storage port.

/// Error type returned by storage adapters.
pub type StorageError = Box<dyn std::error::Error + Send + Sync>;

/// Slot holding the JSON-encoded catalog cache entry.
pub const CACHE_SLOT: &str = "catalog_cache";

/// Slot holding the sealed settings blob.
pub const SETTINGS_SLOT: &str = "settings";

/// Stores opaque string values under named slots.
///
/// Values survive across process runs. No schema is enforced beyond
/// "a string or nothing".
pub trait KeyValueStore: Send + Sync {
    /// Reads a slot, returning `None` when it has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, slot: &str) -> Result<Option<String>, StorageError>;

    /// Writes a slot, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn set(&self, slot: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a slot. Removing an absent slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects the removal.
    fn remove(&self, slot: &str) -> Result<(), StorageError>;
}
