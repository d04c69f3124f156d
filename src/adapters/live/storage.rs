//! File-backed key-value storage: one file per slot.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::ports::{KeyValueStore, StorageError};

/// Stores each slot as `<dir>/<slot>.json`.
///
/// The directory is created on first write.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The root directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, slot: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.slot_path(slot)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, slot: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(std::fs::write(self.slot_path(slot), value)?)
    }

    fn remove(&self, slot: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.slot_path(slot)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
