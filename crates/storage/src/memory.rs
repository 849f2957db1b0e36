//! In-memory backends
//!
//! Volatile [`KeyValueStore`] and [`FileStore`] implementations backed by
//! maps. They serve as the storage tiers in tests and in environments
//! without durable storage.

use std::{cell::RefCell, collections::BTreeMap};

use robur_domain::StorageError;

use super::{FileStore, KeyValueStore};

#[derive(Debug, Default)]
pub struct MemoryKeyValue {
    entries: RefCell<BTreeMap<String, String>>,
}

impl KeyValueStore for MemoryKeyValue {
    fn get(&self, key: &str) -> Result<String, StorageError> {
        self.entries
            .borrow()
            .get(key)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .remove(key)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

#[derive(Debug, Default)]
pub struct MemoryFiles {
    files: RefCell<BTreeMap<String, String>>,
}

impl FileStore for MemoryFiles {
    fn read(&self, name: &str) -> Result<String, StorageError> {
        self.files
            .borrow()
            .get(name)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    fn write(&self, name: &str, content: &str) -> Result<(), StorageError> {
        self.files
            .borrow_mut()
            .insert(name.to_string(), content.to_string());
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<(), StorageError> {
        self.files
            .borrow_mut()
            .remove(name)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}
