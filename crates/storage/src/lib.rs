#![warn(clippy::pedantic)]

use robur_domain::StorageError;

pub mod fs;
pub mod memory;
pub mod store;

pub use store::Store;

/// Durable string storage addressed by key. Missing keys are reported as
/// [`StorageError::NotFound`].
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<String, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Durable string storage addressed by file name. Missing files are
/// reported as [`StorageError::NotFound`].
pub trait FileStore {
    fn read(&self, name: &str) -> Result<String, StorageError>;
    fn write(&self, name: &str, content: &str) -> Result<(), StorageError>;
    fn delete(&self, name: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<String, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: FileStore + ?Sized> FileStore for &T {
    fn read(&self, name: &str) -> Result<String, StorageError> {
        (**self).read(name)
    }

    fn write(&self, name: &str, content: &str) -> Result<(), StorageError> {
        (**self).write(name, content)
    }

    fn delete(&self, name: &str) -> Result<(), StorageError> {
        (**self).delete(name)
    }
}
