//! File-system backends
//!
//! [`KeyValueFile`] keeps all key-value entries in a single JSON file,
//! [`Files`] keeps one file per name under a root directory. Together they
//! provide the two tiers of [`crate::Store`] on platforms with a real file
//! system.

use std::{collections::BTreeMap, fs, io, path::PathBuf};

use log::warn;
use robur_domain::StorageError;

use super::{FileStore, KeyValueStore};

pub struct KeyValueFile {
    path: PathBuf,
}

impl KeyValueFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the entry map. A missing file is an empty map; an unreadable
    /// one is deleted and treated as empty.
    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(entries) => Ok(entries),
                Err(err) => {
                    warn!(
                        "discarding corrupt key-value store {}: {err}",
                        self.path.display()
                    );
                    let _ = fs::remove_file(&self.path);
                    Ok(BTreeMap::new())
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(StorageError::Other(Box::new(err))),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let text =
            serde_json::to_string(entries).map_err(|err| StorageError::Other(Box::new(err)))?;
        fs::write(&self.path, text).map_err(io_error)
    }
}

impl KeyValueStore for KeyValueFile {
    fn get(&self, key: &str) -> Result<String, StorageError> {
        self.load()?.remove(key).ok_or(StorageError::NotFound)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.load()?;
        entries.remove(key).ok_or(StorageError::NotFound)?;
        self.save(&entries)
    }
}

pub struct Files {
    root: PathBuf,
}

impl Files {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileStore for Files {
    fn read(&self, name: &str) -> Result<String, StorageError> {
        fs::read_to_string(self.root.join(name)).map_err(io_error)
    }

    fn write(&self, name: &str, content: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(io_error)?;
        fs::write(self.root.join(name), content).map_err(io_error)
    }

    fn delete(&self, name: &str) -> Result<(), StorageError> {
        fs::remove_file(self.root.join(name)).map_err(io_error)
    }
}

fn io_error(err: io::Error) -> StorageError {
    if err.kind() == io::ErrorKind::NotFound {
        StorageError::NotFound
    } else {
        StorageError::Other(Box::new(err))
    }
}
