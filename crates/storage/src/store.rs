//! Two-tier store
//!
//! Each collection is persisted in two places: a key-value entry as the
//! primary location and a mirror file for platforms where key-value
//! persistence is unreliable. Reads prefer the key-value tier and consult
//! the mirror when the entry is absent or unreadable; a corrupt blob is
//! deleted and the next tier takes over. Writes serialize once and attempt
//! both tiers independently, failing only when neither accepted the data.
//! Settings live in the key-value tier alone.
//!
//! Whatever loads is passed through [`robur_domain::sanitize`], so the
//! repository contract of handing out only valid collections holds no
//! matter what the tiers contain.

use log::warn;
use robur_domain as domain;
use robur_domain::{Clock, DeleteError, ReadError, StorageError, UpdateError, sanitize};
use serde_json::Value;
use strum::AsRefStr;

use super::{FileStore, KeyValueStore};

macro_rules! warn_on_error {
    ($result: expr, $action: literal, $name: expr) => {
        if let Err(err) = $result {
            warn!("failed to {} {}: {err}", $action, $name);
        }
    };
}

#[derive(AsRefStr, Clone, Copy)]
enum Collection {
    #[strum(serialize = "workouts")]
    Workouts,
    #[strum(serialize = "templates")]
    Templates,
    #[strum(serialize = "settings")]
    Settings,
}

impl Collection {
    fn mirror_name(self) -> String {
        format!("{}.json", self.as_ref())
    }
}

pub struct Store<K, F, C> {
    key_value: K,
    files: F,
    clock: C,
}

impl<K, F, C> Store<K, F, C>
where
    K: KeyValueStore,
    F: FileStore,
    C: Clock,
{
    pub fn new(key_value: K, files: F, clock: C) -> Self {
        Self {
            key_value,
            files,
            clock,
        }
    }

    /// Loads the raw document of a collection from the first tier holding a
    /// readable one. Corrupt blobs are discarded where they were found.
    fn read_document(&self, collection: Collection) -> Option<Value> {
        match self.key_value.get(collection.as_ref()) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(document) => return Some(document),
                Err(err) => {
                    warn!("discarding corrupt {} entry: {err}", collection.as_ref());
                    warn_on_error!(
                        self.key_value.remove(collection.as_ref()),
                        "remove",
                        collection.as_ref()
                    );
                }
            },
            Err(StorageError::NotFound) => {}
            Err(err) => warn!("failed to read {} entry: {err}", collection.as_ref()),
        }

        match self.files.read(&collection.mirror_name()) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(document) => return Some(document),
                Err(err) => {
                    warn!("discarding corrupt {} mirror: {err}", collection.as_ref());
                    warn_on_error!(
                        self.files.delete(&collection.mirror_name()),
                        "delete",
                        collection.as_ref()
                    );
                }
            },
            Err(StorageError::NotFound) => {}
            Err(err) => warn!("failed to read {} mirror: {err}", collection.as_ref()),
        }

        None
    }

    fn write_document(&self, collection: Collection, json: &str) -> Result<(), UpdateError> {
        let entry = self
            .key_value
            .set(collection.as_ref(), json)
            .inspect_err(|err| warn!("failed to write {} entry: {err}", collection.as_ref()));
        let mirror = self
            .files
            .write(&collection.mirror_name(), json)
            .inspect_err(|err| warn!("failed to write {} mirror: {err}", collection.as_ref()));
        match (entry, mirror) {
            (Err(err), Err(_)) => Err(err.into()),
            _ => Ok(()),
        }
    }

    fn delete_document(&self, collection: Collection) -> Result<(), DeleteError> {
        let entry = tolerate_missing(self.key_value.remove(collection.as_ref()));
        let mirror = tolerate_missing(self.files.delete(&collection.mirror_name()));
        entry?;
        mirror?;
        Ok(())
    }
}

impl<K, F, C> domain::WorkoutRepository for Store<K, F, C>
where
    K: KeyValueStore,
    F: FileStore,
    C: Clock,
{
    fn read_workouts(&self) -> Result<Vec<domain::Workout>, ReadError> {
        Ok(self
            .read_document(Collection::Workouts)
            .map(|document| sanitize::workouts(&document, self.clock.now()))
            .unwrap_or_default())
    }

    fn write_workouts(&self, workouts: &[domain::Workout]) -> Result<(), UpdateError> {
        self.write_document(Collection::Workouts, &encode(&workouts)?)
    }

    fn delete_workouts(&self) -> Result<(), DeleteError> {
        self.delete_document(Collection::Workouts)
    }
}

impl<K, F, C> domain::TemplateRepository for Store<K, F, C>
where
    K: KeyValueStore,
    F: FileStore,
    C: Clock,
{
    fn read_templates(&self) -> Result<Vec<domain::Template>, ReadError> {
        Ok(self
            .read_document(Collection::Templates)
            .map(|document| sanitize::templates(&document, self.clock.now()))
            .unwrap_or_default())
    }

    fn write_templates(&self, templates: &[domain::Template]) -> Result<(), UpdateError> {
        self.write_document(Collection::Templates, &encode(&templates)?)
    }

    fn delete_templates(&self) -> Result<(), DeleteError> {
        self.delete_document(Collection::Templates)
    }
}

impl<K, F, C> domain::SettingsRepository for Store<K, F, C>
where
    K: KeyValueStore,
    F: FileStore,
    C: Clock,
{
    fn read_settings(&self) -> Result<domain::Settings, ReadError> {
        match self.key_value.get(Collection::Settings.as_ref()) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(settings) => Ok(settings),
                Err(err) => {
                    warn!("discarding corrupt settings entry: {err}");
                    warn_on_error!(
                        self.key_value.remove(Collection::Settings.as_ref()),
                        "remove",
                        Collection::Settings.as_ref()
                    );
                    Ok(domain::Settings::default())
                }
            },
            Err(StorageError::NotFound) => Ok(domain::Settings::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_settings(&self, settings: &domain::Settings) -> Result<(), UpdateError> {
        self.key_value
            .set(Collection::Settings.as_ref(), &encode(settings)?)
            .map_err(Into::into)
    }

    fn delete_settings(&self) -> Result<(), DeleteError> {
        tolerate_missing(self.key_value.remove(Collection::Settings.as_ref())).map_err(Into::into)
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<String, UpdateError> {
    serde_json::to_string(value).map_err(|err| UpdateError::Other(Box::new(err)))
}

fn tolerate_missing(result: Result<(), StorageError>) -> Result<(), StorageError> {
    match result {
        Ok(()) | Err(StorageError::NotFound) => Ok(()),
        Err(err) => Err(err),
    }
}
