//! Fail-silent storage boundary over a host [`KeyValueStore`].
//!
//! Callers never see storage errors from the plain methods: reads degrade to `None`, writes to
//! no-ops, and the underlying error is logged. [`StorageAdapter::read`] and the `try_*` methods
//! expose the same calls as explicit outcomes for code that must tell "nothing stored" apart
//! from "storage failed".

use std::rc::Rc;

use leptos::logging;
use serde::{de::DeserializeOwned, Serialize};

use super::key_value::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of a typed storage read.
pub enum StorageRead<T> {
    /// A value was stored and decoded.
    Found(T),
    /// Nothing (or an empty string) is stored under the key.
    Missing,
    /// The store failed or the stored text could not be decoded.
    Failed(String),
}

impl<T> StorageRead<T> {
    /// Collapses the outcome to the fail-silent `Option` view.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Missing | Self::Failed(_) => None,
        }
    }

    /// Returns `true` for [`StorageRead::Failed`].
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Clone)]
/// Shared handle to a host key-value store with JSON helpers and the fail-silent policy.
pub struct StorageAdapter {
    store: Rc<dyn KeyValueStore>,
}

impl std::fmt::Debug for StorageAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageAdapter").finish_non_exhaustive()
    }
}

impl StorageAdapter {
    /// Wraps a host store.
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Wraps a concrete host store by value.
    pub fn from_store(store: impl KeyValueStore + 'static) -> Self {
        Self::new(Rc::new(store))
    }

    /// Reads and decodes the JSON value stored under `key`.
    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> StorageRead<T> {
        match self.store.get_item(key).await {
            Ok(Some(raw)) if !raw.is_empty() => match serde_json::from_str(&raw) {
                Ok(value) => StorageRead::Found(value),
                Err(err) => StorageRead::Failed(format!("decode `{key}` failed: {err}")),
            },
            Ok(_) => StorageRead::Missing,
            Err(err) => StorageRead::Failed(err),
        }
    }

    /// Reads a typed value, logging and returning `None` on any failure.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.read(key).await {
            StorageRead::Failed(err) => {
                logging::warn!("storage get `{key}` failed: {err}");
                None
            }
            read => read.into_option(),
        }
    }

    /// Reads the raw stored text, logging and returning `None` on failure.
    pub async fn get_raw(&self, key: &str) -> Option<String> {
        match self.store.get_item(key).await {
            Ok(raw) => raw,
            Err(err) => {
                logging::warn!("storage get `{key}` failed: {err}");
                None
            }
        }
    }

    /// Serializes and stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the store write fails.
    pub async fn try_set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), String> {
        let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
        self.store.set_item(key, &raw).await
    }

    /// Deletes `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the store delete fails.
    pub async fn try_remove(&self, key: &str) -> Result<(), String> {
        self.store.remove_item(key).await
    }

    /// Deletes every key in the store.
    ///
    /// # Errors
    ///
    /// Returns an error when the store clear fails.
    pub async fn try_clear(&self) -> Result<(), String> {
        self.store.clear().await
    }

    /// Stores `value` under `key`; failures are logged and swallowed.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(err) = self.try_set(key, value).await {
            logging::warn!("storage set `{key}` failed: {err}");
        }
    }

    /// Deletes `key`; failures are logged and swallowed.
    pub async fn remove(&self, key: &str) {
        if let Err(err) = self.try_remove(key).await {
            logging::warn!("storage remove `{key}` failed: {err}");
        }
    }

    /// Clears the store; failures are logged and swallowed.
    pub async fn clear(&self) {
        if let Err(err) = self.try_clear().await {
            logging::warn!("storage clear failed: {err}");
        }
    }
}
