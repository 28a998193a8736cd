//! Key-value storage contract supplied by the host platform, plus baseline adapters.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

/// Object-safe boxed future used by [`KeyValueStore`] async methods.
pub type KeyValueFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Opaque async key-value capability (raw strings per key).
///
/// Implementations report failures as `Err`; callers that need the fail-silent contract go
/// through [`crate::StorageAdapter`].
pub trait KeyValueStore {
    /// Loads the raw string stored under `key`.
    fn get_item<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<Option<String>, String>>;

    /// Stores a raw string under `key`, replacing any previous value.
    fn set_item<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
    ) -> KeyValueFuture<'a, Result<(), String>>;

    /// Deletes `key`. Deleting a missing key succeeds.
    fn remove_item<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<(), String>>;

    /// Deletes every key owned by this store.
    fn clear<'a>(&'a self) -> KeyValueFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op store for unsupported targets and baseline tests.
pub struct NoopKeyValueStore;

impl KeyValueStore for NoopKeyValueStore {
    fn get_item<'a>(
        &'a self,
        _key: &'a str,
    ) -> KeyValueFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn set_item<'a>(
        &'a self,
        _key: &'a str,
        _value: &'a str,
    ) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn remove_item<'a>(&'a self, _key: &'a str) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn clear<'a>(&'a self) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store keyed by string. Clones share the same map.
pub struct MemoryKeyValueStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    /// Creates a store pre-populated with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::default();
        store.inner.borrow_mut().extend(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        store
    }

    /// Returns the raw value for `key` without going through the async contract.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    /// Lists stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = self.inner.borrow().keys().cloned().collect::<Vec<_>>();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.raw(key)) })
    }

    fn set_item<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
    ) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        })
    }

    fn remove_item<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }

    fn clear<'a>(&'a self) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().clear();
            Ok(())
        })
    }
}
