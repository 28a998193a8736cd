//! `localStorage`-backed key-value store implementation.
//!
//! The browser API is synchronous; the async [`KeyValueStore`] impl wraps it in ready futures.

use platform_host::{KeyValueFuture, KeyValueStore};

#[derive(Debug, Clone, Copy, Default)]
/// Browser key-value store backed by `window.localStorage`.
pub struct WebKeyValueStore;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, String> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| "localStorage unavailable".to_string())
}

impl WebKeyValueStore {
    /// Loads the raw string for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the read throws.
    pub fn load(self, key: &str) -> Result<Option<String>, String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .get_item(key)
                .map_err(|e| format!("localStorage get_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(None)
        }
    }

    /// Saves a raw string for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the write fails (for example when
    /// the quota is exceeded).
    pub fn save(self, key: &str, value: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .set_item(key, value)
                .map_err(|e| format!("localStorage set_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, value);
            Ok(())
        }
    }

    /// Deletes `key` from localStorage.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the delete fails.
    pub fn delete(self, key: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .remove_item(key)
                .map_err(|e| format!("localStorage remove_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(())
        }
    }

    /// Clears the origin's localStorage.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the clear fails.
    pub fn delete_all(self) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .clear()
                .map_err(|e| format!("localStorage clear failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Ok(())
        }
    }
}

impl KeyValueStore for WebKeyValueStore {
    fn get_item<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<Option<String>, String>> {
        let store = *self;
        Box::pin(async move { store.load(key) })
    }

    fn set_item<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
    ) -> KeyValueFuture<'a, Result<(), String>> {
        let store = *self;
        Box::pin(async move { store.save(key, value) })
    }

    fn remove_item<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<(), String>> {
        let store = *self;
        Box::pin(async move { store.delete(key) })
    }

    fn clear<'a>(&'a self) -> KeyValueFuture<'a, Result<(), String>> {
        let store = *self;
        Box::pin(async move { store.delete_all() })
    }
}
