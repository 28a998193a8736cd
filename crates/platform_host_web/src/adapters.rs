use platform_host::{KeyValueFuture, KeyValueStore, NoopKeyValueStore};

use crate::WebKeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Compile-time selected host strategy for `platform_host_web` adapters.
pub enum HostStrategy {
    /// Browser-backed adapters from `platform_host_web`.
    Browser,
    /// Placeholder adapters for hosts that supply no durable storage.
    DesktopStub,
}

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "desktop-host-stub")]
    {
        HostStrategy::DesktopStub
    }

    #[cfg(not(feature = "desktop-host-stub"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    match selected_host_strategy() {
        HostStrategy::Browser => "browser",
        HostStrategy::DesktopStub => "desktop-stub",
    }
}

/// Adapter enum that erases the concrete key-value backend behind [`KeyValueStore`].
#[derive(Debug, Clone, Copy)]
pub enum KeyValueStoreAdapter {
    /// Browser `localStorage` persistence.
    Browser(WebKeyValueStore),
    /// No-op fallback used when durable storage is intentionally stubbed.
    DesktopStub(NoopKeyValueStore),
}

impl KeyValueStore for KeyValueStoreAdapter {
    fn get_item<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<Option<String>, String>> {
        match self {
            Self::Browser(store) => store.get_item(key),
            Self::DesktopStub(store) => store.get_item(key),
        }
    }

    fn set_item<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
    ) -> KeyValueFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(store) => store.set_item(key, value),
            Self::DesktopStub(store) => store.set_item(key, value),
        }
    }

    fn remove_item<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(store) => store.remove_item(key),
            Self::DesktopStub(store) => store.remove_item(key),
        }
    }

    fn clear<'a>(&'a self) -> KeyValueFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(store) => store.clear(),
            Self::DesktopStub(store) => store.clear(),
        }
    }
}

/// Builds the key-value adapter for the compile-time selected host strategy.
pub fn key_value_store() -> KeyValueStoreAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => KeyValueStoreAdapter::Browser(WebKeyValueStore),
        HostStrategy::DesktopStub => KeyValueStoreAdapter::DesktopStub(NoopKeyValueStore),
    }
}
