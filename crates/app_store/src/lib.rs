//! Persisted application state container.
//!
//! [`AppStore`] keeps the in-memory [`AppState`] (theme, loading flag, error slot, keyed data
//! bag), notifies subscribers synchronously on each committed mutation, and persists the
//! `{theme, data}` subset through a [`platform_host::StorageAdapter`]. A companion
//! [`PersistenceWorker`] hydrates the store at startup and serializes writes so the last
//! committed mutation is also the last value written.
//!
//! # Example
//!
//! ```rust
//! use app_store::{AppStore, Theme};
//! use futures::{executor::LocalPool, task::LocalSpawnExt};
//! use platform_host::{MemoryKeyValueStore, StorageAdapter};
//!
//! let memory = MemoryKeyValueStore::default();
//! let (store, worker) = AppStore::new(StorageAdapter::from_store(memory.clone()));
//! let mut pool = LocalPool::new();
//! pool.spawner().spawn_local(worker.run()).expect("spawn worker");
//! pool.run_until_stalled();
//!
//! store.set_theme(Theme::Dark);
//! pool.run_until_stalled();
//! assert!(memory.raw("app-storage").expect("persisted").contains("\"dark\""));
//! ```

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod context;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod remote;
pub mod store;

#[cfg(test)]
mod test_support;

#[cfg(target_arch = "wasm32")]
pub use context::{install_app_store, spawn_persistence_worker};
pub use context::{install_app_store_with, provide_app_store, try_use_app_store, use_app_store};
pub use model::{
    AppState, DataBag, PersistedSnapshot, SnapshotError, StorePhase, Theme, APP_STORAGE_KEY,
    SNAPSHOT_SCHEMA_VERSION,
};
pub use persistence::{load_snapshot, persist_snapshot, PersistenceWorker};
pub use reducer::{reduce_app_state, StoreAction, StoreEffect};
pub use remote::{load_into_store, track_request};
pub use store::{AppStore, Subscription};
