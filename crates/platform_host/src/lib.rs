//! Typed host storage contract shared by the state container and platform adapters.
//!
//! The host platform supplies an opaque async key-value capability ([`KeyValueStore`]). This
//! crate defines that contract, baseline in-memory/no-op/native-file implementations, and the
//! [`StorageAdapter`] boundary that applies the "fail silent, log" policy on top of it.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::file::FileKeyValueStore;
pub use storage::{
    adapter::{StorageAdapter, StorageRead},
    key_value::{KeyValueFuture, KeyValueStore, MemoryKeyValueStore, NoopKeyValueStore},
};
