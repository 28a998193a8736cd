//! Browser (`wasm32`) implementation of the [`platform_host`] key-value storage contract.
//!
//! On non-wasm targets the browser adapter compiles to an empty, always-successful store so
//! native builds and tests can link the same wiring.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and the key-value adapter factory.
pub mod adapters;
pub mod storage;

pub use adapters::{
    host_strategy_name, key_value_store, selected_host_strategy, HostStrategy,
    KeyValueStoreAdapter,
};
pub use storage::local_storage::WebKeyValueStore;
