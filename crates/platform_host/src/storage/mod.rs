//! Host key-value storage contracts, adapters, and the fail-silent boundary.

pub mod adapter;
#[cfg(not(target_arch = "wasm32"))]
pub mod file;
pub mod key_value;
