//! Typed remote-access client for APIs that answer with a `{ success, data?, error? }` envelope.
//!
//! [`RequestClient`] appends paths to a configured base URL, always sends
//! `Content-Type: application/json`, and returns the unwrapped `data` payload only when the
//! status is 2xx, `success` is `true`, and `data` is present. Everything else is a
//! [`RequestFailure`]. The client holds no mutable state and never retries.
//!
//! # Example
//!
//! ```rust
//! use api_client::{ClientConfig, MemoryTransport, RequestClient};
//! use futures::executor::block_on;
//! use serde_json::json;
//!
//! let transport = MemoryTransport::default();
//! transport.push_json(200, &json!({"success": true, "data": {"count": 2}}));
//! let client = RequestClient::with_transport(ClientConfig::default(), transport);
//!
//! let payload: serde_json::Value = block_on(client.get("/api/stats")).expect("payload");
//! assert_eq!(payload, json!({"count": 2}));
//! ```

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod transport;

pub use client::{decode_response, RequestClient, RequestOptions, CONTENT_TYPE_JSON};
pub use config::{ClientConfig, API_URL_ENV};
pub use envelope::ApiEnvelope;
pub use error::{RequestFailure, GENERIC_FAILURE_MESSAGE};
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MemoryTransport, ReqwestTransport,
    TransportFuture,
};
