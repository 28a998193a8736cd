//! Consumer flow tying remote requests to the store's loading/error/data fields.

use std::future::Future;

use api_client::{RequestClient, RequestFailure};
use leptos::logging;
use serde_json::Value;

use crate::store::AppStore;

struct LoadingGuard<'a>(&'a AppStore);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.end_tracked_request();
    }
}

/// Awaits `request` while `is_loading` is set, recording a failure message in `error`.
///
/// On success the error slot is cleared. Overlapping calls share the flag: it is reset when the
/// last of them completes or is dropped. The error slot reflects whichever finished last.
///
/// # Errors
///
/// Returns the request's [`RequestFailure`] unchanged.
pub async fn track_request<T, F>(store: &AppStore, request: F) -> Result<T, RequestFailure>
where
    F: Future<Output = Result<T, RequestFailure>>,
{
    store.begin_tracked_request();
    let _loading = LoadingGuard(store);
    let result = request.await;
    match &result {
        Ok(_) => store.clear_error(),
        Err(failure) => store.set_error(failure.message().to_string()),
    }
    result
}

/// Fetches `path` and stores the payload in the data bag under `key`.
///
/// # Errors
///
/// Returns the [`RequestFailure`] after writing its message into the store's error slot; the
/// data bag is left untouched.
pub async fn load_into_store(
    store: &AppStore,
    client: &RequestClient,
    path: &str,
    key: &str,
) -> Result<Value, RequestFailure> {
    match track_request(store, client.get::<Value>(path)).await {
        Ok(payload) => {
            store.set_data(key, payload.clone());
            Ok(payload)
        }
        Err(failure) => {
            logging::warn!("remote load `{path}` failed: {failure}");
            Err(failure)
        }
    }
}
