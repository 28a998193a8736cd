//! Boot hydration and the single-writer persistence queue.

use std::rc::Weak;

use futures::{channel::mpsc, StreamExt};
use leptos::logging;
use platform_host::{StorageAdapter, StorageRead};
use serde_json::Value;

use crate::{model::PersistedSnapshot, store::StoreInner};

/// Loads and validates the persisted snapshot stored under `key`.
///
/// Missing, unreadable, and malformed snapshots all yield `None`; the latter two are logged.
pub async fn load_snapshot(storage: &StorageAdapter, key: &str) -> Option<PersistedSnapshot> {
    match storage.read::<Value>(key).await {
        StorageRead::Found(value) => match PersistedSnapshot::from_value(value) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                logging::warn!("discarding persisted app state `{key}`: {err}");
                None
            }
        },
        StorageRead::Missing => None,
        StorageRead::Failed(err) => {
            logging::warn!("app state hydrate failed: {err}");
            None
        }
    }
}

/// Writes `snapshot` under `key`.
///
/// # Errors
///
/// Returns an error when serialization or the storage write fails.
pub async fn persist_snapshot(
    storage: &StorageAdapter,
    key: &str,
    snapshot: &PersistedSnapshot,
) -> Result<(), String> {
    storage.try_set(key, snapshot).await
}

/// Drives hydration and then serializes every snapshot write for one [`crate::AppStore`].
///
/// Returned alongside the store by [`crate::AppStore::new`]. Run it exactly once on the local
/// executor; it finishes when every store handle has been dropped and the queue is drained.
pub struct PersistenceWorker {
    inner: Weak<StoreInner>,
    storage: StorageAdapter,
    key: String,
    receiver: mpsc::UnboundedReceiver<PersistedSnapshot>,
}

impl PersistenceWorker {
    pub(crate) fn new(
        inner: Weak<StoreInner>,
        storage: StorageAdapter,
        key: String,
        receiver: mpsc::UnboundedReceiver<PersistedSnapshot>,
    ) -> Self {
        Self {
            inner,
            storage,
            key,
            receiver,
        }
    }

    /// Returns the storage key this worker reads and writes.
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Hydrates the store, then writes queued snapshots one at a time in commit order.
    ///
    /// When several snapshots are queued behind an in-flight write only the newest is written;
    /// older ones are already superseded.
    pub async fn run(mut self) {
        if !self.hydrate().await {
            return;
        }

        while let Some(mut snapshot) = self.receiver.next().await {
            while let Ok(Some(newer)) = self.receiver.try_next() {
                snapshot = newer;
            }
            if let Err(err) = persist_snapshot(&self.storage, &self.key, &snapshot).await {
                logging::warn!("persist app state snapshot failed: {err}");
            }
        }
    }

    async fn hydrate(&self) -> bool {
        match self.inner.upgrade() {
            Some(inner) => inner.begin_hydration(),
            None => return false,
        }

        let persisted = load_snapshot(&self.storage, &self.key).await;

        match self.inner.upgrade() {
            Some(inner) => {
                inner.complete_hydration(persisted);
                true
            }
            None => false,
        }
    }
}

impl Drop for PersistenceWorker {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.abandon_hydration();
        }
    }
}
