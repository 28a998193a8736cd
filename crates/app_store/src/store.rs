//! The process-wide state container.
//!
//! [`AppStore`] is an explicitly constructed, cheaply cloned handle. Mutations commit
//! synchronously, notify subscribers in commit order, and hand the persisted subset to a single
//! [`PersistenceWorker`] queue so durable writes land in the same order the mutations committed.
//! Until hydration completes, persisted-subset mutations are buffered and replayed over the
//! loaded snapshot instead of being written.

use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

use futures::channel::{mpsc, oneshot};
use leptos::logging;
use platform_host::StorageAdapter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    model::{AppState, PersistedSnapshot, StorePhase, Theme, APP_STORAGE_KEY},
    persistence::PersistenceWorker,
    reducer::{reduce_app_state, StoreAction, StoreEffect},
};

type StateListener = Rc<dyn Fn(&AppState)>;

pub(crate) struct StoreInner {
    state: RefCell<AppState>,
    phase: Cell<StorePhase>,
    buffered: RefCell<Vec<StoreAction>>,
    listeners: RefCell<Vec<(u64, StateListener)>>,
    next_listener_id: Cell<u64>,
    tracked_requests: Cell<usize>,
    ready_waiters: RefCell<Vec<oneshot::Sender<()>>>,
    writes: mpsc::UnboundedSender<PersistedSnapshot>,
}

impl StoreInner {
    pub(crate) fn begin_hydration(&self) {
        self.phase.set(StorePhase::Hydrating);
    }

    /// Merges the loaded snapshot over defaults, replays buffered actions, and flips to `Ready`.
    pub(crate) fn complete_hydration(&self, persisted: Option<PersistedSnapshot>) {
        let buffered = std::mem::take(&mut *self.buffered.borrow_mut());
        let previous = self.state.borrow().clone();

        let mut next = AppState {
            is_loading: previous.is_loading,
            error: previous.error.clone(),
            ..AppState::default()
        };
        if let Some(snapshot) = persisted {
            next.apply_snapshot(snapshot);
        }
        let needs_flush = !buffered.is_empty();
        for action in buffered {
            reduce_app_state(&mut next, action);
        }

        *self.state.borrow_mut() = next.clone();
        self.phase.set(StorePhase::Ready);
        if needs_flush {
            self.enqueue_write(next.snapshot());
        }
        if next != previous {
            self.notify(&next);
        }
        self.release_waiters();
    }

    /// Flips to `Ready` without a snapshot when the worker goes away before hydrating.
    ///
    /// State stays in memory only; later writes hit the closed queue and are logged.
    pub(crate) fn abandon_hydration(&self) {
        if self.phase.get() == StorePhase::Ready {
            return;
        }
        logging::warn!("persistence worker dropped before hydration; app state is memory-only");
        self.buffered.borrow_mut().clear();
        self.phase.set(StorePhase::Ready);
        self.release_waiters();
    }

    fn release_waiters(&self) {
        let waiters = std::mem::take(&mut *self.ready_waiters.borrow_mut());
        for waiter in waiters {
            let _ = waiter.send(());
        }
    }

    fn enqueue_write(&self, snapshot: PersistedSnapshot) {
        if self.writes.unbounded_send(snapshot).is_err() {
            logging::warn!("app state write queue closed; snapshot not persisted");
        }
    }

    fn notify(&self, state: &AppState) {
        let listeners = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect::<Vec<_>>();
        for listener in listeners {
            listener(state);
        }
    }
}

#[derive(Clone)]
/// Handle to the shared application state container.
pub struct AppStore {
    inner: Rc<StoreInner>,
}

impl std::fmt::Debug for AppStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStore")
            .field("phase", &self.inner.phase.get())
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

impl AppStore {
    /// Creates a store persisted under [`APP_STORAGE_KEY`].
    ///
    /// The returned worker must be driven (for example with `spawn_local`) for hydration and
    /// persistence to happen.
    pub fn new(storage: StorageAdapter) -> (Self, PersistenceWorker) {
        Self::with_key(storage, APP_STORAGE_KEY)
    }

    /// Creates a store persisted under a custom storage key.
    pub fn with_key(storage: StorageAdapter, key: impl Into<String>) -> (Self, PersistenceWorker) {
        let (writes, receiver) = mpsc::unbounded();
        let inner = Rc::new(StoreInner {
            state: RefCell::new(AppState::default()),
            phase: Cell::new(StorePhase::Uninitialized),
            buffered: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            next_listener_id: Cell::new(0),
            tracked_requests: Cell::new(0),
            ready_waiters: RefCell::new(Vec::new()),
            writes,
        });
        let worker = PersistenceWorker::new(Rc::downgrade(&inner), storage, key.into(), receiver);
        (Self { inner }, worker)
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.inner.state.borrow().clone()
    }

    /// Returns the lifecycle phase.
    pub fn phase(&self) -> StorePhase {
        self.inner.phase.get()
    }

    /// Returns `true` once hydration has completed.
    pub fn is_ready(&self) -> bool {
        self.phase() == StorePhase::Ready
    }

    /// Resolves once hydration has completed, or once the [`PersistenceWorker`] is dropped
    /// without hydrating.
    pub async fn wait_until_ready(&self) {
        if self.is_ready() {
            return;
        }
        let (tx, rx) = oneshot::channel();
        self.inner.ready_waiters.borrow_mut().push(tx);
        let _ = rx.await;
    }

    /// Applies `action`, notifies subscribers, and schedules persistence when required.
    ///
    /// A mutation that leaves the state unchanged is not committed and notifies nobody.
    pub fn dispatch(&self, action: StoreAction) {
        let ready = self.is_ready();
        if !ready && action.touches_persisted() {
            self.inner.buffered.borrow_mut().push(action.clone());
        }

        let mut next = self.inner.state.borrow().clone();
        let effects = reduce_app_state(&mut next, action);
        if next == *self.inner.state.borrow() {
            return;
        }
        *self.inner.state.borrow_mut() = next.clone();

        // Queue before notifying so writes from nested dispatches land after this one.
        if ready && effects.contains(&StoreEffect::PersistSnapshot) {
            self.inner.enqueue_write(next.snapshot());
        }
        self.inner.notify(&next);
    }

    /// Sets the theme.
    pub fn set_theme(&self, theme: Theme) {
        self.dispatch(StoreAction::SetTheme(theme));
    }

    /// Sets the loading flag.
    pub fn set_is_loading(&self, is_loading: bool) {
        self.dispatch(StoreAction::SetIsLoading(is_loading));
    }

    /// Replaces the error slot.
    pub fn set_error(&self, error: impl Into<Option<String>>) {
        self.dispatch(StoreAction::SetError(error.into()));
    }

    pub(crate) fn begin_tracked_request(&self) {
        let tracked = &self.inner.tracked_requests;
        tracked.set(tracked.get() + 1);
        self.set_is_loading(true);
    }

    /// Clears the loading flag once no tracked request remains in flight.
    pub(crate) fn end_tracked_request(&self) {
        let tracked = &self.inner.tracked_requests;
        let remaining = tracked.get().saturating_sub(1);
        tracked.set(remaining);
        if remaining == 0 {
            self.set_is_loading(false);
        }
    }

    /// Clears the error slot.
    pub fn clear_error(&self) {
        self.dispatch(StoreAction::ClearError);
    }

    /// Inserts or replaces one data entry.
    pub fn set_data(&self, key: impl Into<String>, value: Value) {
        self.dispatch(StoreAction::SetData {
            key: key.into(),
            value,
        });
    }

    /// Serializes `value` and stores it as a data entry.
    ///
    /// # Errors
    ///
    /// Returns an error when `value` cannot be converted to JSON.
    pub fn set_data_typed<T: Serialize + ?Sized>(
        &self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<(), String> {
        let value = serde_json::to_value(value).map_err(|e| e.to_string())?;
        self.set_data(key, value);
        Ok(())
    }

    /// Returns a data entry.
    pub fn get_data(&self, key: &str) -> Option<Value> {
        self.inner.state.borrow().data.get(key).cloned()
    }

    /// Returns a data entry decoded as `T`; `None` when missing or mistyped.
    pub fn get_data_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_data(key)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// Removes every data entry.
    pub fn clear_data(&self) {
        self.dispatch(StoreAction::ClearData);
    }

    /// Registers a listener called synchronously with the new state after each committed
    /// mutation.
    pub fn subscribe(&self, listener: impl Fn(&AppState) + 'static) -> Subscription {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        Subscription {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }
}

#[must_use = "dropping a Subscription keeps the listener registered; call `unsubscribe` to remove it"]
/// Registration handle returned by [`AppStore::subscribe`].
pub struct Subscription {
    inner: Weak<StoreInner>,
    id: u64,
}

impl Subscription {
    /// Removes the listener. Later mutations no longer reach it.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .listeners
                .borrow_mut()
                .retain(|(id, _)| *id != self.id);
        }
    }
}
