//! Controllable storage doubles for persistence ordering tests.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

use futures::channel::oneshot;
use platform_host::{KeyValueFuture, KeyValueStore, MemoryKeyValueStore};
use serde_json::Value;

use crate::model::APP_STORAGE_KEY;

/// Memory-backed store whose reads and writes block until the test releases them.
#[derive(Clone, Default)]
pub(crate) struct GatedKeyValueStore {
    memory: MemoryKeyValueStore,
    read_gates: Rc<RefCell<VecDeque<oneshot::Sender<()>>>>,
    write_gates: Rc<RefCell<VecDeque<oneshot::Sender<()>>>>,
    issued_writes: Rc<RefCell<Vec<String>>>,
    auto_reads: Rc<Cell<bool>>,
}

impl GatedKeyValueStore {
    pub(crate) fn with_snapshot(snapshot: Value) -> Self {
        Self {
            memory: MemoryKeyValueStore::with_entries([(APP_STORAGE_KEY, snapshot.to_string())]),
            ..Self::default()
        }
    }

    pub(crate) fn auto_release_reads(&self) {
        self.auto_reads.set(true);
    }

    pub(crate) fn release_next_read(&self) -> bool {
        Self::release(&self.read_gates)
    }

    pub(crate) fn release_next_write(&self) -> bool {
        Self::release(&self.write_gates)
    }

    pub(crate) fn pending_writes(&self) -> usize {
        self.write_gates.borrow().len()
    }

    pub(crate) fn issued_writes(&self) -> Vec<String> {
        self.issued_writes.borrow().clone()
    }

    pub(crate) fn memory(&self) -> &MemoryKeyValueStore {
        &self.memory
    }

    fn release(gates: &RefCell<VecDeque<oneshot::Sender<()>>>) -> bool {
        let gate = gates.borrow_mut().pop_front();
        gate.map(|gate| gate.send(()).is_ok()).unwrap_or(false)
    }

    fn gate(gates: &RefCell<VecDeque<oneshot::Sender<()>>>) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        gates.borrow_mut().push_back(tx);
        rx
    }
}

impl KeyValueStore for GatedKeyValueStore {
    fn get_item<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move {
            if !self.auto_reads.get() {
                let _ = Self::gate(&self.read_gates).await;
            }
            self.memory.get_item(key).await
        })
    }

    fn set_item<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
    ) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.issued_writes.borrow_mut().push(value.to_string());
            let _ = Self::gate(&self.write_gates).await;
            self.memory.set_item(key, value).await
        })
    }

    fn remove_item<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<(), String>> {
        self.memory.remove_item(key)
    }

    fn clear<'a>(&'a self) -> KeyValueFuture<'a, Result<(), String>> {
        self.memory.clear()
    }
}

/// Store whose reads always fail while writes succeed silently.
pub(crate) struct FailingReadStore;

impl KeyValueStore for FailingReadStore {
    fn get_item<'a>(
        &'a self,
        _key: &'a str,
    ) -> KeyValueFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Err("storage offline".to_string()) })
    }

    fn set_item<'a>(
        &'a self,
        _key: &'a str,
        _value: &'a str,
    ) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn remove_item<'a>(&'a self, _key: &'a str) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn clear<'a>(&'a self) -> KeyValueFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}
