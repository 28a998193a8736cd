//! Leptos context wiring for the shared [`AppStore`].

use futures::task::{LocalSpawn, LocalSpawnExt, SpawnError};
use leptos::{provide_context, use_context};
use platform_host::StorageAdapter;

#[cfg(target_arch = "wasm32")]
use crate::persistence::PersistenceWorker;
use crate::store::AppStore;

/// Makes `store` available to descendants through Leptos context.
pub fn provide_app_store(store: AppStore) {
    provide_context(store);
}

/// Returns the provided [`AppStore`], if any.
pub fn try_use_app_store() -> Option<AppStore> {
    use_context::<AppStore>()
}

/// Returns the provided [`AppStore`].
///
/// # Panics
///
/// Panics if no store was provided by an ancestor.
pub fn use_app_store() -> AppStore {
    use_context::<AppStore>().expect("AppStore not provided")
}

/// Runs the persistence worker on the browser task queue.
///
/// Browser-only: off `wasm32` Leptos falls back to blocking on the future, and the worker does
/// not finish while the store is alive. Native hosts use [`install_app_store_with`].
#[cfg(target_arch = "wasm32")]
pub fn spawn_persistence_worker(worker: PersistenceWorker) {
    leptos::spawn_local(worker.run());
}

/// Creates the store, provides it as context, and starts hydration on the browser task queue.
#[cfg(target_arch = "wasm32")]
pub fn install_app_store(storage: StorageAdapter) -> AppStore {
    let (store, worker) = AppStore::new(storage);
    provide_app_store(store.clone());
    spawn_persistence_worker(worker);
    store
}

/// Creates the store, provides it as context, and spawns its worker on `spawner`.
///
/// # Errors
///
/// Returns the executor's [`SpawnError`] when it has shut down; no context is provided then.
pub fn install_app_store_with<S>(
    storage: StorageAdapter,
    spawner: &S,
) -> Result<AppStore, SpawnError>
where
    S: LocalSpawn + ?Sized,
{
    let (store, worker) = AppStore::new(storage);
    spawner.spawn_local(worker.run())?;
    provide_app_store(store.clone());
    Ok(store)
}

#[cfg(test)]
mod tests {
    use futures::executor::LocalPool;
    use platform_host::{MemoryKeyValueStore, NoopKeyValueStore};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{StorePhase, Theme, APP_STORAGE_KEY};

    #[test]
    fn provided_store_is_shared_with_consumers() {
        let runtime = leptos::create_runtime();
        assert!(try_use_app_store().is_none());

        let (store, _worker) = AppStore::new(StorageAdapter::from_store(NoopKeyValueStore));
        provide_app_store(store.clone());

        use_app_store().set_theme(Theme::Dark);
        assert_eq!(store.state().theme, Theme::Dark);

        runtime.dispose();
    }

    #[test]
    fn install_returns_immediately_and_hydrates_on_the_spawner() {
        let runtime = leptos::create_runtime();
        let memory =
            MemoryKeyValueStore::with_entries([(APP_STORAGE_KEY, r#"{"theme":"light"}"#)]);
        let mut pool = LocalPool::new();

        let storage = StorageAdapter::from_store(memory.clone());
        let store = install_app_store_with(storage, &pool.spawner()).expect("install store");
        assert_eq!(store.phase(), StorePhase::Uninitialized);

        pool.run_until_stalled();
        let provided = use_app_store();
        assert!(provided.is_ready());
        assert_eq!(provided.state().theme, Theme::Light);

        provided.set_theme(Theme::Dark);
        pool.run_until_stalled();
        assert!(memory
            .raw(APP_STORAGE_KEY)
            .expect("snapshot written")
            .contains("\"dark\""));

        runtime.dispose();
    }

    #[test]
    fn failed_spawn_provides_nothing() {
        let runtime = leptos::create_runtime();
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        drop(pool);

        let storage = StorageAdapter::from_store(NoopKeyValueStore);
        let result = install_app_store_with(storage, &spawner);
        assert!(result.is_err());
        assert!(try_use_app_store().is_none());

        runtime.dispose();
    }
}
