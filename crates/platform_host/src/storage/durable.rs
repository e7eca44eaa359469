//! String-keyed durable storage contracts and adapters.
//!
//! The desktop session layout is mirrored into a flat key/value store where every value is a JSON
//! document stored as text. Each write fully overwrites its key, so adapters never need partial
//! update semantics.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    future::Future,
    pin::Pin,
    rc::Rc,
};

/// Object-safe boxed future used by [`DurableStore`] async methods.
pub type DurableStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for durable raw-text values addressed by string keys.
pub trait DurableStore {
    /// Loads the raw text stored under `key`.
    fn load_raw<'a>(&'a self, key: &'a str)
        -> DurableStoreFuture<'a, Result<Option<String>, String>>;

    /// Overwrites the raw text stored under `key`.
    fn save_raw<'a>(
        &'a self,
        key: &'a str,
        raw: &'a str,
    ) -> DurableStoreFuture<'a, Result<(), String>>;

    /// Removes `key` from the store. Removing a missing key succeeds.
    fn delete_raw<'a>(&'a self, key: &'a str) -> DurableStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Store that remembers nothing. Used by the stub host strategy.
pub struct NoopDurableStore;

impl DurableStore for NoopDurableStore {
    fn load_raw<'a>(
        &'a self,
        _key: &'a str,
    ) -> DurableStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save_raw<'a>(
        &'a self,
        _key: &'a str,
        _raw: &'a str,
    ) -> DurableStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn delete_raw<'a>(&'a self, _key: &'a str) -> DurableStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory durable store. Clones share the same backing map.
pub struct MemoryDurableStore {
    inner: Rc<RefCell<BTreeMap<String, String>>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryDurableStore {
    /// Creates a store pre-seeded with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::default();
        store.inner.borrow_mut().extend(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        store
    }

    /// Returns the raw value stored under `key` without going through the async contract.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    /// Returns the stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().keys().cloned().collect()
    }

    /// Number of successful `save_raw` calls since creation.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl DurableStore for MemoryDurableStore {
    fn load_raw<'a>(
        &'a self,
        key: &'a str,
    ) -> DurableStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.raw(key)) })
    }

    fn save_raw<'a>(
        &'a self,
        key: &'a str,
        raw: &'a str,
    ) -> DurableStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(key.to_string(), raw.to_string());
            self.writes.set(self.writes.get() + 1);
            Ok(())
        })
    }

    fn delete_raw<'a>(&'a self, key: &'a str) -> DurableStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }
}
