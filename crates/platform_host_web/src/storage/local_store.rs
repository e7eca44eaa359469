//! `localStorage`-backed durable store implementation.
//!
//! The browser API is synchronous; the [`DurableStore`] futures resolve immediately.

use platform_host::{DurableStore, DurableStoreFuture};

#[derive(Debug, Clone, Copy, Default)]
/// Durable store backed by `window.localStorage`.
pub struct WebDurableStore;

impl WebDurableStore {
    /// Reads the raw text stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the read throws.
    pub fn read(self, key: &str) -> Result<Option<String>, String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .get_item(key)
                .map_err(|e| format!("localStorage get_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(None)
        }
    }

    /// Overwrites the raw text stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the write fails (quota exceeded).
    pub fn write(self, key: &str, raw: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .set_item(key, raw)
                .map_err(|e| format!("localStorage set_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, raw);
            Ok(())
        }
    }

    /// Removes `key` from localStorage.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the delete fails.
    pub fn remove(self, key: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .remove_item(key)
                .map_err(|e| format!("localStorage remove_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, String> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| "localStorage unavailable".to_string())
}

impl DurableStore for WebDurableStore {
    fn load_raw<'a>(
        &'a self,
        key: &'a str,
    ) -> DurableStoreFuture<'a, Result<Option<String>, String>> {
        let store = *self;
        Box::pin(async move { store.read(key) })
    }

    fn save_raw<'a>(
        &'a self,
        key: &'a str,
        raw: &'a str,
    ) -> DurableStoreFuture<'a, Result<(), String>> {
        let store = *self;
        Box::pin(async move { store.write(key, raw) })
    }

    fn delete_raw<'a>(&'a self, key: &'a str) -> DurableStoreFuture<'a, Result<(), String>> {
        let store = *self;
        Box::pin(async move { store.remove(key) })
    }
}
