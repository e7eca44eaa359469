//! Durable mirror of the desktop session: encoding, tolerant decoding, and boot loading.
//!
//! Two keys are written, each holding a JSON array that fully overwrites the previous value:
//! [`WINDOWS_KEY`] for window records and [`WIDGETS_KEY`] for widget records. Nothing read from
//! storage is trusted: malformed records are skipped, and an unusable window collection falls back
//! to the bootstrap window.

use std::collections::BTreeMap;

use leptos::logging;
use platform_host::DurableStore;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    apps::{bootstrap_window, AppDescriptor},
    content::rehydrate_windows,
    model::{DesktopSnapshot, UnmatchedWindowPolicy, WidgetRecord, WindowRecord},
};

/// Durable key holding the serialized window collection.
pub const WINDOWS_KEY: &str = "windows";
/// Durable key holding the serialized widget collection.
pub const WIDGETS_KEY: &str = "widgets";

#[derive(Debug, Error)]
/// Failures while writing the session mirror.
pub enum PersistenceError {
    /// A collection could not be serialized.
    #[error("encode {key} failed: {source}")]
    Encode {
        /// Durable key being written.
        key: &'static str,
        /// Serializer error.
        #[source]
        source: serde_json::Error,
    },
    /// The durable store rejected the operation.
    #[error("durable store {op} `{key}` failed: {message}")]
    Store {
        /// Operation name.
        op: &'static str,
        /// Durable key involved.
        key: &'static str,
        /// Store-provided description.
        message: String,
    },
}

/// Serializes window records in the durable layout. Live-only fields are omitted.
pub fn encode_windows(windows: &[WindowRecord]) -> Result<String, PersistenceError> {
    serde_json::to_string(windows).map_err(|source| PersistenceError::Encode {
        key: WINDOWS_KEY,
        source,
    })
}

pub fn encode_widgets(widgets: &[WidgetRecord]) -> Result<String, PersistenceError> {
    serde_json::to_string(widgets).map_err(|source| PersistenceError::Encode {
        key: WIDGETS_KEY,
        source,
    })
}

enum Decoded<T> {
    Missing,
    Unusable,
    Records { items: Vec<T>, total: usize },
}

fn decode_records<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Decoded<T> {
    let Some(raw) = raw else {
        return Decoded::Missing;
    };
    let value = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => value,
        Err(err) => {
            logging::warn!("durable `{key}` is not valid JSON: {err}");
            return Decoded::Unusable;
        }
    };
    let serde_json::Value::Array(entries) = value else {
        logging::warn!("durable `{key}` is not an array");
        return Decoded::Unusable;
    };

    let total = entries.len();
    let items = entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| match serde_json::from_value::<T>(entry) {
            Ok(record) => Some(record),
            Err(err) => {
                logging::warn!("skipping malformed `{key}` record #{idx}: {err}");
                None
            }
        })
        .collect();
    Decoded::Records { items, total }
}

/// Decodes the window collection.
///
/// Missing, unparseable, non-array, or entirely malformed input yields the single bootstrap
/// window. An empty array is a legitimately empty desktop.
pub fn decode_windows(raw: Option<&str>) -> Vec<WindowRecord> {
    match decode_records::<WindowRecord>(WINDOWS_KEY, raw) {
        Decoded::Records { items, total } if total == 0 || !items.is_empty() => items,
        Decoded::Records { .. } | Decoded::Missing | Decoded::Unusable => {
            vec![bootstrap_window().detached()]
        }
    }
}

/// Decodes the widget collection. Anything unusable yields no widgets.
pub fn decode_widgets(raw: Option<&str>) -> Vec<WidgetRecord> {
    match decode_records::<WidgetRecord>(WIDGETS_KEY, raw) {
        Decoded::Records { items, .. } => items,
        Decoded::Missing | Decoded::Unusable => Vec::new(),
    }
}

async fn load_key(store: &dyn DurableStore, key: &'static str) -> Option<String> {
    match store.load_raw(key).await {
        Ok(raw) => raw,
        Err(err) => {
            logging::warn!("durable store read `{key}` failed: {err}");
            None
        }
    }
}

/// Loads and rehydrates the persisted session. Never fails; storage problems degrade to defaults.
pub async fn load_boot_snapshot(
    store: &dyn DurableStore,
    registry: &[AppDescriptor],
    policy: UnmatchedWindowPolicy,
) -> DesktopSnapshot {
    let windows_raw = load_key(store, WINDOWS_KEY).await;
    let widgets_raw = load_key(store, WIDGETS_KEY).await;
    DesktopSnapshot {
        windows: rehydrate_windows(decode_windows(windows_raw.as_deref()), registry, policy),
        widgets: decode_widgets(widgets_raw.as_deref()),
    }
}

/// Snapshot used when restore-on-boot is disabled.
pub fn fresh_boot_snapshot() -> DesktopSnapshot {
    DesktopSnapshot {
        windows: vec![bootstrap_window()],
        widgets: Vec::new(),
    }
}

async fn save_key(
    store: &dyn DurableStore,
    key: &'static str,
    raw: &str,
) -> Result<(), PersistenceError> {
    store
        .save_raw(key, raw)
        .await
        .map_err(|message| PersistenceError::Store {
            op: "write",
            key,
            message,
        })
}

pub async fn persist_windows(
    store: &dyn DurableStore,
    windows: &[WindowRecord],
) -> Result<(), PersistenceError> {
    save_key(store, WINDOWS_KEY, &encode_windows(windows)?).await
}

pub async fn persist_widgets(
    store: &dyn DurableStore,
    widgets: &[WidgetRecord],
) -> Result<(), PersistenceError> {
    save_key(store, WIDGETS_KEY, &encode_widgets(widgets)?).await
}

/// Removes both session keys so the next boot starts from the bootstrap window.
pub async fn clear_session(store: &dyn DurableStore) -> Result<(), PersistenceError> {
    for key in [WINDOWS_KEY, WIDGETS_KEY] {
        store
            .delete_raw(key)
            .await
            .map_err(|message| PersistenceError::Store {
                op: "delete",
                key,
                message,
            })?;
    }
    Ok(())
}

/// Suppresses writes whose encoded payload matches the last one written for the same key.
#[derive(Debug, Clone, Default)]
pub struct PersistDeduper {
    last_written: BTreeMap<&'static str, String>,
}

impl PersistDeduper {
    /// Returns `true` and remembers `raw` when it differs from the last admitted payload.
    pub fn admit(&mut self, key: &'static str, raw: &str) -> bool {
        if self.last_written.get(key).is_some_and(|last| last == raw) {
            return false;
        }
        self.last_written.insert(key, raw.to_string());
        true
    }

    /// Forgets every remembered payload, e.g. after the session was cleared.
    pub fn reset(&mut self) {
        self.last_written.clear();
    }
}
