//! Window content factories and the rehydration resolver that rebuilds them after a reload.
//!
//! A persisted [`WindowRecord`] carries no live content. On boot each record is matched back to
//! the static app registry by walking [`REHYDRATION_MATCHERS`] in order: every matcher is tried
//! against the whole registry before the next, weaker matcher gets a turn. URL-backed records skip
//! the registry entirely since their content is fully described by the persisted `url`.

use std::{fmt, rc::Rc};

use leptos::logging;
use thiserror::Error;

use crate::{
    apps::AppDescriptor,
    model::{UnmatchedWindowPolicy, WindowRecord},
};

/// Sandbox flags applied to every embedded frame. Top-level navigation is not granted.
pub const EMBEDDED_FRAME_SANDBOX: &str = "allow-scripts allow-forms allow-same-origin allow-popups";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowContent {
    /// A built-in registry app.
    App { app_id: String },
    /// A sandboxed frame pointed at a remote app.
    EmbeddedFrame {
        url: String,
        title: String,
        sandbox: &'static str,
    },
    /// Remote metadata is still being fetched.
    Loading { url: String },
    /// Persisted window whose app no longer exists.
    Unavailable { title: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("app `{0}` is not available")]
    AppUnavailable(String),
    #[error("content failed: {0}")]
    Failed(String),
}

type ContentFn = dyn Fn() -> Result<WindowContent, ContentError>;

/// Zero-argument producer of a window's content. Never persisted.
#[derive(Clone)]
pub struct ContentFactory(Rc<ContentFn>);

impl ContentFactory {
    pub fn from_fn(f: impl Fn() -> Result<WindowContent, ContentError> + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn app(app_id: &str) -> Self {
        let app_id = app_id.to_string();
        Self::from_fn(move || {
            Ok(WindowContent::App {
                app_id: app_id.clone(),
            })
        })
    }

    pub fn embedded_frame(url: &str, title: &str) -> Self {
        let url = url.to_string();
        let title = title.to_string();
        Self::from_fn(move || {
            Ok(WindowContent::EmbeddedFrame {
                url: url.clone(),
                title: title.clone(),
                sandbox: EMBEDDED_FRAME_SANDBOX,
            })
        })
    }

    pub fn loading(url: &str) -> Self {
        let url = url.to_string();
        Self::from_fn(move || Ok(WindowContent::Loading { url: url.clone() }))
    }

    pub fn unavailable(title: &str) -> Self {
        let title = title.to_string();
        Self::from_fn(move || {
            Ok(WindowContent::Unavailable {
                title: title.clone(),
            })
        })
    }

    /// Runs the factory. Callers that need crash isolation go through
    /// [`crate::supervision::supervise`] instead.
    pub fn produce(&self) -> Result<WindowContent, ContentError> {
        (self.0)()
    }
}

impl fmt::Debug for ContentFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContentFactory(..)")
    }
}

impl PartialEq for ContentFactory {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Pure predicate deciding whether a persisted record belongs to a registry entry.
pub type RehydrationMatcher = fn(&WindowRecord, &AppDescriptor) -> bool;

/// Ordered fallback chain. Earlier entries win over later ones across the whole registry.
pub const REHYDRATION_MATCHERS: [(&str, RehydrationMatcher); 5] = [
    ("id", match_id),
    ("app", match_app),
    ("title", match_title),
    ("normalized-title", match_normalized_title),
    ("icon", match_icon),
];

fn match_id(record: &WindowRecord, entry: &AppDescriptor) -> bool {
    record.id.as_str() == entry.app_id
}

fn match_app(record: &WindowRecord, entry: &AppDescriptor) -> bool {
    record.app.as_deref() == Some(entry.app_id)
}

fn match_title(record: &WindowRecord, entry: &AppDescriptor) -> bool {
    record.title == entry.title
}

fn match_normalized_title(record: &WindowRecord, entry: &AppDescriptor) -> bool {
    normalize_title(&record.title) == normalize_title(entry.title)
}

fn match_icon(record: &WindowRecord, entry: &AppDescriptor) -> bool {
    !record.icon.is_empty() && record.icon == entry.icon
}

/// Strips all whitespace and lower-cases.
pub fn normalize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Finds the registry entry for `record`, returning the winning matcher's name alongside it.
pub fn resolve_registry_entry<'a>(
    record: &WindowRecord,
    registry: &'a [AppDescriptor],
) -> Option<(&'static str, &'a AppDescriptor)> {
    REHYDRATION_MATCHERS.iter().find_map(|(name, matcher)| {
        registry
            .iter()
            .find(|entry| matcher(record, entry))
            .map(|entry| (*name, entry))
    })
}

/// Rebuilds live content for one persisted record. `None` means the record is dropped.
pub fn rehydrate_window(
    mut record: WindowRecord,
    registry: &[AppDescriptor],
    policy: UnmatchedWindowPolicy,
) -> Option<WindowRecord> {
    record.load_token = None;

    if record.id.is_url_backed() {
        if let Some(url) = record.url.as_deref() {
            record.content = Some(ContentFactory::embedded_frame(url, &record.title));
            return Some(record);
        }
    } else if let Some((_, entry)) = resolve_registry_entry(&record, registry) {
        record.content = Some(entry.content_factory());
        return Some(record);
    }

    match policy {
        UnmatchedWindowPolicy::Placeholder => {
            logging::warn!(
                "no registry match for window `{}` ({}); showing placeholder",
                record.id,
                record.title
            );
            record.content = Some(ContentFactory::unavailable(&record.title));
            Some(record)
        }
        UnmatchedWindowPolicy::Drop => {
            logging::warn!(
                "no registry match for window `{}` ({}); dropping it",
                record.id,
                record.title
            );
            None
        }
    }
}

pub fn rehydrate_windows(
    records: Vec<WindowRecord>,
    registry: &[AppDescriptor],
    policy: UnmatchedWindowPolicy,
) -> Vec<WindowRecord> {
    records
        .into_iter()
        .filter_map(|record| rehydrate_window(record, registry, policy))
        .collect()
}
