//! Remote (URL-hosted) app metadata contracts.
//!
//! Installed web apps are described entirely by data: a URL plus optional presentation metadata
//! published next to it. Hosts fetch that metadata before a URL-backed window settles on its final
//! title and icon.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use serde::{Deserialize, Serialize};

/// Default catalog location served alongside the site.
pub const REMOTE_APP_CATALOG_URL: &str = "/registry.json";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Presentation metadata published by a remote app.
pub struct RemoteAppMetadata {
    /// Display name, when the app publishes one.
    #[serde(default)]
    pub name: Option<String>,
    /// Icon glyph or URL, when the app publishes one.
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One installable entry in a remote app catalog.
pub struct RemoteAppEntry {
    /// Stable catalog id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Icon glyph or URL.
    #[serde(default)]
    pub icon: Option<String>,
    /// Launch URL.
    pub url: String,
    /// Short description shown in catalogs.
    #[serde(default)]
    pub description: String,
}

/// Object-safe boxed future used by [`RemoteAppService`] async methods.
pub type RemoteAppFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service that fetches remote app metadata and catalogs.
pub trait RemoteAppService {
    /// Fetches metadata for the app hosted at `url`. `Ok(None)` means the app publishes none.
    fn fetch_metadata<'a>(
        &'a self,
        url: &'a str,
    ) -> RemoteAppFuture<'a, Result<Option<RemoteAppMetadata>, String>>;

    /// Fetches the installable app catalog at `catalog_url`.
    fn fetch_catalog<'a>(
        &'a self,
        catalog_url: &'a str,
    ) -> RemoteAppFuture<'a, Result<Vec<RemoteAppEntry>, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Service that never finds metadata and serves an empty catalog.
pub struct NoopRemoteAppService;

impl RemoteAppService for NoopRemoteAppService {
    fn fetch_metadata<'a>(
        &'a self,
        _url: &'a str,
    ) -> RemoteAppFuture<'a, Result<Option<RemoteAppMetadata>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn fetch_catalog<'a>(
        &'a self,
        _catalog_url: &'a str,
    ) -> RemoteAppFuture<'a, Result<Vec<RemoteAppEntry>, String>> {
        Box::pin(async { Ok(Vec::new()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory service keyed by URL.
pub struct MemoryRemoteAppService {
    metadata: Rc<RefCell<HashMap<String, RemoteAppMetadata>>>,
    failures: Rc<RefCell<HashMap<String, String>>>,
    catalog: Rc<RefCell<Vec<RemoteAppEntry>>>,
}

impl MemoryRemoteAppService {
    /// Registers metadata returned for `url`.
    pub fn insert_metadata(&self, url: impl Into<String>, metadata: RemoteAppMetadata) {
        self.metadata.borrow_mut().insert(url.into(), metadata);
    }

    /// Makes metadata fetches for `url` fail with `error`.
    pub fn fail_metadata(&self, url: impl Into<String>, error: impl Into<String>) {
        self.failures.borrow_mut().insert(url.into(), error.into());
    }

    /// Replaces the served catalog.
    pub fn set_catalog(&self, entries: Vec<RemoteAppEntry>) {
        *self.catalog.borrow_mut() = entries;
    }
}

impl RemoteAppService for MemoryRemoteAppService {
    fn fetch_metadata<'a>(
        &'a self,
        url: &'a str,
    ) -> RemoteAppFuture<'a, Result<Option<RemoteAppMetadata>, String>> {
        Box::pin(async move {
            if let Some(error) = self.failures.borrow().get(url) {
                return Err(error.clone());
            }
            Ok(self.metadata.borrow().get(url).cloned())
        })
    }

    fn fetch_catalog<'a>(
        &'a self,
        _catalog_url: &'a str,
    ) -> RemoteAppFuture<'a, Result<Vec<RemoteAppEntry>, String>> {
        Box::pin(async move { Ok(self.catalog.borrow().clone()) })
    }
}

/// Returns the web app manifest location conventionally published next to `url`.
pub fn manifest_url_for(url: &str) -> String {
    let base = url.split(['?', '#']).next().unwrap_or(url);
    format!("{}/manifest.json", base.trim_end_matches('/'))
}
