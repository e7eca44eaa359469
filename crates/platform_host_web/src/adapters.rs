use std::rc::Rc;

use platform_host::{
    DurableStore, DurableStoreFuture, HostServices, HostStrategy, NoopDurableStore,
    NoopRemoteAppService, RemoteAppEntry, RemoteAppFuture, RemoteAppMetadata, RemoteAppService,
};

use crate::{WebDurableStore, WebRemoteAppService};

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "host-stub")]
    {
        HostStrategy::Stub
    }

    #[cfg(not(feature = "host-stub"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    selected_host_strategy().as_str()
}

/// Adapter enum that erases the concrete durable backend behind [`DurableStore`].
#[derive(Debug, Clone, Copy)]
pub enum DurableStoreAdapter {
    /// Browser `localStorage` persistence.
    Browser(WebDurableStore),
    /// No-op fallback used by stub builds.
    Stub(NoopDurableStore),
}

impl DurableStore for DurableStoreAdapter {
    fn load_raw<'a>(
        &'a self,
        key: &'a str,
    ) -> DurableStoreFuture<'a, Result<Option<String>, String>> {
        match self {
            Self::Browser(store) => store.load_raw(key),
            Self::Stub(store) => store.load_raw(key),
        }
    }

    fn save_raw<'a>(
        &'a self,
        key: &'a str,
        raw: &'a str,
    ) -> DurableStoreFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(store) => store.save_raw(key, raw),
            Self::Stub(store) => store.save_raw(key, raw),
        }
    }

    fn delete_raw<'a>(&'a self, key: &'a str) -> DurableStoreFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(store) => store.delete_raw(key),
            Self::Stub(store) => store.delete_raw(key),
        }
    }
}

/// Adapter enum that erases the concrete metadata backend behind [`RemoteAppService`].
#[derive(Debug, Clone, Copy)]
pub enum RemoteAppServiceAdapter {
    /// `fetch`-backed manifest and catalog lookups.
    Browser(WebRemoteAppService),
    /// No-op fallback used by stub builds.
    Stub(NoopRemoteAppService),
}

impl RemoteAppService for RemoteAppServiceAdapter {
    fn fetch_metadata<'a>(
        &'a self,
        url: &'a str,
    ) -> RemoteAppFuture<'a, Result<Option<RemoteAppMetadata>, String>> {
        match self {
            Self::Browser(service) => service.fetch_metadata(url),
            Self::Stub(service) => service.fetch_metadata(url),
        }
    }

    fn fetch_catalog<'a>(
        &'a self,
        catalog_url: &'a str,
    ) -> RemoteAppFuture<'a, Result<Vec<RemoteAppEntry>, String>> {
        match self {
            Self::Browser(service) => service.fetch_catalog(catalog_url),
            Self::Stub(service) => service.fetch_catalog(catalog_url),
        }
    }
}

/// Builds the durable store adapter for the compile-time selected host strategy.
pub fn durable_store() -> DurableStoreAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => DurableStoreAdapter::Browser(WebDurableStore),
        HostStrategy::Stub => DurableStoreAdapter::Stub(NoopDurableStore),
    }
}

/// Builds the remote app adapter for the compile-time selected host strategy.
pub fn remote_app_service() -> RemoteAppServiceAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => RemoteAppServiceAdapter::Browser(WebRemoteAppService),
        HostStrategy::Stub => RemoteAppServiceAdapter::Stub(NoopRemoteAppService),
    }
}

/// Builds the host service bundle injected into the desktop runtime.
pub fn build_host_services() -> HostServices {
    HostServices {
        durable: Rc::new(durable_store()),
        remote_apps: Rc::new(remote_app_service()),
        host_strategy: selected_host_strategy(),
    }
}
