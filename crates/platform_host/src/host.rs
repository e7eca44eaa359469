//! Host-bundle models for browser and stub runtime composition.

use std::rc::Rc;

use crate::{DurableStore, MemoryDurableStore, MemoryRemoteAppService, RemoteAppService};

/// Stable host strategy selected for the current build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Browser-backed composition (`localStorage`, `fetch`).
    Browser,
    /// In-memory composition used by tests and non-browser builds.
    Stub,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Stub => "stub",
        }
    }
}

/// Host service bundle injected into the desktop runtime.
///
/// Environment-specific selection happens before this bundle reaches `desktop_runtime`, so the
/// runtime never names a browser adapter type.
#[derive(Clone)]
pub struct HostServices {
    /// Durable key/value store mirroring the desktop session.
    pub durable: Rc<dyn DurableStore>,
    /// Remote app metadata and catalog service.
    pub remote_apps: Rc<dyn RemoteAppService>,
    /// Strategy identifier for diagnostics.
    pub host_strategy: HostStrategy,
}

impl HostServices {
    /// Builds an in-memory bundle. Returned stores can be inspected by keeping clones.
    pub fn in_memory(durable: MemoryDurableStore, remote_apps: MemoryRemoteAppService) -> Self {
        Self {
            durable: Rc::new(durable),
            remote_apps: Rc::new(remote_apps),
            host_strategy: HostStrategy::Stub,
        }
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices")
            .field("host_strategy", &self.host_strategy)
            .finish_non_exhaustive()
    }
}
