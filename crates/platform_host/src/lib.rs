//! Typed host-domain contracts shared by the desktop runtime and its browser adapters.
//!
//! This crate is the API-first boundary for platform services: durable key/value storage, remote
//! app metadata, time helpers, and the injected host bundle. Concrete browser adapters live in
//! `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod host;
pub mod remote_app;
pub mod storage;
pub mod time;

pub use host::{HostServices, HostStrategy};
pub use remote_app::{
    manifest_url_for, MemoryRemoteAppService, NoopRemoteAppService, RemoteAppEntry,
    RemoteAppFuture, RemoteAppMetadata, RemoteAppService, REMOTE_APP_CATALOG_URL,
};
pub use storage::durable::{
    DurableStore, DurableStoreFuture, MemoryDurableStore, NoopDurableStore,
};
pub use time::{next_unique_timestamp_ms, unix_time_ms_now};
