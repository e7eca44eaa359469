//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! The desktop session is mirrored into `localStorage`, and remote app metadata is fetched from
//! the manifest published next to each app URL. Non-wasm builds compile the same types with inert
//! bodies so the workspace tests run natively.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
pub mod remote_app;
pub mod storage;

pub use adapters::{
    build_host_services, durable_store, host_strategy_name, remote_app_service,
    selected_host_strategy, DurableStoreAdapter, RemoteAppServiceAdapter,
};
pub use remote_app::{metadata_from_manifest, WebAppManifest, WebRemoteAppService};
pub use storage::local_store::WebDurableStore;
