//! Window manager and session state for the browser desktop shell.
//!
//! [`reducer::reduce_desktop`] is the single mutation path for desktop state. The Leptos layer in
//! [`components`] renders that state, routes pointer interactions through
//! [`interaction::InteractionController`], and hands reducer effects to the host adapters.

pub mod apps;
pub mod components;
pub mod content;
mod effect_executor;
pub mod event_bridge;
pub mod host;
pub mod interaction;
pub mod model;
pub mod notifications;
pub mod persistence;
pub mod reducer;
mod runtime_context;
pub mod supervision;
pub mod window_manager;

pub use components::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext, DesktopShell};
pub use content::{ContentFactory, WindowContent};
pub use event_bridge::{BridgeSignal, EventBridge};
pub use model::*;
pub use notifications::{Notification, NotificationCenter, NotificationLevel};
pub use persistence::{load_boot_snapshot, PersistenceError};
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
