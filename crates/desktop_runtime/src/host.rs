//! Host-side runtime helpers for executing reducer effects and querying browser environment state.
//!
//! The reducer stays pure; every durable write, remote fetch and viewport query goes through
//! [`DesktopHostContext`], which wraps the injected [`HostServices`] bundle.

mod boot;
mod host_ui;
mod persistence_effects;
mod remote_content;

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

use leptos::{spawn_local, Callback};
use platform_host::{DurableStore, HostServices, HostStrategy, RemoteAppService};

use crate::{
    model::{DesktopPreferences, WindowRect},
    persistence::PersistDeduper,
    reducer::{DesktopAction, RuntimeEffect},
    runtime_context::DesktopRuntimeContext,
};

/// Host I/O left over after an effect's synchronous part has run.
pub(crate) type HostTask = Pin<Box<dyn Future<Output = ()>>>;

#[derive(Clone)]
/// Host service bundle for desktop runtime side effects.
pub struct DesktopHostContext {
    durable: Rc<dyn DurableStore>,
    remote_apps: Rc<dyn RemoteAppService>,
    host_strategy: HostStrategy,
    deduper: Rc<RefCell<PersistDeduper>>,
}

impl DesktopHostContext {
    /// Wraps an injected host bundle.
    pub fn new(services: HostServices) -> Self {
        Self {
            durable: services.durable,
            remote_apps: services.remote_apps,
            host_strategy: services.host_strategy,
            deduper: Rc::new(RefCell::new(PersistDeduper::default())),
        }
    }

    /// Returns the configured durable key/value store.
    pub fn durable_store(&self) -> Rc<dyn DurableStore> {
        self.durable.clone()
    }

    /// Returns the configured remote app metadata service.
    pub fn remote_app_service(&self) -> Rc<dyn RemoteAppService> {
        self.remote_apps.clone()
    }

    /// Returns the stable name of the selected host strategy.
    pub fn host_strategy_name(&self) -> &'static str {
        self.host_strategy.as_str()
    }

    /// Installs boot hydration for the desktop provider.
    ///
    /// Loads (or, with restore-on-boot disabled, skips) the persisted session, dispatches
    /// [`DesktopAction::HydrateSnapshot`], then [`DesktopAction::BootHydrationComplete`] to open the
    /// persistence gate.
    pub fn install_boot_hydration(
        &self,
        dispatch: Callback<DesktopAction>,
        preferences: DesktopPreferences,
    ) {
        boot::install_boot_hydration(self.clone(), dispatch, preferences);
    }

    pub(crate) fn boot_hydration_task(
        &self,
        dispatch: Callback<DesktopAction>,
        preferences: DesktopPreferences,
    ) -> HostTask {
        Box::pin(boot::hydrate(self.clone(), dispatch, preferences))
    }

    /// Executes a single [`RuntimeEffect`] emitted by the reducer.
    pub fn run_runtime_effect(&self, runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
        if let Some(task) = self.effect_task(runtime, effect) {
            spawn_local(task);
        }
    }

    /// Runs the synchronous part of `effect` (persistence gating, write dedupe, toasts) and
    /// returns the I/O still to be awaited.
    pub(crate) fn effect_task(
        &self,
        runtime: DesktopRuntimeContext,
        effect: RuntimeEffect,
    ) -> Option<HostTask> {
        match effect {
            RuntimeEffect::PersistWindows => {
                persistence_effects::persist_windows(self.clone(), runtime)
            }
            RuntimeEffect::PersistWidgets => {
                persistence_effects::persist_widgets(self.clone(), runtime)
            }
            RuntimeEffect::ClearPersistedSession => {
                Some(persistence_effects::clear_session(self.clone()))
            }
            RuntimeEffect::LoadRemoteContent {
                window_id,
                load_token,
                url,
            } => Some(remote_content::load(
                self.clone(),
                runtime,
                window_id,
                load_token,
                url,
            )),
            RuntimeEffect::Notify { level, title, body } => {
                host_ui::notify(runtime, level, title, body);
                None
            }
        }
    }

    /// Returns the current desktop viewport rect available to the window manager.
    pub fn desktop_viewport_rect(&self, taskbar_height_px: i32) -> WindowRect {
        host_ui::desktop_viewport_rect(taskbar_height_px)
    }

    pub(crate) fn deduper(&self) -> Rc<RefCell<PersistDeduper>> {
        self.deduper.clone()
    }
}

impl std::fmt::Debug for DesktopHostContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopHostContext")
            .field("host_strategy", &self.host_strategy)
            .finish_non_exhaustive()
    }
}
