//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived reducer container, runtime effect queue, event bridge, drag
//! controller, supervision ledger, and host bootstrap wiring. UI composition stays in
//! [`crate::components`].
#![allow(clippy::clone_on_copy)]

use leptos::*;
use platform_host::HostServices;

use crate::{
    effect_executor,
    event_bridge::{bridge_action, BridgeSignal, EventBridge},
    host::DesktopHostContext,
    interaction::InteractionController,
    model::{DesktopPreferences, DesktopState},
    notifications::{NotificationCenter, NotificationLevel},
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect},
    supervision::SupervisionLedger,
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop runtime state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Host service bundle for executing runtime side effects and environment queries.
    pub host: StoredValue<DesktopHostContext>,
    /// Reactive desktop state signal.
    pub state: RwSignal<DesktopState>,
    /// Queue of runtime effects emitted by the reducer and processed by the executor.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Signal channel shared with launchers and embedded apps.
    pub bridge: StoredValue<EventBridge>,
    /// Single-slot drag/resize controller.
    pub interactions: StoredValue<InteractionController>,
    /// Crash records for window content.
    pub supervision: StoredValue<SupervisionLedger>,
    /// Toasts shown above the taskbar.
    pub notifications: RwSignal<NotificationCenter>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }

    /// Publishes a signal on the event bridge and returns how many listeners received it.
    pub fn publish(&self, signal: BridgeSignal) -> usize {
        self.bridge.with_value(|bridge| bridge.publish(&signal))
    }
}

/// Routes bridge signals into the reducer for as long as the current owner lives.
fn wire_bridge(runtime: DesktopRuntimeContext) {
    let subscription = runtime.bridge.with_value(|bridge| {
        bridge.subscribe(move |signal| {
            if let Some(action) = bridge_action(signal) {
                runtime.dispatch_action(action);
            }
        })
    });
    on_cleanup(move || subscription.unsubscribe());
}

fn install_runtime_orchestration(runtime: DesktopRuntimeContext, preferences: DesktopPreferences) {
    runtime
        .host
        .get_value()
        .install_boot_hydration(runtime.dispatch, preferences);
    wire_bridge(runtime);
    effect_executor::install(runtime);
}

/// Assembles the runtime context without installing boot hydration or the effect executor.
pub(crate) fn build_runtime(
    host_services: HostServices,
    preferences: DesktopPreferences,
) -> DesktopRuntimeContext {
    let host = store_value(DesktopHostContext::new(host_services));
    let state = create_rw_signal(DesktopState::with_preferences(preferences));
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());
    let bridge = store_value(EventBridge::new());
    let interactions = store_value(InteractionController::new());
    let supervision = store_value(SupervisionLedger::default());
    let notifications = create_rw_signal(NotificationCenter::default());

    let dispatch = Callback::new(move |action: DesktopAction| {
        let mut desktop = state.get_untracked();
        let previous = desktop.clone();

        let new_effects = match reduce_desktop(&mut desktop, action) {
            Ok(new_effects) => {
                if desktop.windows != previous.windows {
                    supervision.update_value(|ledger| ledger.sync_windows(&desktop.windows));
                }
                if desktop != previous {
                    state.set(desktop);
                }
                new_effects
            }
            Err(err) => {
                logging::warn!("desktop reducer error: {err}");
                vec![RuntimeEffect::Notify {
                    level: NotificationLevel::Warning,
                    title: "Desktop".to_string(),
                    body: err.to_string(),
                }]
            }
        };
        if !new_effects.is_empty() {
            let mut queue = effects.get_untracked();
            queue.extend(new_effects);
            effects.set(queue);
        }
    });

    DesktopRuntimeContext {
        host,
        state,
        effects,
        bridge,
        interactions,
        supervision,
        notifications,
        dispatch,
    }
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components and boots persisted state.
pub fn DesktopProvider(
    /// Injected browser or stub host bundle assembled by the entry layer.
    host_services: HostServices,
    /// Runtime configuration; defaults restore the saved layout and clamp drags.
    #[prop(optional)]
    preferences: Option<DesktopPreferences>,
    children: Children,
) -> impl IntoView {
    let preferences = preferences.unwrap_or_default();
    let runtime = build_runtime(host_services, preferences);

    provide_context(runtime.clone());

    install_runtime_orchestration(runtime, preferences);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{MemoryDurableStore, MemoryRemoteAppService, RemoteAppMetadata};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        content::WindowContent,
        model::{DesktopSnapshot, PointerDelta, UrlWindowSpec, WindowId},
        persistence::WINDOWS_KEY,
    };

    struct Harness {
        owner: RuntimeId,
        runtime: DesktopRuntimeContext,
        store: MemoryDurableStore,
        remote: MemoryRemoteAppService,
    }

    impl Harness {
        fn new() -> Self {
            let owner = create_runtime();
            let store = MemoryDurableStore::default();
            let remote = MemoryRemoteAppService::default();
            let runtime = build_runtime(
                HostServices::in_memory(store.clone(), remote.clone()),
                DesktopPreferences::default(),
            );
            Self {
                owner,
                runtime,
                store,
                remote,
            }
        }

        fn dispatch(&self, action: DesktopAction) {
            self.runtime.dispatch_action(action);
            self.drain();
        }

        /// Runs queued effects in order, awaiting each host task before the next.
        fn drain(&self) {
            loop {
                let queued = self.runtime.effects.get_untracked();
                if queued.is_empty() {
                    break;
                }
                self.runtime.effects.set(Vec::new());
                for effect in queued {
                    let task = self.runtime.host.get_value().effect_task(self.runtime, effect);
                    if let Some(task) = task {
                        block_on(task);
                    }
                }
            }
        }

        fn boot(&self) {
            let task = self
                .runtime
                .host
                .get_value()
                .boot_hydration_task(self.runtime.dispatch, DesktopPreferences::default());
            block_on(task);
            self.drain();
        }

        fn open(&self, app_id: &str) -> WindowId {
            self.dispatch(DesktopAction::OpenApp {
                app_id: app_id.to_string(),
            });
            self.runtime
                .state
                .with_untracked(|desktop| desktop.focused_window_id())
                .expect("focused window")
        }

        fn finish(self) {
            self.owner.dispose();
        }
    }

    fn chess_spec() -> UrlWindowSpec {
        UrlWindowSpec {
            id: "chess".to_string(),
            name: "Chess".to_string(),
            icon: None,
            url: "https://chess.example".to_string(),
        }
    }

    #[test]
    fn bridge_wiring_is_released_with_its_owner() {
        let harness = Harness::new();
        let wire = as_child_of_current_owner(wire_bridge);
        let ((), disposer) = wire(harness.runtime);

        let delivered = harness
            .runtime
            .publish(BridgeSignal::OpenWindowByApp("explorer".to_string()));
        assert_eq!(delivered, 1);
        assert_eq!(
            harness.runtime.state.with_untracked(|desktop| desktop.windows.len()),
            1
        );

        drop(disposer);
        let delivered = harness
            .runtime
            .publish(BridgeSignal::OpenWindowByApp("explorer".to_string()));
        assert_eq!(delivered, 0);
        assert_eq!(
            harness.runtime.state.with_untracked(|desktop| desktop.windows.len()),
            1
        );
        harness.finish();
    }

    #[test]
    fn layout_changes_before_boot_hydration_are_not_written() {
        let harness = Harness::new();

        let early = harness.open("explorer");
        assert_eq!(harness.store.write_count(), 0);

        harness.boot();
        assert!(harness.runtime.state.with_untracked(|desktop| desktop.boot_hydrated));
        assert_eq!(harness.store.write_count(), 0);
        assert!(harness
            .runtime
            .state
            .with_untracked(|desktop| desktop.window(&early).is_some()));

        harness.open("settings");
        assert_eq!(harness.store.write_count(), 1);
        let stored = harness.store.raw(WINDOWS_KEY).expect("windows written");
        assert!(stored.contains(early.as_str()));
        harness.finish();
    }

    #[test]
    fn each_changed_layout_is_written_exactly_once() {
        let harness = Harness::new();
        harness.boot();

        let win = harness.open("explorer");
        assert_eq!(harness.store.write_count(), 1);

        harness.dispatch(DesktopAction::EndWindowInteraction {
            window_id: win.clone(),
            viewport: None,
        });
        assert_eq!(harness.store.write_count(), 1);

        harness.dispatch(DesktopAction::MoveWindowBy {
            window_id: win.clone(),
            delta: PointerDelta { dx: 30, dy: 10 },
        });
        harness.dispatch(DesktopAction::MoveWindowBy {
            window_id: win.clone(),
            delta: PointerDelta { dx: 5, dy: 0 },
        });
        assert_eq!(harness.store.write_count(), 1);

        harness.dispatch(DesktopAction::EndWindowInteraction {
            window_id: win,
            viewport: None,
        });
        assert_eq!(harness.store.write_count(), 2);
        harness.finish();
    }

    #[test]
    fn layout_is_rewritten_after_session_clear() {
        let harness = Harness::new();
        harness.boot();
        let win = harness.open("explorer");
        let saved = harness.store.raw(WINDOWS_KEY).expect("windows written");
        let writes = harness.store.write_count();
        let windows = harness.runtime.state.with_untracked(|desktop| desktop.windows.clone());

        harness.dispatch(DesktopAction::ClearSession);
        assert_eq!(harness.store.raw(WINDOWS_KEY), None);

        harness.dispatch(DesktopAction::HydrateSnapshot {
            snapshot: DesktopSnapshot {
                windows,
                widgets: Vec::new(),
            },
        });
        harness.dispatch(DesktopAction::EndWindowInteraction {
            window_id: win,
            viewport: None,
        });

        assert_eq!(harness.store.write_count(), writes + 1);
        assert_eq!(harness.store.raw(WINDOWS_KEY), Some(saved));
        harness.finish();
    }

    #[test]
    fn remote_metadata_is_dispatched_back_with_its_load_token() {
        let harness = Harness::new();
        harness.remote.insert_metadata(
            "https://chess.example",
            RemoteAppMetadata {
                name: Some("Chess Deluxe".to_string()),
                icon: Some("♟️".to_string()),
            },
        );

        harness
            .runtime
            .dispatch_action(DesktopAction::OpenUrlWindow(chess_spec()));
        let (id, token) = harness.runtime.state.with_untracked(|desktop| {
            let win = &desktop.windows[0];
            (win.id.clone(), win.load_token.expect("load in flight"))
        });
        assert_eq!(
            harness.runtime.effects.get_untracked()[0],
            RuntimeEffect::LoadRemoteContent {
                window_id: id.clone(),
                load_token: token,
                url: "https://chess.example".to_string(),
            }
        );

        harness.drain();

        let settled = harness
            .runtime
            .state
            .with_untracked(|desktop| desktop.window(&id).cloned())
            .expect("window");
        assert_eq!(settled.title, "Chess Deluxe");
        assert_eq!(settled.load_token, None);
        assert!(matches!(
            settled.content.as_ref().expect("content").produce(),
            Ok(WindowContent::EmbeddedFrame { .. })
        ));
        harness.finish();
    }

    #[test]
    fn remote_failures_and_rejected_actions_raise_toasts() {
        let harness = Harness::new();
        harness
            .remote
            .fail_metadata("https://chess.example", "offline");

        harness.dispatch(DesktopAction::OpenUrlWindow(chess_spec()));
        harness.dispatch(DesktopAction::CloseWindow {
            window_id: WindowId::new("ghost"),
        });

        let toasts = harness.runtime.notifications.with_untracked(|center| {
            center
                .entries()
                .iter()
                .map(|n| (n.level, n.title.clone(), n.body.clone()))
                .collect::<Vec<_>>()
        });
        assert_eq!(
            toasts,
            vec![
                (
                    NotificationLevel::Error,
                    "Chess".to_string(),
                    "App details could not be loaded: offline".to_string(),
                ),
                (
                    NotificationLevel::Warning,
                    "Desktop".to_string(),
                    "window `ghost` not found".to_string(),
                ),
            ]
        );
        harness.finish();
    }
}
