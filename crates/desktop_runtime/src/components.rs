//! Desktop shell UI composition and interaction surfaces.

mod a11y;
mod app_views;
mod start_menu;
mod taskbar;
mod taskbar_input;
mod toasts;
mod widgets;
mod window;

use std::{cell::RefCell, rc::Rc};

use leptos::*;

use self::{
    a11y::{focus_first_menu_item, handle_menu_roving_keydown},
    start_menu::{StartMenu, START_MENU_ID},
    taskbar::Taskbar,
    taskbar_input::try_handle_taskbar_shortcuts,
    toasts::ToastStack,
    widgets::WidgetLayer,
    window::DesktopWindow,
};
use crate::{
    apps,
    event_bridge::BridgeSignal,
    interaction::{InteractionKind, InteractionSession, InteractionTarget},
    model::{PointerDelta, PointerPosition, ResizeEdge},
    reducer::DesktopAction,
};

pub(crate) const TASKBAR_HEIGHT_PX: i32 = 38;

/// Layers of the desktop surface, bottom to top.
///
/// Each layer is its own stacking context, so window and widget z-indices only order siblings
/// inside their layer and windows always paint above widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceLayer {
    Widgets,
    Windows,
}

impl SurfaceLayer {
    const fn z_index(self) -> u32 {
        match self {
            Self::Widgets => 1,
            Self::Windows => 2,
        }
    }

    fn style(self) -> String {
        format!(
            "position:absolute;inset:0;isolation:isolate;pointer-events:none;z-index:{};",
            self.z_index()
        )
    }
}

pub use crate::runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};

#[component]
/// Renders the full desktop shell: icons, widgets, windows, start menu, toasts and taskbar.
pub fn DesktopShell() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;

    let shortcut_listener = window_event_listener(ev::keydown, move |ev| {
        if ev.default_prevented() {
            return;
        }
        try_handle_taskbar_shortcuts(runtime, &ev);
    });
    on_cleanup(move || shortcut_listener.remove());

    view! {
        <div
            id="desktop-shell-root"
            class="desktop-shell"
            tabindex="-1"
            data-host=move || runtime.host.with_value(|host| host.host_strategy_name())
        >
            <div
                class="desktop-surface"
                style=format!("bottom:{TASKBAR_HEIGHT_PX}px;")
                on:mousedown=move |_| {
                    if state.get_untracked().start_menu_open {
                        runtime.dispatch_action(DesktopAction::CloseStartMenu);
                    }
                }
            >
                <div class="desktop-icons" role="list" aria-label="Desktop shortcuts">
                    <For each=apps::desktop_icon_apps key=|app| app.app_id let:app>
                        <button
                            class="desktop-icon"
                            role="listitem"
                            data-app=app.app_id
                            on:dblclick=move |_| {
                                runtime.publish(BridgeSignal::OpenWindowByApp(app.app_id.to_string()));
                            }
                            on:keydown=move |ev: web_sys::KeyboardEvent| {
                                if ev.key() == "Enter" {
                                    ev.prevent_default();
                                    runtime.publish(BridgeSignal::OpenWindowByApp(app.app_id.to_string()));
                                }
                            }
                        >
                            <span class="desktop-icon-glyph" aria-hidden="true">{app.icon}</span>
                            <span class="desktop-icon-label">{app.title}</span>
                        </button>
                    </For>
                </div>

                <WidgetLayer />

                <div class="desktop-window-layer" style=SurfaceLayer::Windows.style()>
                    <For
                        each=move || state.get().windows
                        key=|win| win.id.clone()
                        let:win
                    >
                        <DesktopWindow window_id=win.id />
                    </For>
                </div>
            </div>

            <Show when=move || state.get().start_menu_open fallback=|| ()>
                <StartMenu />
            </Show>

            <ToastStack />

            <Taskbar />
        </div>
    }
}

#[cfg(target_arch = "wasm32")]
fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    use wasm_bindgen::JsCast;

    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

fn is_primary_press(ev: &web_sys::PointerEvent) -> bool {
    if ev.pointer_type() == "mouse" {
        ev.button() == 0
    } else {
        ev.is_primary()
    }
}

fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

fn pointer_from_pointer_event(ev: &web_sys::PointerEvent) -> PointerPosition {
    PointerPosition {
        x: ev.client_x(),
        y: ev.client_y(),
    }
}

fn resize_edge_class(edge: ResizeEdge) -> &'static str {
    match edge {
        ResizeEdge::North => "edge-n",
        ResizeEdge::South => "edge-s",
        ResizeEdge::East => "edge-e",
        ResizeEdge::West => "edge-w",
        ResizeEdge::NorthEast => "edge-ne",
        ResizeEdge::NorthWest => "edge-nw",
        ResizeEdge::SouthEast => "edge-se",
        ResizeEdge::SouthWest => "edge-sw",
    }
}

fn delta_action(target: &InteractionTarget, kind: InteractionKind, delta: PointerDelta) -> DesktopAction {
    match (target, kind) {
        (InteractionTarget::Window(window_id), InteractionKind::Move) => DesktopAction::MoveWindowBy {
            window_id: window_id.clone(),
            delta,
        },
        (InteractionTarget::Window(window_id), InteractionKind::Resize(edge)) => {
            DesktopAction::ResizeWindowBy {
                window_id: window_id.clone(),
                edge,
                delta,
            }
        }
        (InteractionTarget::Widget(id), _) => DesktopAction::MoveWidgetBy {
            id: id.clone(),
            delta,
        },
    }
}

fn end_action(runtime: DesktopRuntimeContext, target: InteractionTarget) -> DesktopAction {
    let viewport = Some(
        runtime
            .host
            .get_value()
            .desktop_viewport_rect(TASKBAR_HEIGHT_PX),
    );
    match target {
        InteractionTarget::Window(window_id) => DesktopAction::EndWindowInteraction {
            window_id,
            viewport,
        },
        InteractionTarget::Widget(id) => DesktopAction::EndWidgetDrag { id, viewport },
    }
}

fn raise_target(runtime: DesktopRuntimeContext, target: &InteractionTarget) {
    match target {
        InteractionTarget::Window(window_id) => {
            let needs_focus = runtime.state.with_untracked(|desktop| {
                desktop
                    .window(window_id)
                    .is_some_and(|win| !win.is_focused || win.minimized)
            });
            if needs_focus {
                runtime.dispatch_action(DesktopAction::FocusWindow {
                    window_id: window_id.clone(),
                });
            }
        }
        InteractionTarget::Widget(id) => {
            runtime.dispatch_action(DesktopAction::FocusWidget { id: id.clone() });
        }
    }
}

/// Starts a drag or resize from a pointer press and installs the global listeners that drive it.
///
/// Pointer-up or pointer-cancel anywhere in the page ends the session, which removes every
/// listener installed here.
fn begin_pointer_interaction(
    runtime: DesktopRuntimeContext,
    target: InteractionTarget,
    kind: InteractionKind,
    ev: &web_sys::PointerEvent,
) {
    if !is_primary_press(ev) {
        return;
    }
    try_set_pointer_capture(ev);
    ev.prevent_default();
    ev.stop_propagation();
    raise_target(runtime, &target);

    let delta_target = target.clone();
    let begun = runtime.interactions.with_value(|controller| {
        controller.begin(
            target,
            kind,
            pointer_from_pointer_event(ev),
            move |delta| runtime.dispatch_action(delta_action(&delta_target, kind, delta)),
        )
    });
    let session = match begun {
        Ok(session) => session,
        Err(err) => {
            logging::warn!("{err}");
            return;
        }
    };

    let slot: Rc<RefCell<Option<InteractionSession>>> = Rc::new(RefCell::new(Some(session)));

    let move_slot = slot.clone();
    let move_handle = window_event_listener(ev::pointermove, move |ev| {
        if let Some(session) = move_slot.borrow_mut().as_mut() {
            session.pointer_moved(pointer_from_pointer_event(&ev));
        }
    });

    let finish_slot = slot.clone();
    let finish = move |_: web_sys::PointerEvent| {
        let Some(session) = finish_slot.borrow_mut().take() else {
            return;
        };
        let target = session.target().clone();
        session.end();
        runtime.dispatch_action(end_action(runtime, target));
    };
    let up_handle = window_event_listener(ev::pointerup, finish.clone());
    let cancel_handle = window_event_listener(ev::pointercancel, finish);

    let mut installed = slot.borrow_mut();
    if let Some(session) = installed.as_mut() {
        session.register_listener(move || move_handle.remove());
        session.register_listener(move || up_handle.remove());
        session.register_listener(move || cancel_handle.remove());
    }
}
