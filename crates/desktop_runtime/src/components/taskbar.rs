use std::time::Duration;

use super::{toasts::NotificationBadge, *};
use crate::model::{DesktopState, WindowId, WindowRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TaskbarClockSnapshot {
    hour: u32,
    minute: u32,
}

impl TaskbarClockSnapshot {
    fn now() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            let date = js_sys::Date::new_0();
            return Self {
                hour: date.get_hours(),
                minute: date.get_minutes(),
            };
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Self { hour: 0, minute: 0 }
        }
    }

    fn label(self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

fn taskbar_button_class(win: &WindowRecord) -> String {
    let mut class = String::from("taskbar-window");
    if win.is_focused && !win.minimized {
        class.push_str(" focused");
    }
    if win.minimized {
        class.push_str(" minimized");
    }
    class
}

/// Resolves a drag from one taskbar button onto another into collection indices.
fn reorder_indices(desktop: &DesktopState, dragged: &WindowId, target: &WindowId) -> Option<(usize, usize)> {
    if dragged == target {
        return None;
    }
    let from = desktop.windows.iter().position(|win| &win.id == dragged)?;
    let to = desktop.windows.iter().position(|win| &win.id == target)?;
    Some((from, to))
}

#[component]
pub(super) fn Taskbar() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;
    let clock_now = create_rw_signal(TaskbarClockSnapshot::now());
    let dragged = create_rw_signal(None::<WindowId>);
    let start_menu_was_open = create_rw_signal(false);

    if let Ok(interval) = set_interval_with_handle(
        move || clock_now.set(TaskbarClockSnapshot::now()),
        Duration::from_secs(1),
    ) {
        on_cleanup(move || interval.clear());
    }

    create_effect(move |_| {
        let is_open = state.with(|desktop| desktop.start_menu_open);
        let was_open = start_menu_was_open.get_untracked();
        if is_open && !was_open {
            start_menu_was_open.set(true);
            let _ = focus_first_menu_item(START_MENU_ID);
        } else if !is_open && was_open {
            start_menu_was_open.set(false);
        }
    });

    view! {
        <footer
            class="taskbar"
            role="toolbar"
            aria-label="Taskbar"
            style=format!("height:{TASKBAR_HEIGHT_PX}px;")
        >
            <button
                id="desktop-launcher-button"
                class=move || {
                    if state.with(|desktop| desktop.start_menu_open) {
                        "taskbar-start open"
                    } else {
                        "taskbar-start"
                    }
                }
                aria-haspopup="menu"
                aria-controls=START_MENU_ID
                aria-expanded=move || state.with(|desktop| desktop.start_menu_open).to_string()
                on:click=move |_| runtime.dispatch_action(DesktopAction::ToggleStartMenu)
            >
                "Start"
            </button>

            <div class="taskbar-windows" role="list">
                <For
                    each=move || state.get().windows
                    key=|win| (win.id.clone(), taskbar_button_class(win), win.title.clone())
                    let:win
                >
                    <TaskbarWindowButton win dragged />
                </For>
            </div>

            <NotificationBadge />

            <div class="taskbar-clock" aria-live="off">
                {move || clock_now.get().label()}
            </div>
        </footer>
    }
}

#[component]
fn TaskbarWindowButton(win: WindowRecord, dragged: RwSignal<Option<WindowId>>) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let class_name = taskbar_button_class(&win);
    let pressed = (win.is_focused && !win.minimized).to_string();
    let window_id = store_value(win.id);

    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        let Some(source) = dragged.get_untracked() else {
            return;
        };
        dragged.set(None);
        let indices = window_id.with_value(|target| {
            runtime
                .state
                .with_untracked(|desktop| reorder_indices(desktop, &source, target))
        });
        if let Some((from, to)) = indices {
            runtime.dispatch_action(DesktopAction::ReorderWindows { from, to });
        }
    };

    view! {
        <button
            class=class_name
            role="listitem"
            draggable="true"
            aria-pressed=pressed
            data-window-id=window_id.get_value().to_string()
            on:click=move |_| {
                runtime.dispatch_action(DesktopAction::ToggleTaskbarWindow {
                    window_id: window_id.get_value(),
                });
            }
            on:dragstart=move |ev: web_sys::DragEvent| {
                let id = window_id.get_value();
                if let Some(transfer) = ev.data_transfer() {
                    let _ = transfer.set_data("text/plain", id.as_str());
                }
                dragged.set(Some(id));
            }
            on:dragover=move |ev: web_sys::DragEvent| ev.prevent_default()
            on:dragend=move |_| dragged.set(None)
            on:drop=on_drop
        >
            <window::WindowIcon icon=win.icon />
            <span class="taskbar-window-title">{win.title}</span>
        </button>
    }
}
