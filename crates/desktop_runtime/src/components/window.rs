use super::*;
use crate::{
    components::app_views::WindowContentView,
    model::WindowId,
    supervision::{SupervisedContent, CRASHED_WINDOW_MESSAGE},
};

#[component]
pub(super) fn DesktopWindow(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let window_id = store_value(window_id);

    let window = Signal::derive(move || {
        window_id.with_value(|id| runtime.state.with(|state| state.window(id).cloned()))
    });

    let focus = move |_: web_sys::PointerEvent| {
        let should_focus = window
            .with(|w| w.as_ref().map(|w| !w.is_focused || w.minimized))
            .unwrap_or(false);
        if should_focus {
            runtime.dispatch_action(DesktopAction::FocusWindow {
                window_id: window_id.get_value(),
            });
        }
    };
    let minimize = move || {
        runtime.dispatch_action(DesktopAction::MinimizeWindow {
            window_id: window_id.get_value(),
        })
    };
    let close = move || {
        runtime.dispatch_action(DesktopAction::CloseWindow {
            window_id: window_id.get_value(),
        })
    };
    let toggle_maximize = move || {
        let Some(maximized) = window.with(|w| w.as_ref().map(|w| w.maximized)) else {
            return;
        };
        if maximized {
            runtime.dispatch_action(DesktopAction::RestoreWindow {
                window_id: window_id.get_value(),
            });
        } else {
            runtime.dispatch_action(DesktopAction::MaximizeWindow {
                window_id: window_id.get_value(),
                viewport: runtime
                    .host
                    .get_value()
                    .desktop_viewport_rect(TASKBAR_HEIGHT_PX),
            });
        }
    };
    let begin_move = move |ev: web_sys::PointerEvent| {
        if window.with(|w| w.as_ref().map_or(true, |w| w.maximized)) {
            return;
        }
        begin_pointer_interaction(
            runtime,
            InteractionTarget::Window(window_id.get_value()),
            InteractionKind::Move,
            &ev,
        );
    };

    let window_class = move || {
        window.with(|w| {
            w.as_ref().map_or_else(String::new, |win| {
                format!(
                    "desktop-window{}{}{}",
                    if win.is_focused { " focused" } else { "" },
                    if win.minimized { " minimized" } else { "" },
                    if win.maximized { " maximized" } else { "" },
                )
            })
        })
    };
    let window_style = move || {
        window.with(|w| {
            w.as_ref().map_or_else(String::new, |win| {
                format!(
                    "position:absolute;pointer-events:auto;left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};",
                    win.rect.x, win.rect.y, win.rect.w, win.rect.h, win.z_index
                )
            })
        })
    };
    let title = move || {
        window.with(|w| w.as_ref().map(|win| win.title.clone()).unwrap_or_default())
    };
    let icon = create_memo(move |_| {
        window.with(|w| w.as_ref().map(|win| win.icon.clone()).unwrap_or_default())
    });
    let maximized = move || window.with(|w| w.as_ref().is_some_and(|win| win.maximized));

    view! {
        <Show when=move || window.with(Option::is_some) fallback=|| ()>
            <section
                class=window_class
                style=window_style
                data-window-id=window_id.get_value().to_string()
                on:pointerdown=focus
                role="dialog"
                aria-label=title
            >
                <header
                    class="titlebar"
                    on:pointerdown=begin_move
                    on:dblclick=move |ev| {
                        stop_mouse_event(&ev);
                        toggle_maximize();
                    }
                >
                    <div class="titlebar-title">
                        {move || view! { <WindowIcon icon=icon.get() /> }}
                        <span>{title}</span>
                    </div>
                    <div class="titlebar-controls">
                        <button
                            aria-label="Minimize window"
                            on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                            on:click=move |ev| {
                                stop_mouse_event(&ev);
                                minimize();
                            }
                        >
                            "_"
                        </button>
                        <button
                            aria-label=move || {
                                if maximized() { "Restore window" } else { "Maximize window" }
                            }
                            on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                            on:click=move |ev| {
                                stop_mouse_event(&ev);
                                toggle_maximize();
                            }
                        >
                            {move || if maximized() { "❐" } else { "□" }}
                        </button>
                        <button
                            class="titlebar-close"
                            aria-label="Close window"
                            on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                            on:click=move |ev| {
                                stop_mouse_event(&ev);
                                close();
                            }
                        >
                            "×"
                        </button>
                    </div>
                </header>
                <div class="window-body">
                    <WindowBody window_id=window_id.get_value() />
                </div>
                <Show when=move || !maximized() fallback=|| ()>
                    <WindowResizeHandle window_id=window_id.get_value() edge=ResizeEdge::North />
                    <WindowResizeHandle window_id=window_id.get_value() edge=ResizeEdge::South />
                    <WindowResizeHandle window_id=window_id.get_value() edge=ResizeEdge::East />
                    <WindowResizeHandle window_id=window_id.get_value() edge=ResizeEdge::West />
                    <WindowResizeHandle window_id=window_id.get_value() edge=ResizeEdge::NorthEast />
                    <WindowResizeHandle window_id=window_id.get_value() edge=ResizeEdge::NorthWest />
                    <WindowResizeHandle window_id=window_id.get_value() edge=ResizeEdge::SouthEast />
                    <WindowResizeHandle window_id=window_id.get_value() edge=ResizeEdge::SouthWest />
                </Show>
            </section>
        </Show>
    }
}

/// Glyph icons render as text; URL icons (from remote manifests) render as images.
#[component]
pub(super) fn WindowIcon(icon: String) -> impl IntoView {
    let is_url = icon.contains('/') || icon.starts_with("data:");
    view! {
        <span class="titlebar-app-icon" aria-hidden="true">
            {if is_url {
                view! { <img src=icon alt="" width="16" height="16" /> }.into_view()
            } else {
                icon.into_view()
            }}
        </span>
    }
}

#[component]
fn WindowResizeHandle(window_id: WindowId, edge: ResizeEdge) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let class_name = format!("window-resize-handle {}", resize_edge_class(edge));

    let on_pointerdown = move |ev: web_sys::PointerEvent| {
        begin_pointer_interaction(
            runtime,
            InteractionTarget::Window(window_id.clone()),
            InteractionKind::Resize(edge),
            &ev,
        );
    };

    view! {
        <div
            class=class_name
            aria-hidden="true"
            on:pointerdown=on_pointerdown
        />
    }
}

#[component]
fn WindowBody(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let window_id = store_value(window_id);
    let content_factory = create_memo(move |_| {
        window_id.with_value(|id| {
            runtime
                .state
                .with(|state| state.window(id).and_then(|w| w.content.clone()))
        })
    });

    let contents = move || {
        content_factory.track();
        let record = window_id.with_value(|id| {
            runtime
                .state
                .with_untracked(|state| state.window(id).cloned())
        })?;
        let supervised = runtime
            .supervision
            .try_update_value(|ledger| ledger.content_for(&record))
            .unwrap_or_else(|| SupervisedContent::Failed("runtime disposed".to_string()));
        Some(
            supervised
                .into_result()
                .map(|content| view! { <WindowContentView window_id=record.id content /> }),
        )
    };

    view! {
        <div class="window-body-content">
            <ErrorBoundary fallback={|errors: RwSignal<Errors>| view! {
                <div class="window-crashed" role="alert">
                    <p>{CRASHED_WINDOW_MESSAGE}</p>
                    <ul class="window-crash-details">
                        {move || {
                            errors
                                .get()
                                .into_iter()
                                .map(|(_, error)| view! { <li>{error.to_string()}</li> })
                                .collect_view()
                        }}
                    </ul>
                </div>
            }}>
                {contents}
            </ErrorBoundary>
        </div>
    }
}
