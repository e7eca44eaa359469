use super::*;

pub(super) const START_MENU_ID: &str = "desktop-launcher-menu";

#[component]
pub(super) fn StartMenu() -> impl IntoView {
    let runtime = use_desktop_runtime();

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        if handle_menu_roving_keydown(&ev, START_MENU_ID) {
            return;
        }
        if ev.key() == "Escape" {
            ev.prevent_default();
            ev.stop_propagation();
            runtime.dispatch_action(DesktopAction::CloseStartMenu);
        }
    };

    view! {
        <nav
            id=START_MENU_ID
            class="start-menu"
            role="menu"
            aria-label="Start menu"
            style=format!("bottom:{TASKBAR_HEIGHT_PX}px;")
            on:keydown=on_keydown
        >
            <div class="start-menu-section" role="group" aria-label="Apps">
                <For each=apps::launcher_apps key=|app| app.app_id let:app>
                    <button
                        id=format!("start-menu-app-{}", app.app_id)
                        class="start-menu-item"
                        role="menuitem"
                        on:click=move |_| {
                            runtime.dispatch_action(DesktopAction::CloseStartMenu);
                            runtime.publish(BridgeSignal::OpenWindowByApp(app.app_id.to_string()));
                        }
                    >
                        <span class="start-menu-icon" aria-hidden="true">{app.icon}</span>
                        <span>{app.title}</span>
                    </button>
                </For>
            </div>

            <div class="start-menu-section" role="group" aria-label="Widgets">
                <For each=|| apps::widget_registry().to_vec() key=|widget| widget.widget_id let:widget>
                    <button
                        id=format!("start-menu-widget-{}", widget.widget_id)
                        class="start-menu-item"
                        role="menuitem"
                        on:click=move |_| {
                            runtime.dispatch_action(DesktopAction::CloseStartMenu);
                            runtime.dispatch_action(DesktopAction::LaunchWidget {
                                widget_id: widget.widget_id.to_string(),
                            });
                        }
                    >
                        <span class="start-menu-icon" aria-hidden="true">{widget.icon}</span>
                        <span>{widget.title}</span>
                    </button>
                </For>
            </div>

            <div class="start-menu-separator" role="separator" aria-hidden="true"></div>

            <button
                id="start-menu-power-off"
                class="start-menu-item start-menu-power"
                role="menuitem"
                on:click=move |_| {
                    runtime.dispatch_action(DesktopAction::ClearSession);
                }
            >
                "Power Off (Clear Session)"
            </button>
        </nav>
    }
}
