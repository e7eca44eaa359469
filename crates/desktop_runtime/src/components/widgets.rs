use super::*;
use crate::{
    model::WidgetRecord,
    reducer::{WIDGET_HEIGHT, WIDGET_WIDTH},
};

#[component]
pub(super) fn WidgetLayer() -> impl IntoView {
    let runtime = use_desktop_runtime();

    view! {
        <div class="desktop-widget-layer" style=SurfaceLayer::Widgets.style()>
            <For
                each=move || runtime.state.with(|desktop| desktop.widgets.clone())
                key=|widget| widget.id.clone()
                let:widget
            >
                <Plasmoid id=widget.id widget_id=widget.widget_id />
            </For>
        </div>
    }
}

fn widget_style(widget: &WidgetRecord) -> String {
    format!(
        "position:absolute;pointer-events:auto;left:{}px;top:{}px;width:{WIDGET_WIDTH}px;height:{WIDGET_HEIGHT}px;z-index:{};",
        widget.x, widget.y, widget.z_index
    )
}

/// A floating desktop widget with a drag header and a close button.
#[component]
fn Plasmoid(id: String, widget_id: String) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let id = store_value(id);
    let descriptor = apps::widget_descriptor(&widget_id);
    let title = descriptor.map_or(widget_id.clone(), |entry| entry.title.to_string());
    let icon = descriptor.map_or("", |entry| entry.icon);

    let style = move || {
        id.with_value(|id| {
            runtime.state.with(|desktop| {
                desktop
                    .widget(id)
                    .map(widget_style)
                    .unwrap_or_default()
            })
        })
    };

    let begin_drag = move |ev: web_sys::PointerEvent| {
        begin_pointer_interaction(
            runtime,
            InteractionTarget::Widget(id.get_value()),
            InteractionKind::Move,
            &ev,
        );
    };

    view! {
        <aside
            class="plasmoid"
            data-widget=widget_id.clone()
            style=style
            aria-label=title.clone()
            on:pointerdown=move |_| {
                runtime.dispatch_action(DesktopAction::FocusWidget { id: id.get_value() });
            }
        >
            <header class="plasmoid-header" on:pointerdown=begin_drag>
                <span aria-hidden="true">{icon}</span>
                <span class="plasmoid-title">{title}</span>
                <button
                    class="plasmoid-close"
                    aria-label="Remove widget"
                    on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                    on:click=move |ev| {
                        stop_mouse_event(&ev);
                        runtime.dispatch_action(DesktopAction::RemoveWidget { id: id.get_value() });
                    }
                >
                    "×"
                </button>
            </header>
            <div class="plasmoid-body">
                <WidgetBody widget_id />
            </div>
        </aside>
    }
}

#[component]
fn WidgetBody(widget_id: String) -> impl IntoView {
    let runtime = use_desktop_runtime();
    match widget_id.as_str() {
        "weather" => view! {
            <div class="widget-weather">
                <span class="widget-weather-temp">"21°C"</span>
                <span>"Partly cloudy"</span>
            </div>
        }
        .into_view(),
        "notes" => view! {
            <textarea
                class="widget-notes"
                aria-label="Sticky note"
                placeholder="Write a note…"
            ></textarea>
        }
        .into_view(),
        "sysmon" => view! {
            <dl class="widget-sysmon">
                <dt>"Windows"</dt>
                <dd>{move || runtime.state.with(|desktop| desktop.windows.len())}</dd>
                <dt>"Widgets"</dt>
                <dd>{move || runtime.state.with(|desktop| desktop.widgets.len())}</dd>
            </dl>
        }
        .into_view(),
        _ => view! { <p>"Unknown widget"</p> }.into_view(),
    }
}
