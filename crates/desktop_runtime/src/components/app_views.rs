//! Lightweight views for built-in registry apps and embedded remote apps.
//!
//! Built-in apps stand in for external collaborators. Settings closes itself through the event
//! bridge, the package manager launches catalog entries as URL windows, and the explorer listens
//! for `fs-change`.

use leptos::*;
use platform_host::REMOTE_APP_CATALOG_URL;

use crate::{
    apps,
    components::use_desktop_runtime,
    content::WindowContent,
    event_bridge::BridgeSignal,
    model::{UrlWindowSpec, WindowId},
};

#[component]
pub(super) fn WindowContentView(window_id: WindowId, content: WindowContent) -> impl IntoView {
    match content {
        WindowContent::App { app_id } => view! { <AppView app_id window_id /> }.into_view(),
        WindowContent::EmbeddedFrame {
            url,
            title,
            sandbox,
        } => view! {
            <iframe class="embedded-app-frame" src=url title=title sandbox=sandbox></iframe>
        }
        .into_view(),
        WindowContent::Loading { url } => view! {
            <div class="window-loading" aria-busy="true">
                <p>"Loading " {url} "…"</p>
            </div>
        }
        .into_view(),
        WindowContent::Unavailable { title } => view! {
            <div class="window-unavailable" role="status">
                <p>{format!("{title}: app unavailable, please reopen.")}</p>
            </div>
        }
        .into_view(),
    }
}

#[component]
fn AppView(app_id: String, window_id: WindowId) -> impl IntoView {
    match app_id.as_str() {
        "settings" => view! { <SettingsView /> }.into_view(),
        "package-manager" => view! { <PackageManagerView /> }.into_view(),
        "explorer" => view! { <ExplorerView /> }.into_view(),
        _ => {
            let title = apps::app_descriptor(&app_id)
                .map(|entry| entry.title.to_string())
                .unwrap_or(app_id);
            view! {
                <div class="app-placeholder" data-window-id=window_id.to_string()>
                    <h2>{title}</h2>
                    <p>"This app runs outside the window manager."</p>
                </div>
            }
            .into_view()
        }
    }
}

#[component]
fn SettingsView() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let preferences = move || runtime.state.with(|state| state.preferences);

    view! {
        <div class="app-settings">
            <dl>
                <dt>"Restore layout on boot"</dt>
                <dd>{move || yes_no(preferences().restore_on_boot)}</dd>
                <dt>"Keep dragged windows on screen"</dt>
                <dd>{move || yes_no(preferences().clamp_on_drag_end)}</dd>
                <dt>"Host"</dt>
                <dd>{runtime.host.with_value(|host| host.host_strategy_name())}</dd>
            </dl>
            <button
                class="app-settings-done"
                on:click=move |_| {
                    runtime.publish(BridgeSignal::CloseWindowByTag("settings".to_string()));
                }
            >
                "Done"
            </button>
        </div>
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

#[component]
fn PackageManagerView() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let catalog = create_local_resource(
        || (),
        move |_| {
            let service = runtime.host.get_value().remote_app_service();
            async move { service.fetch_catalog(REMOTE_APP_CATALOG_URL).await }
        },
    );

    view! {
        <div class="app-package-manager">
            <Suspense fallback=|| view! { <p>"Loading catalog…"</p> }>
                {move || {
                    catalog.get().map(|result| match result {
                        Ok(entries) if entries.is_empty() => {
                            view! { <p>"No apps available."</p> }.into_view()
                        }
                        Ok(entries) => view! {
                            <ul class="package-list">
                                {entries
                                    .into_iter()
                                    .map(|entry| {
                                        let spec = UrlWindowSpec {
                                            id: entry.id.clone(),
                                            name: entry.name.clone(),
                                            icon: entry.icon.clone(),
                                            url: entry.url.clone(),
                                        };
                                        view! {
                                            <li>
                                                <span class="package-icon" aria-hidden="true">
                                                    {entry.icon.unwrap_or_default()}
                                                </span>
                                                <strong>{entry.name}</strong>
                                                <span class="package-description">{entry.description}</span>
                                                <button on:click=move |_| {
                                                    runtime.publish(BridgeSignal::OpenWindowByUrl(spec.clone()));
                                                }>
                                                    "Launch"
                                                </button>
                                            </li>
                                        }
                                    })
                                    .collect_view()}
                            </ul>
                        }
                        .into_view(),
                        Err(err) => view! {
                            <p class="package-error">{format!("Catalog unavailable: {err}")}</p>
                        }
                        .into_view(),
                    })
                }}
            </Suspense>
        </div>
    }
}

#[component]
fn ExplorerView() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let refreshes = create_rw_signal(0_u32);
    let subscription = runtime.bridge.with_value(|bridge| {
        bridge.subscribe(move |signal| {
            if *signal == BridgeSignal::FsChange {
                refreshes.update(|count| *count += 1);
            }
        })
    });
    on_cleanup(move || subscription.unsubscribe());

    view! {
        <div class="app-explorer">
            <p>{move || format!("Listing refreshed {} time(s).", refreshes.get())}</p>
            <button on:click=move |_| {
                runtime.publish(BridgeSignal::FsChange);
            }>
                "Refresh"
            </button>
        </div>
    }
}
