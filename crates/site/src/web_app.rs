use desktop_runtime::{DesktopProvider, DesktopShell};
use leptos::*;
use leptos_meta::*;
use platform_host_web::build_host_services;

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Retro Desktop" />
        <Meta name="description" content="A desktop simulation running in the browser." />

        <main class="site-root">
            <DesktopEntry />
        </main>
    }
}

#[component]
pub fn DesktopEntry() -> impl IntoView {
    view! {
        <DesktopProvider host_services=build_host_services()>
            <DesktopShell />
        </DesktopProvider>
    }
}
