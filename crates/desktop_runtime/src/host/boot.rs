use leptos::{create_effect, spawn_local, Callable, Callback};

use crate::{
    apps, host::DesktopHostContext, model::DesktopPreferences, persistence,
    reducer::DesktopAction,
};

pub(super) fn install_boot_hydration(
    host: DesktopHostContext,
    dispatch: Callback<DesktopAction>,
    preferences: DesktopPreferences,
) {
    create_effect(move |_| {
        spawn_local(hydrate(host.clone(), dispatch, preferences));
    });
}

pub(super) async fn hydrate(
    host: DesktopHostContext,
    dispatch: Callback<DesktopAction>,
    preferences: DesktopPreferences,
) {
    let snapshot = if preferences.restore_on_boot {
        persistence::load_boot_snapshot(
            host.durable.as_ref(),
            apps::app_registry(),
            preferences.unmatched_window_policy,
        )
        .await
    } else {
        persistence::fresh_boot_snapshot()
    };

    dispatch.call(DesktopAction::HydrateSnapshot { snapshot });
    dispatch.call(DesktopAction::BootHydrationComplete);
}
