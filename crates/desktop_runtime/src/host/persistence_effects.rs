use leptos::{logging, SignalGetUntracked};

use crate::{
    host::{DesktopHostContext, HostTask},
    persistence::{self, WIDGETS_KEY, WINDOWS_KEY},
    runtime_context::DesktopRuntimeContext,
};

fn write_if_changed(host: DesktopHostContext, key: &'static str, encoded: String) -> Option<HostTask> {
    if !host.deduper().borrow_mut().admit(key, &encoded) {
        return None;
    }
    Some(Box::pin(async move {
        if let Err(err) = host.durable.save_raw(key, &encoded).await {
            logging::warn!("persist {key} failed: {err}");
        }
    }))
}

pub(super) fn persist_windows(
    host: DesktopHostContext,
    runtime: DesktopRuntimeContext,
) -> Option<HostTask> {
    let state = runtime.state.get_untracked();
    if !state.boot_hydrated {
        return None;
    }
    match persistence::encode_windows(&state.windows) {
        Ok(encoded) => write_if_changed(host, WINDOWS_KEY, encoded),
        Err(err) => {
            logging::warn!("{err}");
            None
        }
    }
}

pub(super) fn persist_widgets(
    host: DesktopHostContext,
    runtime: DesktopRuntimeContext,
) -> Option<HostTask> {
    let state = runtime.state.get_untracked();
    if !state.boot_hydrated {
        return None;
    }
    match persistence::encode_widgets(&state.widgets) {
        Ok(encoded) => write_if_changed(host, WIDGETS_KEY, encoded),
        Err(err) => {
            logging::warn!("{err}");
            None
        }
    }
}

pub(super) fn clear_session(host: DesktopHostContext) -> HostTask {
    host.deduper().borrow_mut().reset();
    Box::pin(async move {
        if let Err(err) = persistence::clear_session(host.durable.as_ref()).await {
            logging::warn!("{err}");
        }
    })
}
