use leptos::logging;

use crate::{
    host::{DesktopHostContext, HostTask},
    model::WindowId,
    reducer::DesktopAction,
    runtime_context::DesktopRuntimeContext,
};

/// Fetches metadata for a URL-backed window and reports back with the issuing token.
pub(super) fn load(
    host: DesktopHostContext,
    runtime: DesktopRuntimeContext,
    window_id: WindowId,
    load_token: u64,
    url: String,
) -> HostTask {
    Box::pin(async move {
        let action = match host.remote_apps.fetch_metadata(&url).await {
            Ok(metadata) => DesktopAction::RemoteContentLoaded {
                window_id,
                load_token,
                metadata: metadata.unwrap_or_default(),
            },
            Err(error) => {
                logging::warn!("remote metadata for `{url}` failed: {error}");
                DesktopAction::RemoteContentFailed {
                    window_id,
                    load_token,
                    error,
                }
            }
        };
        runtime.dispatch_action(action);
    })
}
