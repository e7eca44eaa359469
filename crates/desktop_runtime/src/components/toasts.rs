//! Toast stack and taskbar badge fed by the runtime notification queue.

use std::time::Duration;

use super::*;
use crate::notifications::Notification;

const TOAST_TIMEOUT: Duration = Duration::from_secs(6);

fn badge_label(count: usize) -> Option<String> {
    match count {
        0 => None,
        1..=9 => Some(count.to_string()),
        _ => Some("9+".to_string()),
    }
}

#[component]
pub(super) fn ToastStack() -> impl IntoView {
    let runtime = use_desktop_runtime();

    view! {
        <div
            class="toast-stack"
            role="region"
            aria-label="Notifications"
            aria-live="polite"
            style=format!("position:absolute;right:12px;bottom:{}px;z-index:3;", TASKBAR_HEIGHT_PX + 8)
        >
            <For
                each=move || runtime.notifications.with(|center| center.entries().to_vec())
                key=|notification| notification.id
                let:notification
            >
                <Toast notification />
            </For>
        </div>
    }
}

#[component]
fn Toast(notification: Notification) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let id = notification.id;
    let dismiss = move || {
        runtime.notifications.update(|center| {
            center.dismiss(id);
        });
    };

    if let Ok(timer) = set_timeout_with_handle(dismiss, TOAST_TIMEOUT) {
        on_cleanup(move || timer.clear());
    }

    view! {
        <div class=notification.level.css_class() role="status">
            <strong class="toast-title">{notification.title}</strong>
            <p class="toast-body">{notification.body}</p>
            <button
                class="toast-dismiss"
                aria-label="Dismiss notification"
                on:click=move |_| dismiss()
            >
                "×"
            </button>
        </div>
    }
}

/// Counts undismissed toasts; a click clears them all.
#[component]
pub(super) fn NotificationBadge() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let label = move || runtime.notifications.with(|center| badge_label(center.len()));

    view! {
        <button
            class="taskbar-notifications"
            aria-label=move || {
                format!(
                    "Notifications: {}",
                    runtime.notifications.with(|center| center.len())
                )
            }
            on:click=move |_| runtime.notifications.update(|center| center.clear())
        >
            "🔔"
            {move || label().map(|text| view! { <span class="taskbar-badge">{text}</span> })}
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn badge_hides_when_empty_and_caps_at_nine() {
        assert_eq!(badge_label(0), None);
        assert_eq!(badge_label(3), Some("3".to_string()));
        assert_eq!(badge_label(12), Some("9+".to_string()));
    }
}
