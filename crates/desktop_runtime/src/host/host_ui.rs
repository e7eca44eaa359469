use leptos::SignalUpdate;

use crate::{
    model::WindowRect, notifications::NotificationLevel, runtime_context::DesktopRuntimeContext,
};

pub(super) fn notify(
    runtime: DesktopRuntimeContext,
    level: NotificationLevel,
    title: String,
    body: String,
) {
    runtime.notifications.update(|center| {
        center.push(level, title, body);
    });
}

pub(super) fn desktop_viewport_rect(taskbar_height_px: i32) -> WindowRect {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let width = window
                .inner_width()
                .ok()
                .and_then(|value| value.as_f64())
                .map(|value| value as i32)
                .unwrap_or(1024);
            let height = window
                .inner_height()
                .ok()
                .and_then(|value| value.as_f64())
                .map(|value| value as i32)
                .unwrap_or(768);

            return WindowRect {
                x: 0,
                y: 0,
                w: width.max(320),
                h: (height - taskbar_height_px).max(220),
            };
        }
    }

    WindowRect {
        x: 0,
        y: 0,
        w: 1024,
        h: 768 - taskbar_height_px,
    }
}
