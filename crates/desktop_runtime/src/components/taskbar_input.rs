//! Global desktop keyboard shortcuts.

use leptos::SignalGetUntracked;

use super::{DesktopAction, DesktopRuntimeContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TaskbarShortcut {
    ToggleStartMenu,
    /// Zero-based position in the taskbar (collection order).
    ActivateWindow(usize),
    Dismiss,
}

fn shortcut_digit_index(key: &str) -> Option<usize> {
    match key {
        "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9" => {
            key.parse::<usize>().ok().map(|digit| digit - 1)
        }
        _ => None,
    }
}

/// Maps a key plus modifier state to a shortcut.
pub(super) fn taskbar_shortcut(key: &str, ctrl: bool, alt: bool, meta: bool) -> Option<TaskbarShortcut> {
    if ctrl && !alt && !meta && key == "Escape" {
        return Some(TaskbarShortcut::ToggleStartMenu);
    }
    if alt && !ctrl && !meta {
        if let Some(index) = shortcut_digit_index(key) {
            return Some(TaskbarShortcut::ActivateWindow(index));
        }
    }
    if !ctrl && !alt && !meta && key == "Escape" {
        return Some(TaskbarShortcut::Dismiss);
    }
    None
}

/// Handles desktop-global shortcuts and reports whether the event was consumed.
pub(super) fn try_handle_taskbar_shortcuts(
    runtime: DesktopRuntimeContext,
    ev: &web_sys::KeyboardEvent,
) -> bool {
    let Some(shortcut) = taskbar_shortcut(&ev.key(), ev.ctrl_key(), ev.alt_key(), ev.meta_key())
    else {
        return false;
    };

    let desktop = runtime.state.get_untracked();
    let action = match shortcut {
        TaskbarShortcut::ToggleStartMenu => Some(DesktopAction::ToggleStartMenu),
        TaskbarShortcut::ActivateWindow(index) => desktop
            .windows
            .get(index)
            .map(|win| DesktopAction::ToggleTaskbarWindow {
                window_id: win.id.clone(),
            }),
        TaskbarShortcut::Dismiss if desktop.start_menu_open => Some(DesktopAction::CloseStartMenu),
        TaskbarShortcut::Dismiss => None,
    };
    let Some(action) = action else {
        return false;
    };

    ev.prevent_default();
    ev.stop_propagation();
    if matches!(shortcut, TaskbarShortcut::ActivateWindow(_)) && desktop.start_menu_open {
        runtime.dispatch_action(DesktopAction::CloseStartMenu);
    }
    runtime.dispatch_action(action);
    true
}
