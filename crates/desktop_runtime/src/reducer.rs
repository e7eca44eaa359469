//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use platform_host::{next_unique_timestamp_ms, RemoteAppMetadata};
use thiserror::Error;

use crate::{
    apps,
    content::ContentFactory,
    model::{
        DesktopSnapshot, DesktopState, OpenWindowRequest, PointerDelta, ResizeEdge, UrlWindowSpec,
        WidgetRecord, WindowId, WindowRecord, WindowRect, DEFAULT_WINDOW_HEIGHT,
        DEFAULT_WINDOW_WIDTH, URL_WINDOW_ID_PREFIX, WIDGET_Z_INDEX_BASELINE,
    },
    notifications::NotificationLevel,
    window_manager::{
        clamp_rect_to_viewport, focus_window_internal, hand_off_focus, next_window_z,
        normalize_focus, raise_widget, renormalize_z_order, resize_rect_clamped,
        MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
    },
};

/// Nominal widget footprint used when pulling a dragged widget back into view.
pub const WIDGET_WIDTH: i32 = 220;
pub const WIDGET_HEIGHT: i32 = 160;
const URL_WINDOW_WIDTH: i32 = 900;
const URL_WINDOW_HEIGHT: i32 = 600;
const URL_WINDOW_FALLBACK_ICON: &str = "🌐";

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a new window using the supplied request.
    OpenWindow(OpenWindowRequest),
    /// Open a new window for a registry app.
    OpenApp {
        /// Registry id of the app.
        app_id: String,
    },
    /// Open a window hosting an embedded remote app.
    OpenUrlWindow(UrlWindowSpec),
    /// Close a window by id.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Close every window matching `tag` (see [`window_matches_tag`]).
    CloseWindowsByTag {
        /// Id, id prefix, app key or title to match.
        tag: String,
    },
    /// Replace a window's geometry without bounds checks.
    SetWindowGeometry {
        /// Window to update.
        window_id: WindowId,
        /// New geometry.
        rect: WindowRect,
    },
    /// Focus (and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Minimize a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Un-minimize (or un-maximize) a window and focus it.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Maximize a window to the provided viewport.
    MaximizeWindow {
        /// Window to maximize.
        window_id: WindowId,
        /// Viewport rectangle to maximize into.
        viewport: WindowRect,
    },
    /// Toggle taskbar behavior for a window (focus, minimize, or restore).
    ToggleTaskbarWindow {
        /// Window associated with the taskbar button.
        window_id: WindowId,
    },
    /// Move a window within the collection (taskbar order). Z-order is untouched.
    ReorderWindows {
        /// Current collection index.
        from: usize,
        /// Target collection index.
        to: usize,
    },
    /// Apply an incremental drag delta to a window.
    MoveWindowBy {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer movement since the previous move.
        delta: PointerDelta,
    },
    /// Apply an incremental resize delta to a window edge.
    ResizeWindowBy {
        /// Window being resized.
        window_id: WindowId,
        /// Edge or corner being dragged.
        edge: ResizeEdge,
        /// Pointer movement since the previous move.
        delta: PointerDelta,
    },
    /// End a window drag or resize.
    EndWindowInteraction {
        /// Window that was being dragged or resized.
        window_id: WindowId,
        /// Current desktop viewport, used for drag-end clamping.
        viewport: Option<WindowRect>,
    },
    /// Remote metadata arrived for a URL-backed window.
    RemoteContentLoaded {
        /// Window the load was started for.
        window_id: WindowId,
        /// Token issued when the load started.
        load_token: u64,
        /// Fetched metadata.
        metadata: RemoteAppMetadata,
    },
    /// Remote metadata could not be fetched for a URL-backed window.
    RemoteContentFailed {
        /// Window the load was started for.
        window_id: WindowId,
        /// Token issued when the load started.
        load_token: u64,
        /// Failure description.
        error: String,
    },
    /// Add a widget instance from the widget registry.
    LaunchWidget {
        /// Registry id of the widget.
        widget_id: String,
    },
    /// Remove a widget instance.
    RemoveWidget {
        /// Instance id.
        id: String,
    },
    /// Raise a widget above the others.
    FocusWidget {
        /// Instance id.
        id: String,
    },
    /// Apply an incremental drag delta to a widget.
    MoveWidgetBy {
        /// Instance id.
        id: String,
        /// Pointer movement since the previous move.
        delta: PointerDelta,
    },
    /// End a widget drag.
    EndWidgetDrag {
        /// Instance id.
        id: String,
        /// Current desktop viewport, used for drag-end clamping.
        viewport: Option<WindowRect>,
    },
    /// Toggle the start menu open/closed.
    ToggleStartMenu,
    /// Close the start menu if open.
    CloseStartMenu,
    /// Drop every window and widget and clear the durable session.
    ClearSession,
    /// Hydrate runtime state from a rehydrated snapshot.
    HydrateSnapshot {
        /// Snapshot payload to restore.
        snapshot: DesktopSnapshot,
    },
    /// Boot hydration finished; persistence may start writing.
    BootHydrationComplete,
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the host layer to execute.
pub enum RuntimeEffect {
    /// Persist the window collection.
    PersistWindows,
    /// Persist the widget collection.
    PersistWidgets,
    /// Fetch remote metadata for a freshly opened URL-backed window.
    LoadRemoteContent {
        /// Window awaiting content.
        window_id: WindowId,
        /// Token the result must echo back.
        load_token: u64,
        /// Remote app location.
        url: String,
    },
    /// Remove the persisted session from durable storage.
    ClearPersistedSession,
    /// Show a toast in the shell.
    Notify {
        level: NotificationLevel,
        title: String,
        body: String,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions (for example, referencing a missing window).
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window `{0}` not found")]
    WindowNotFound(WindowId),
    /// The target widget instance was not found in the current state.
    #[error("widget `{0}` not found")]
    WidgetNotFound(String),
    /// No registry app has the requested id.
    #[error("unknown app `{0}`")]
    UnknownApp(String),
    /// No registry widget has the requested id.
    #[error("unknown widget `{0}`")]
    UnknownWidget(String),
    /// Reorder indices fall outside the window collection.
    #[error("cannot move window {from} to {to} in a collection of {len}")]
    InvalidReorder {
        /// Requested source index.
        from: usize,
        /// Requested target index.
        to: usize,
        /// Collection length.
        len: usize,
    },
}

/// Applies a [`DesktopAction`] to the desktop state and collects resulting side effects.
///
/// Persistence effects are derived from what changed: any action that alters the window or widget
/// collections requests a write, except in-progress drags and resizes (persisted when the
/// interaction ends), hydration, and session clearing.
///
/// # Errors
///
/// Returns a [`ReducerError`] when an action references a missing window, widget or registry
/// entry. The state is left untouched in that case only if the caller reduces a clone, which is
/// how the runtime dispatcher uses it.
pub fn reduce_desktop(
    state: &mut DesktopState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let windows_before = state.windows.clone();
    let widgets_before = state.widgets.clone();
    let mut effects = Vec::new();
    let mut derive_persistence = true;

    match action {
        DesktopAction::OpenWindow(req) => {
            open_window(state, req);
        }
        DesktopAction::OpenApp { app_id } => {
            let req = apps::default_open_request(&app_id).ok_or(ReducerError::UnknownApp(app_id))?;
            open_window(state, req);
        }
        DesktopAction::OpenUrlWindow(spec) => {
            let window_id = WindowId::new(format!(
                "{URL_WINDOW_ID_PREFIX}{}-{}",
                spec.id,
                next_unique_timestamp_ms()
            ));
            let load_token = state.next_load_token;
            state.next_load_token = state.next_load_token.saturating_add(1);
            let offset = cascade_offset(state.next_window_seq);
            state.next_window_seq = state.next_window_seq.saturating_add(1);
            let record = WindowRecord {
                id: window_id.clone(),
                title: spec.name,
                icon: spec
                    .icon
                    .unwrap_or_else(|| URL_WINDOW_FALLBACK_ICON.to_string()),
                app: None,
                url: Some(spec.url.clone()),
                rect: WindowRect::new(
                    80 + offset,
                    80 + offset,
                    URL_WINDOW_WIDTH,
                    URL_WINDOW_HEIGHT,
                ),
                z_index: 0,
                minimized: false,
                is_focused: false,
                maximized: false,
                restore_rect: None,
                content: Some(ContentFactory::loading(&spec.url)),
                load_token: Some(load_token),
            };
            push_focused(state, record);
            effects.push(RuntimeEffect::LoadRemoteContent {
                window_id,
                load_token,
                url: spec.url,
            });
        }
        DesktopAction::CloseWindow { window_id } => {
            let index = window_index(state, &window_id)?;
            state.windows.remove(index);
            hand_off_focus(state);
        }
        DesktopAction::CloseWindowsByTag { tag } => {
            state.windows.retain(|w| !window_matches_tag(w, &tag));
            hand_off_focus(state);
        }
        DesktopAction::SetWindowGeometry { window_id, rect } => {
            find_window_mut(state, &window_id)?.rect = rect;
        }
        DesktopAction::FocusWindow { window_id } => {
            focus_existing(state, &window_id)?;
            state.start_menu_open = false;
        }
        DesktopAction::MinimizeWindow { window_id } => {
            let window = find_window_mut(state, &window_id)?;
            window.minimized = true;
            window.is_focused = false;
            hand_off_focus(state);
        }
        DesktopAction::RestoreWindow { window_id } => {
            let window = find_window_mut(state, &window_id)?;
            if !window.minimized && window.maximized {
                if let Some(restore_rect) = window.restore_rect.take() {
                    window.rect = restore_rect;
                }
                window.maximized = false;
            }
            focus_existing(state, &window_id)?;
        }
        DesktopAction::MaximizeWindow {
            window_id,
            viewport,
        } => {
            let window = find_window_mut(state, &window_id)?;
            if !window.maximized {
                window.restore_rect = Some(window.rect);
            }
            window.rect = viewport.clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
            window.maximized = true;
            focus_existing(state, &window_id)?;
        }
        DesktopAction::ToggleTaskbarWindow { window_id } => {
            let window = find_window_mut(state, &window_id)?;
            if window.minimized {
                focus_existing(state, &window_id)?;
            } else if window.is_focused {
                window.minimized = true;
                window.is_focused = false;
                hand_off_focus(state);
            } else {
                focus_existing(state, &window_id)?;
            }
            state.start_menu_open = false;
        }
        DesktopAction::ReorderWindows { from, to } => {
            let len = state.windows.len();
            if from >= len || to >= len {
                return Err(ReducerError::InvalidReorder { from, to, len });
            }
            let window = state.windows.remove(from);
            state.windows.insert(to, window);
        }
        DesktopAction::MoveWindowBy { window_id, delta } => {
            let window = find_window_mut(state, &window_id)?;
            if !window.maximized {
                window.rect = window.rect.offset(delta.dx, delta.dy);
            }
            derive_persistence = false;
        }
        DesktopAction::ResizeWindowBy {
            window_id,
            edge,
            delta,
        } => {
            let window = find_window_mut(state, &window_id)?;
            if !window.maximized {
                window.rect = resize_rect_clamped(window.rect, edge, delta.dx, delta.dy);
            }
            derive_persistence = false;
        }
        DesktopAction::EndWindowInteraction {
            window_id,
            viewport,
        } => {
            let clamp = state.preferences.clamp_on_drag_end;
            let window = find_window_mut(state, &window_id)?;
            if let (true, Some(viewport), false) = (clamp, viewport, window.maximized) {
                window.rect = clamp_rect_to_viewport(window.rect, viewport);
            }
            effects.push(RuntimeEffect::PersistWindows);
        }
        DesktopAction::RemoteContentLoaded {
            window_id,
            load_token,
            metadata,
        } => {
            if let Some(window) = pending_load_mut(state, &window_id, load_token) {
                if let Some(name) = metadata.name {
                    window.title = name;
                }
                if let Some(icon) = metadata.icon {
                    window.icon = icon;
                }
                settle_embedded_frame(window);
            }
        }
        DesktopAction::RemoteContentFailed {
            window_id,
            load_token,
            error,
        } => {
            if let Some(window) = pending_load_mut(state, &window_id, load_token) {
                settle_embedded_frame(window);
                effects.push(RuntimeEffect::Notify {
                    level: NotificationLevel::Error,
                    title: window.title.clone(),
                    body: format!("App details could not be loaded: {error}"),
                });
            }
        }
        DesktopAction::LaunchWidget { widget_id } => {
            let descriptor = apps::widget_descriptor(&widget_id)
                .ok_or_else(|| ReducerError::UnknownWidget(widget_id.clone()))?;
            let seq = state.next_window_seq;
            state.next_window_seq = state.next_window_seq.saturating_add(1);
            let offset = cascade_offset(seq);
            let id = format!(
                "{}-{}-{seq}",
                descriptor.widget_id,
                next_unique_timestamp_ms()
            );
            state.widgets.push(WidgetRecord {
                id: id.clone(),
                widget_id: descriptor.widget_id.to_string(),
                x: 160 + offset,
                y: 120 + offset,
                z_index: 0,
            });
            raise_widget(&mut state.widgets, &id);
            state.start_menu_open = false;
        }
        DesktopAction::RemoveWidget { id } => {
            let before = state.widgets.len();
            state.widgets.retain(|w| w.id != id);
            if state.widgets.len() == before {
                return Err(ReducerError::WidgetNotFound(id));
            }
        }
        DesktopAction::FocusWidget { id } => {
            if !raise_widget(&mut state.widgets, &id) {
                return Err(ReducerError::WidgetNotFound(id));
            }
        }
        DesktopAction::MoveWidgetBy { id, delta } => {
            let widget = find_widget_mut(state, &id)?;
            widget.x += delta.dx;
            widget.y += delta.dy;
            derive_persistence = false;
        }
        DesktopAction::EndWidgetDrag { id, viewport } => {
            let clamp = state.preferences.clamp_on_drag_end;
            let widget = find_widget_mut(state, &id)?;
            if let (true, Some(viewport)) = (clamp, viewport) {
                let rect = clamp_rect_to_viewport(
                    WindowRect::new(widget.x, widget.y, WIDGET_WIDTH, WIDGET_HEIGHT),
                    viewport,
                );
                widget.x = rect.x;
                widget.y = rect.y;
            }
            effects.push(RuntimeEffect::PersistWidgets);
        }
        DesktopAction::ToggleStartMenu => {
            state.start_menu_open = !state.start_menu_open;
        }
        DesktopAction::CloseStartMenu => {
            state.start_menu_open = false;
        }
        DesktopAction::ClearSession => {
            state.windows.clear();
            state.widgets.clear();
            state.start_menu_open = false;
            effects.push(RuntimeEffect::ClearPersistedSession);
            derive_persistence = false;
        }
        DesktopAction::HydrateSnapshot { snapshot } => {
            hydrate_snapshot(state, snapshot);
            derive_persistence = false;
        }
        DesktopAction::BootHydrationComplete => {
            state.boot_hydrated = true;
        }
    }

    normalize_focus(state);

    if derive_persistence {
        if state.windows != windows_before && !effects.contains(&RuntimeEffect::PersistWindows) {
            effects.push(RuntimeEffect::PersistWindows);
        }
        if state.widgets != widgets_before && !effects.contains(&RuntimeEffect::PersistWidgets) {
            effects.push(RuntimeEffect::PersistWidgets);
        }
    }
    Ok(effects)
}

/// Close-by-tag predicate: exact id, `"<tag>-"` id prefix, app key, or case-insensitive title.
pub fn window_matches_tag(window: &WindowRecord, tag: &str) -> bool {
    if tag.is_empty() {
        return false;
    }
    let id = window.id.as_str();
    id == tag
        || id
            .strip_prefix(tag)
            .is_some_and(|rest| rest.starts_with('-'))
        || window.app.as_deref() == Some(tag)
        || window.title.eq_ignore_ascii_case(tag)
}

fn open_window(state: &mut DesktopState, req: OpenWindowRequest) -> WindowId {
    let seq = state.next_window_seq;
    state.next_window_seq = state.next_window_seq.saturating_add(1);
    let prefix = req.app.as_deref().unwrap_or("window");
    let window_id = WindowId::new(format!("{prefix}-{}-{seq}", next_unique_timestamp_ms()));
    let offset = cascade_offset(seq);
    let rect = req
        .rect
        .or_else(|| {
            req.app
                .as_deref()
                .and_then(apps::app_descriptor)
                .map(|entry| entry.default_rect)
        })
        .unwrap_or(WindowRect {
            x: 40 + offset,
            y: 48 + offset,
            w: DEFAULT_WINDOW_WIDTH,
            h: DEFAULT_WINDOW_HEIGHT,
        })
        .clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
    let record = WindowRecord {
        id: window_id.clone(),
        title: req.title,
        icon: req.icon,
        app: req.app,
        url: req.url,
        rect,
        z_index: 0,
        minimized: false,
        is_focused: false,
        maximized: false,
        restore_rect: None,
        content: Some(req.content),
        load_token: None,
    };
    push_focused(state, record);
    window_id
}

/// Restores the snapshot while keeping windows and widgets opened before boot finished.
///
/// Those late arrivals are stacked above the restored layout so they stay where the user left
/// them; an id already present in the snapshot wins.
fn hydrate_snapshot(state: &mut DesktopState, snapshot: DesktopSnapshot) {
    let early_windows = std::mem::replace(&mut state.windows, snapshot.windows);
    let early_widgets = std::mem::replace(&mut state.widgets, snapshot.widgets);

    for mut window in early_windows {
        if state.windows.iter().any(|w| w.id == window.id) {
            continue;
        }
        if window.is_focused {
            for restored in &mut state.windows {
                restored.is_focused = false;
            }
        }
        window.z_index = next_window_z(state);
        state.windows.push(window);
    }

    for mut widget in early_widgets {
        if state.widgets.iter().any(|w| w.id == widget.id) {
            continue;
        }
        widget.z_index = state
            .widgets
            .iter()
            .map(|w| w.z_index)
            .max()
            .unwrap_or(0)
            .max(WIDGET_Z_INDEX_BASELINE)
            .saturating_add(1);
        state.widgets.push(widget);
    }
}

fn push_focused(state: &mut DesktopState, mut record: WindowRecord) {
    renormalize_z_order(state);
    record.z_index = next_window_z(state);
    record.is_focused = true;
    for window in &mut state.windows {
        window.is_focused = false;
    }
    state.windows.push(record);
    state.start_menu_open = false;
}

fn cascade_offset(seq: u64) -> i32 {
    (seq.saturating_sub(1) % 8) as i32 * 24
}

fn settle_embedded_frame(window: &mut WindowRecord) {
    window.load_token = None;
    if let Some(url) = window.url.as_deref() {
        window.content = Some(ContentFactory::embedded_frame(url, &window.title));
    }
}

/// Late results for closed windows, or for ids reused by a newer load, are discarded.
fn pending_load_mut<'a>(
    state: &'a mut DesktopState,
    window_id: &WindowId,
    load_token: u64,
) -> Option<&'a mut WindowRecord> {
    state
        .windows
        .iter_mut()
        .find(|w| &w.id == window_id && w.load_token == Some(load_token))
}

fn window_index(state: &DesktopState, window_id: &WindowId) -> Result<usize, ReducerError> {
    state
        .windows
        .iter()
        .position(|w| &w.id == window_id)
        .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))
}

fn find_window_mut<'a>(
    state: &'a mut DesktopState,
    window_id: &WindowId,
) -> Result<&'a mut WindowRecord, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| &w.id == window_id)
        .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))
}

fn find_widget_mut<'a>(
    state: &'a mut DesktopState,
    id: &str,
) -> Result<&'a mut WidgetRecord, ReducerError> {
    state
        .widgets
        .iter_mut()
        .find(|w| w.id == id)
        .ok_or_else(|| ReducerError::WidgetNotFound(id.to_string()))
}

fn focus_existing(state: &mut DesktopState, window_id: &WindowId) -> Result<(), ReducerError> {
    if focus_window_internal(state, window_id) {
        Ok(())
    } else {
        Err(ReducerError::WindowNotFound(window_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{content::WindowContent, model::Z_INDEX_BASELINE};

    fn reduce(state: &mut DesktopState, action: DesktopAction) -> Vec<RuntimeEffect> {
        reduce_desktop(state, action).expect("reduce")
    }

    fn open(state: &mut DesktopState, app_id: &str) -> WindowId {
        reduce(
            state,
            DesktopAction::OpenApp {
                app_id: app_id.to_string(),
            },
        );
        state.windows.last().expect("window").id.clone()
    }

    fn window<'a>(state: &'a DesktopState, id: &WindowId) -> &'a WindowRecord {
        state.window(id).expect("window present")
    }

    fn max_z(state: &DesktopState) -> u32 {
        state.windows.iter().map(|w| w.z_index).max().unwrap_or(0)
    }

    fn focused_non_minimized(state: &DesktopState) -> usize {
        state
            .windows
            .iter()
            .filter(|w| w.is_focused && !w.minimized)
            .count()
    }

    fn url_spec() -> UrlWindowSpec {
        UrlWindowSpec {
            id: "chess".to_string(),
            name: "Chess".to_string(),
            icon: None,
            url: "https://chess.example".to_string(),
        }
    }

    #[test]
    fn open_window_focuses_new_window_and_raises_it() {
        let mut state = DesktopState::default();

        let first = open(&mut state, "explorer");
        let second = open(&mut state, "terminal");

        assert_eq!(state.focused_window_id(), Some(second.clone()));
        assert_eq!(window(&state, &first).z_index, Z_INDEX_BASELINE + 1);
        assert_eq!(window(&state, &second).z_index, Z_INDEX_BASELINE + 2);
        assert!(second.as_str().starts_with("terminal-"));
        assert_eq!(
            window(&state, &second).rect,
            WindowRect::new(320, 170, 420, 260)
        );
    }

    #[test]
    fn open_window_without_geometry_cascades_defaults() {
        let mut state = DesktopState::default();
        let req = OpenWindowRequest::new("Scratch", "🧪", ContentFactory::app("scratch"));
        let effects = reduce(&mut state, DesktopAction::OpenWindow(req));

        let record = &state.windows[0];
        assert_eq!(record.rect, WindowRect::new(40, 48, 640, 480));
        assert!(record.id.as_str().starts_with("window-"));
        assert_eq!(effects, vec![RuntimeEffect::PersistWindows]);
    }

    #[test]
    fn focus_exclusivity_holds_across_mixed_sequences() {
        let mut state = DesktopState::default();
        let a = open(&mut state, "explorer");
        let b = open(&mut state, "terminal");
        let c = open(&mut state, "settings");
        let steps = vec![
            DesktopAction::FocusWindow { window_id: a.clone() },
            DesktopAction::MinimizeWindow { window_id: a.clone() },
            DesktopAction::FocusWindow { window_id: b.clone() },
            DesktopAction::MinimizeWindow { window_id: c.clone() },
            DesktopAction::RestoreWindow { window_id: a.clone() },
            DesktopAction::ToggleTaskbarWindow { window_id: a.clone() },
            DesktopAction::ToggleTaskbarWindow { window_id: c.clone() },
            DesktopAction::CloseWindow { window_id: c },
        ];
        for step in steps {
            reduce(&mut state, step);
            assert!(focused_non_minimized(&state) <= 1);
            assert!(state
                .windows
                .iter()
                .all(|w| !(w.minimized && w.is_focused)));
        }
    }

    #[test]
    fn focus_raises_strictly_above_previous_max() {
        let mut state = DesktopState::default();
        let a = open(&mut state, "explorer");
        let _b = open(&mut state, "terminal");
        let before = max_z(&state);

        reduce(&mut state, DesktopAction::FocusWindow { window_id: a.clone() });

        assert_eq!(window(&state, &a).z_index, max_z(&state));
        assert!(max_z(&state) > before);
    }

    #[test]
    fn focusing_already_focused_top_window_changes_nothing() {
        let mut state = DesktopState::default();
        let _a = open(&mut state, "explorer");
        let b = open(&mut state, "terminal");
        let before = state.clone();

        let effects = reduce(&mut state, DesktopAction::FocusWindow { window_id: b });

        assert_eq!(state, before);
        assert!(effects.is_empty());
    }

    #[test]
    fn closing_focused_window_hands_focus_to_topmost_remaining() {
        let mut state = DesktopState::default();
        let a = open(&mut state, "explorer");
        let b = open(&mut state, "terminal");
        let c = open(&mut state, "settings");
        reduce(&mut state, DesktopAction::MinimizeWindow { window_id: b });

        reduce(&mut state, DesktopAction::CloseWindow { window_id: c });

        assert_eq!(state.focused_window_id(), Some(a));
    }

    #[test]
    fn closing_missing_window_is_an_error() {
        let mut state = DesktopState::default();
        let err = reduce_desktop(
            &mut state,
            DesktopAction::CloseWindow {
                window_id: WindowId::new("ghost"),
            },
        )
        .expect_err("missing window");
        assert_eq!(err, ReducerError::WindowNotFound(WindowId::new("ghost")));
    }

    #[test]
    fn taskbar_toggle_minimizes_if_focused_and_restores_if_minimized() {
        let mut state = DesktopState::default();
        let win = open(&mut state, "explorer");

        reduce(
            &mut state,
            DesktopAction::ToggleTaskbarWindow {
                window_id: win.clone(),
            },
        );
        assert!(window(&state, &win).minimized);
        assert!(!window(&state, &win).is_focused);

        reduce(
            &mut state,
            DesktopAction::ToggleTaskbarWindow {
                window_id: win.clone(),
            },
        );
        assert!(!window(&state, &win).minimized);
        assert!(window(&state, &win).is_focused);
    }

    #[test]
    fn maximize_then_restore_returns_previous_geometry() {
        let mut state = DesktopState::default();
        let win = open(&mut state, "terminal");
        let original = window(&state, &win).rect;
        let viewport = WindowRect::new(0, 0, 1200, 760);

        reduce(
            &mut state,
            DesktopAction::MaximizeWindow {
                window_id: win.clone(),
                viewport,
            },
        );
        assert_eq!(window(&state, &win).rect, viewport);
        assert!(window(&state, &win).maximized);

        reduce(
            &mut state,
            DesktopAction::RestoreWindow {
                window_id: win.clone(),
            },
        );
        assert_eq!(window(&state, &win).rect, original);
        assert!(!window(&state, &win).maximized);
    }

    #[test]
    fn close_by_tag_matches_id_prefix_app_and_title() {
        let mut state = DesktopState::default();
        let settings = open(&mut state, "settings");
        let terminal = open(&mut state, "terminal");
        reduce(
            &mut state,
            DesktopAction::OpenWindow(OpenWindowRequest::new(
                "SETTINGS",
                "⚙️",
                ContentFactory::app("settings"),
            )),
        );

        reduce(
            &mut state,
            DesktopAction::CloseWindowsByTag {
                tag: "settings".to_string(),
            },
        );

        let ids: Vec<_> = state.windows.iter().map(|w| w.id.clone()).collect();
        assert_eq!(ids, vec![terminal.clone()]);
        assert!(state.window(&settings).is_none());
        assert_eq!(state.focused_window_id(), Some(terminal));
    }

    #[test]
    fn close_by_tag_with_no_match_is_a_silent_noop() {
        let mut state = DesktopState::default();
        open(&mut state, "terminal");
        let before = state.clone();
        let effects = reduce(
            &mut state,
            DesktopAction::CloseWindowsByTag {
                tag: "term".to_string(),
            },
        );
        assert_eq!(state, before);
        assert!(effects.is_empty());
    }

    #[test]
    fn reorder_moves_collection_position_without_touching_z() {
        let mut state = DesktopState::default();
        let a = open(&mut state, "explorer");
        let b = open(&mut state, "terminal");
        let c = open(&mut state, "settings");
        let z_before: Vec<_> = state.windows.iter().map(|w| w.z_index).collect();

        reduce(&mut state, DesktopAction::ReorderWindows { from: 2, to: 0 });

        let ids: Vec<_> = state.windows.iter().map(|w| w.id.clone()).collect();
        assert_eq!(ids, vec![c, a, b]);
        let mut z_after: Vec<_> = state.windows.iter().map(|w| w.z_index).collect();
        z_after.rotate_left(1);
        assert_eq!(z_after, z_before);

        let err = reduce_desktop(&mut state, DesktopAction::ReorderWindows { from: 0, to: 3 })
            .expect_err("out of range");
        assert_eq!(
            err,
            ReducerError::InvalidReorder {
                from: 0,
                to: 3,
                len: 3
            }
        );
    }

    #[test]
    fn drag_moves_do_not_persist_until_interaction_ends() {
        let mut state = DesktopState::default();
        let win = open(&mut state, "terminal");
        let original = window(&state, &win).rect;

        for (dx, dy) in [(5, 2), (5, 6)] {
            let effects = reduce(
                &mut state,
                DesktopAction::MoveWindowBy {
                    window_id: win.clone(),
                    delta: PointerDelta { dx, dy },
                },
            );
            assert!(effects.is_empty());
        }
        assert_eq!(window(&state, &win).rect, original.offset(10, 8));

        let effects = reduce(
            &mut state,
            DesktopAction::EndWindowInteraction {
                window_id: win,
                viewport: Some(WindowRect::new(0, 0, 1200, 760)),
            },
        );
        assert_eq!(effects, vec![RuntimeEffect::PersistWindows]);
    }

    #[test]
    fn drag_end_clamps_off_screen_windows_when_enabled() {
        let mut state = DesktopState::default();
        let win = open(&mut state, "terminal");
        reduce(
            &mut state,
            DesktopAction::SetWindowGeometry {
                window_id: win.clone(),
                rect: WindowRect::new(5000, -300, 420, 260),
            },
        );
        let viewport = WindowRect::new(0, 0, 1000, 700);

        let mut unclamped = state.clone();
        unclamped.preferences.clamp_on_drag_end = false;
        reduce(
            &mut unclamped,
            DesktopAction::EndWindowInteraction {
                window_id: win.clone(),
                viewport: Some(viewport),
            },
        );
        assert_eq!(window(&unclamped, &win).rect.x, 5000);

        reduce(
            &mut state,
            DesktopAction::EndWindowInteraction {
                window_id: win.clone(),
                viewport: Some(viewport),
            },
        );
        assert_eq!(window(&state, &win).rect, WindowRect::new(952, 0, 420, 260));
    }

    #[test]
    fn url_window_opens_loading_and_settles_with_metadata() {
        let mut state = DesktopState::default();
        let effects = reduce(&mut state, DesktopAction::OpenUrlWindow(url_spec()));

        let record = state.windows[0].clone();
        assert!(record.id.is_url_backed());
        assert!(record.id.as_str().starts_with("pwa-chess-"));
        assert_eq!(
            record.content.as_ref().expect("content").produce(),
            Ok(WindowContent::Loading {
                url: "https://chess.example".to_string()
            })
        );
        let load_token = record.load_token.expect("load in flight");
        assert_eq!(
            effects[0],
            RuntimeEffect::LoadRemoteContent {
                window_id: record.id.clone(),
                load_token,
                url: "https://chess.example".to_string(),
            }
        );

        reduce(
            &mut state,
            DesktopAction::RemoteContentLoaded {
                window_id: record.id.clone(),
                load_token,
                metadata: RemoteAppMetadata {
                    name: Some("Chess Deluxe".to_string()),
                    icon: Some("♟️".to_string()),
                },
            },
        );
        let settled = window(&state, &record.id);
        assert_eq!(settled.title, "Chess Deluxe");
        assert_eq!(settled.icon, "♟️");
        assert_eq!(settled.load_token, None);
        assert!(matches!(
            settled.content.as_ref().expect("content").produce(),
            Ok(WindowContent::EmbeddedFrame { .. })
        ));
    }

    #[test]
    fn late_load_for_closed_window_is_discarded() {
        let mut state = DesktopState::default();
        reduce(&mut state, DesktopAction::OpenUrlWindow(url_spec()));
        let record = state.windows[0].clone();
        let load_token = record.load_token.expect("load in flight");
        reduce(
            &mut state,
            DesktopAction::CloseWindow {
                window_id: record.id.clone(),
            },
        );
        let before = state.clone();

        let effects = reduce(
            &mut state,
            DesktopAction::RemoteContentLoaded {
                window_id: record.id.clone(),
                load_token,
                metadata: RemoteAppMetadata::default(),
            },
        );

        assert_eq!(state, before);
        assert!(state.window(&record.id).is_none());
        assert!(effects.is_empty());
    }

    #[test]
    fn stale_token_for_reused_id_is_discarded() {
        let mut state = DesktopState::default();
        reduce(&mut state, DesktopAction::OpenUrlWindow(url_spec()));
        let id = state.windows[0].id.clone();
        let stale = state.windows[0].load_token.expect("token");
        state.windows[0].load_token = Some(stale + 100);

        reduce(
            &mut state,
            DesktopAction::RemoteContentFailed {
                window_id: id.clone(),
                load_token: stale,
                error: "timeout".to_string(),
            },
        );
        assert_eq!(window(&state, &id).load_token, Some(stale + 100));
    }

    #[test]
    fn failed_load_falls_back_to_frame_and_raises_a_toast() {
        let mut state = DesktopState::default();
        reduce(&mut state, DesktopAction::OpenUrlWindow(url_spec()));
        let id = state.windows[0].id.clone();
        let load_token = state.windows[0].load_token.expect("token");

        let effects = reduce(
            &mut state,
            DesktopAction::RemoteContentFailed {
                window_id: id.clone(),
                load_token,
                error: "timeout".to_string(),
            },
        );

        assert_eq!(
            effects,
            vec![
                RuntimeEffect::Notify {
                    level: NotificationLevel::Error,
                    title: "Chess".to_string(),
                    body: "App details could not be loaded: timeout".to_string(),
                },
                RuntimeEffect::PersistWindows,
            ]
        );
        assert!(matches!(
            window(&state, &id).content.as_ref().expect("content").produce(),
            Ok(WindowContent::EmbeddedFrame { .. })
        ));
    }

    #[test]
    fn widgets_launch_raise_move_and_clamp() {
        let mut state = DesktopState::default();
        reduce(
            &mut state,
            DesktopAction::LaunchWidget {
                widget_id: "weather".to_string(),
            },
        );
        reduce(
            &mut state,
            DesktopAction::LaunchWidget {
                widget_id: "notes".to_string(),
            },
        );
        let first = state.widgets[0].id.clone();
        assert_eq!(state.widgets[0].z_index, 101);
        assert_eq!(state.widgets[1].z_index, 102);

        reduce(&mut state, DesktopAction::FocusWidget { id: first.clone() });
        assert_eq!(state.widgets[0].z_index, 103);

        let effects = reduce(
            &mut state,
            DesktopAction::MoveWidgetBy {
                id: first.clone(),
                delta: PointerDelta { dx: -5000, dy: 0 },
            },
        );
        assert!(effects.is_empty());
        let effects = reduce(
            &mut state,
            DesktopAction::EndWidgetDrag {
                id: first.clone(),
                viewport: Some(WindowRect::new(0, 0, 1000, 700)),
            },
        );
        assert_eq!(effects, vec![RuntimeEffect::PersistWidgets]);
        assert_eq!(state.widgets[0].x, 48 - WIDGET_WIDTH);

        let err = reduce_desktop(
            &mut state,
            DesktopAction::LaunchWidget {
                widget_id: "clock".to_string(),
            },
        )
        .expect_err("unknown widget");
        assert_eq!(err, ReducerError::UnknownWidget("clock".to_string()));
    }

    #[test]
    fn clear_session_drops_everything_and_requests_durable_clear() {
        let mut state = DesktopState::default();
        open(&mut state, "explorer");
        reduce(
            &mut state,
            DesktopAction::LaunchWidget {
                widget_id: "sysmon".to_string(),
            },
        );

        let effects = reduce(&mut state, DesktopAction::ClearSession);

        assert!(state.windows.is_empty());
        assert!(state.widgets.is_empty());
        assert_eq!(effects, vec![RuntimeEffect::ClearPersistedSession]);
    }

    #[test]
    fn hydration_keeps_windows_opened_before_boot_finished() {
        let mut stored = DesktopState::default();
        reduce(
            &mut stored,
            DesktopAction::LaunchWidget {
                widget_id: "weather".to_string(),
            },
        );
        let snapshot = DesktopSnapshot {
            windows: vec![apps::bootstrap_window()],
            widgets: stored.widgets.clone(),
        };

        let mut state = DesktopState::default();
        let early = open(&mut state, "explorer");
        reduce(
            &mut state,
            DesktopAction::LaunchWidget {
                widget_id: "notes".to_string(),
            },
        );

        let effects = reduce(&mut state, DesktopAction::HydrateSnapshot { snapshot });

        assert_eq!(effects, Vec::new());
        let ids: Vec<_> = state.windows.iter().map(|w| w.id.clone()).collect();
        assert_eq!(ids, vec![apps::bootstrap_window().id, early.clone()]);
        let restored = &state.windows[0];
        let opened = &state.windows[1];
        assert!(opened.z_index > restored.z_index);
        assert!(opened.is_focused);
        assert!(!restored.is_focused);
        assert_eq!(state.focused_window_id(), Some(early));

        let widget_ids: Vec<_> = state.widgets.iter().map(|w| w.widget_id.as_str()).collect();
        assert_eq!(widget_ids, vec!["weather", "notes"]);
        assert!(state.widgets[1].z_index > state.widgets[0].z_index);
    }

    #[test]
    fn unknown_app_is_reported() {
        let mut state = DesktopState::default();
        let err = reduce_desktop(
            &mut state,
            DesktopAction::OpenApp {
                app_id: "nyxnet".to_string(),
            },
        )
        .expect_err("unknown app");
        assert_eq!(err, ReducerError::UnknownApp("nyxnet".to_string()));
    }
}
