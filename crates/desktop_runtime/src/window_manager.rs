//! Shared z-order, focus and geometry helpers used by the desktop reducer.

use crate::model::{
    DesktopState, ResizeEdge, WidgetRecord, WindowId, WindowRect, WIDGET_Z_INDEX_BASELINE,
    Z_INDEX_BASELINE, Z_INDEX_RENORMALIZE_THRESHOLD,
};

/// Minimum allowed managed window width.
pub const MIN_WINDOW_WIDTH: i32 = 220;
/// Minimum allowed managed window height.
pub const MIN_WINDOW_HEIGHT: i32 = 140;
/// Pixels of a dragged window or widget that must stay inside the viewport after a drag ends.
pub const VISIBLE_STRIP_PX: i32 = 48;

/// Returns the z-index the next raised window receives.
pub fn next_window_z(state: &DesktopState) -> u32 {
    state
        .windows
        .iter()
        .map(|w| w.z_index)
        .max()
        .unwrap_or(0)
        .max(Z_INDEX_BASELINE)
        .saturating_add(1)
}

/// Compacts window z-indices to `baseline..baseline + n` when they grow past the threshold.
///
/// Relative order is preserved; ties keep collection order.
pub fn renormalize_z_order(state: &mut DesktopState) -> bool {
    let max = state.windows.iter().map(|w| w.z_index).max().unwrap_or(0);
    if max < Z_INDEX_RENORMALIZE_THRESHOLD {
        return false;
    }
    let mut order: Vec<usize> = (0..state.windows.len()).collect();
    order.sort_by_key(|&idx| state.windows[idx].z_index);
    for (rank, idx) in order.into_iter().enumerate() {
        state.windows[idx].z_index = Z_INDEX_BASELINE + rank as u32;
    }
    true
}

/// Focuses, un-minimizes and raises `window_id`.
///
/// Focusing the window that is already focused and on top changes nothing. Returns `false` when
/// the window does not exist.
pub fn focus_window_internal(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let Some(index) = state.windows.iter().position(|w| &w.id == window_id) else {
        return false;
    };

    let max_z = state.windows.iter().map(|w| w.z_index).max().unwrap_or(0);
    let target = &state.windows[index];
    let already_focused_top = target.is_focused
        && !target.minimized
        && target.z_index == max_z
        && state
            .windows
            .iter()
            .filter(|w| w.z_index == max_z)
            .count()
            == 1;
    if already_focused_top {
        return true;
    }

    renormalize_z_order(state);
    let z_index = next_window_z(state);
    for window in &mut state.windows {
        window.is_focused = false;
    }
    let window = &mut state.windows[index];
    window.is_focused = true;
    window.minimized = false;
    window.z_index = z_index;
    true
}

/// Focuses the non-minimized window with the highest z-index, if any window lacks focus.
///
/// Applied after the focused window closes or minimizes.
pub fn hand_off_focus(state: &mut DesktopState) {
    if state.windows.iter().any(|w| w.is_focused && !w.minimized) {
        return;
    }
    let top = state
        .windows
        .iter_mut()
        .filter(|w| !w.minimized)
        .max_by_key(|w| w.z_index);
    if let Some(window) = top {
        window.is_focused = true;
    }
}

/// Enforces focus exclusivity without choosing a new focus target.
///
/// Minimized windows lose focus; when several windows claim focus, the topmost keeps it.
pub fn normalize_focus(state: &mut DesktopState) {
    for window in &mut state.windows {
        if window.minimized {
            window.is_focused = false;
        }
    }
    let keeper = state
        .windows
        .iter()
        .enumerate()
        .filter(|(_, w)| w.is_focused)
        .max_by_key(|(_, w)| w.z_index)
        .map(|(idx, _)| idx);
    for (idx, window) in state.windows.iter_mut().enumerate() {
        if Some(idx) != keeper {
            window.is_focused = false;
        }
    }
}

/// Raises a widget above every other widget.
pub fn raise_widget(widgets: &mut [WidgetRecord], widget_id: &str) -> bool {
    let max_z = widgets.iter().map(|w| w.z_index).max().unwrap_or(0);
    let top_count = widgets.iter().filter(|w| w.z_index == max_z).count();
    let Some(widget) = widgets.iter_mut().find(|w| w.id == widget_id) else {
        return false;
    };
    let already_top =
        widget.z_index == max_z && top_count == 1 && widget.z_index > WIDGET_Z_INDEX_BASELINE;
    if !already_top {
        widget.z_index = max_z.max(WIDGET_Z_INDEX_BASELINE).saturating_add(1);
    }
    true
}

/// Applies resize deltas for a given edge/corner drag.
pub fn resize_rect(start: WindowRect, edge: ResizeEdge, dx: i32, dy: i32) -> WindowRect {
    match edge {
        ResizeEdge::East => WindowRect {
            w: start.w + dx,
            ..start
        },
        ResizeEdge::West => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            ..start
        },
        ResizeEdge::South => WindowRect {
            h: start.h + dy,
            ..start
        },
        ResizeEdge::North => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            ..start
        },
        ResizeEdge::NorthEast => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            w: start.w + dx,
            ..start
        },
        ResizeEdge::NorthWest => WindowRect {
            x: start.x + dx,
            y: start.y + dy,
            w: start.w - dx,
            h: start.h - dy,
        },
        ResizeEdge::SouthEast => WindowRect {
            w: start.w + dx,
            h: start.h + dy,
            ..start
        },
        ResizeEdge::SouthWest => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            h: start.h + dy,
            ..start
        },
    }
}

/// [`resize_rect`] followed by the minimum-size clamp, keeping the edge opposite the drag fixed.
pub fn resize_rect_clamped(start: WindowRect, edge: ResizeEdge, dx: i32, dy: i32) -> WindowRect {
    let resized = resize_rect(start, edge, dx, dy);
    let mut clamped = resized.clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
    let moves_left = matches!(
        edge,
        ResizeEdge::West | ResizeEdge::NorthWest | ResizeEdge::SouthWest
    );
    let moves_top = matches!(
        edge,
        ResizeEdge::North | ResizeEdge::NorthWest | ResizeEdge::NorthEast
    );
    if moves_left && resized.w < MIN_WINDOW_WIDTH {
        clamped.x = start.x + start.w - MIN_WINDOW_WIDTH;
    }
    if moves_top && resized.h < MIN_WINDOW_HEIGHT {
        clamped.y = start.y + start.h - MIN_WINDOW_HEIGHT;
    }
    clamped
}

/// Pulls a rect back so a [`VISIBLE_STRIP_PX`] strip stays reachable and the top edge stays below
/// the viewport top.
pub fn clamp_rect_to_viewport(rect: WindowRect, viewport: WindowRect) -> WindowRect {
    let min_x = viewport.x - rect.w + VISIBLE_STRIP_PX;
    let max_x = (viewport.x + viewport.w - VISIBLE_STRIP_PX).max(min_x);
    let min_y = viewport.y;
    let max_y = (viewport.y + viewport.h - VISIBLE_STRIP_PX).max(min_y);
    WindowRect {
        x: rect.x.clamp(min_x, max_x),
        y: rect.y.clamp(min_y, max_y),
        ..rect
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::WindowRecord;

    fn window(id: &str, z_index: u32, focused: bool, minimized: bool) -> WindowRecord {
        WindowRecord {
            id: WindowId::new(id),
            title: id.to_string(),
            icon: String::new(),
            app: None,
            url: None,
            rect: WindowRect::default(),
            z_index,
            minimized,
            is_focused: focused,
            maximized: false,
            restore_rect: None,
            content: None,
            load_token: None,
        }
    }

    fn state_with(windows: Vec<WindowRecord>) -> DesktopState {
        DesktopState {
            windows,
            ..DesktopState::default()
        }
    }

    #[test]
    fn raise_uses_baseline_for_low_stacks() {
        let state = state_with(vec![window("a", 1, false, false)]);
        assert_eq!(next_window_z(&state), 11);
        assert_eq!(next_window_z(&DesktopState::default()), 11);
    }

    #[test]
    fn focus_is_idempotent_for_the_top_window() {
        let mut state = state_with(vec![
            window("a", 11, false, false),
            window("b", 12, true, false),
        ]);
        let before = state.clone();
        assert!(focus_window_internal(&mut state, &WindowId::new("b")));
        assert_eq!(state, before);
    }

    #[test]
    fn renormalization_preserves_relative_order() {
        let mut state = state_with(vec![
            window("a", Z_INDEX_RENORMALIZE_THRESHOLD + 5, false, false),
            window("b", 3, false, false),
            window("c", Z_INDEX_RENORMALIZE_THRESHOLD, true, false),
        ]);
        assert!(renormalize_z_order(&mut state));
        let z: Vec<u32> = state.windows.iter().map(|w| w.z_index).collect();
        assert_eq!(z, vec![12, 10, 11]);
    }

    #[test]
    fn hand_off_picks_topmost_non_minimized_window() {
        let mut state = state_with(vec![
            window("a", 14, false, true),
            window("b", 12, false, false),
            window("c", 13, false, false),
        ]);
        hand_off_focus(&mut state);
        assert_eq!(state.focused_window_id(), Some(WindowId::new("c")));
    }

    #[test]
    fn normalize_focus_keeps_only_topmost_claimant() {
        let mut state = state_with(vec![
            window("a", 12, true, false),
            window("b", 15, true, false),
            window("c", 20, true, true),
        ]);
        normalize_focus(&mut state);
        let focused: Vec<_> = state.windows.iter().map(|w| w.is_focused).collect();
        assert_eq!(focused, vec![false, true, false]);
    }

    #[test]
    fn west_resize_past_minimum_keeps_right_edge_fixed() {
        let start = WindowRect::new(100, 100, 300, 200);
        let rect = resize_rect_clamped(start, ResizeEdge::West, 200, 0);
        assert_eq!(rect, WindowRect::new(180, 100, 220, 200));
    }

    #[test]
    fn clamp_keeps_a_strip_visible() {
        let viewport = WindowRect::new(0, 0, 1000, 700);
        let rect = clamp_rect_to_viewport(WindowRect::new(-900, -50, 400, 300), viewport);
        assert_eq!(rect, WindowRect::new(-352, 0, 400, 300));
        let rect = clamp_rect_to_viewport(WindowRect::new(2000, 900, 400, 300), viewport);
        assert_eq!(rect, WindowRect::new(952, 652, 400, 300));
    }

    #[test]
    fn widget_raise_starts_above_widget_baseline() {
        let mut widgets = vec![WidgetRecord {
            id: "w1".to_string(),
            widget_id: "weather".to_string(),
            x: 0,
            y: 0,
            z_index: WIDGET_Z_INDEX_BASELINE,
        }];
        assert!(raise_widget(&mut widgets, "w1"));
        assert_eq!(widgets[0].z_index, 101);
        assert!(raise_widget(&mut widgets, "w1"));
        assert_eq!(widgets[0].z_index, 101);
        assert!(!raise_widget(&mut widgets, "missing"));
    }
}
