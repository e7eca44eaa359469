//! Window and widget records plus the desktop state they live in.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::content::ContentFactory;

/// Lowest z-index handed to a raised window.
pub const Z_INDEX_BASELINE: u32 = 10;
/// Lowest z-index handed to a raised widget. Widgets stack independently from windows.
pub const WIDGET_Z_INDEX_BASELINE: u32 = 100;
/// Max z-index above which the window stack is compacted before the next raise.
pub const Z_INDEX_RENORMALIZE_THRESHOLD: u32 = 1_000_000;
pub const DEFAULT_WINDOW_WIDTH: i32 = 640;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 480;
/// Geometry of the single window seeded on first run or after unrecoverable storage.
pub const BOOTSTRAP_WINDOW_LEFT: i32 = 80;
pub const BOOTSTRAP_WINDOW_TOP: i32 = 80;
/// Id prefix marking URL-backed windows whose content is rebuilt from data.
pub const URL_WINDOW_ID_PREFIX: &str = "pwa-";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this window hosts an embedded URL rather than a registry app.
    pub fn is_url_backed(&self) -> bool {
        self.0.starts_with(URL_WINDOW_ID_PREFIX)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Stored layouts may carry fractional pixels; they are rounded on load.
fn round_to_i32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    Ok(value.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32)
}

fn round_to_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    Ok(value.round().clamp(0.0, f64::from(u32::MAX)) as u32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    #[serde(rename = "left", deserialize_with = "round_to_i32")]
    pub x: i32,
    #[serde(rename = "top", deserialize_with = "round_to_i32")]
    pub y: i32,
    #[serde(rename = "width", deserialize_with = "round_to_i32")]
    pub w: i32,
    #[serde(rename = "height", deserialize_with = "round_to_i32")]
    pub h: i32,
}

impl WindowRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }
}

impl Default for WindowRect {
    fn default() -> Self {
        Self {
            x: 48,
            y: 48,
            w: DEFAULT_WINDOW_WIDTH,
            h: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

/// Metadata for one open window.
///
/// The serialized form is exactly what the `windows` durable key stores. `content` and
/// `load_token` only exist on live records and are rebuilt or dropped on reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub icon: String,
    /// Alternate registry key for windows whose id is not itself a registry id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    /// Embedded frame location for URL-backed windows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub rect: WindowRect,
    #[serde(rename = "zIndex", default, deserialize_with = "round_to_u32")]
    pub z_index: u32,
    #[serde(default)]
    pub minimized: bool,
    #[serde(rename = "focused", default)]
    pub is_focused: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub maximized: bool,
    #[serde(
        rename = "restoreRect",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub restore_rect: Option<WindowRect>,
    #[serde(skip)]
    pub content: Option<ContentFactory>,
    /// Token of the async content load currently in flight for this record.
    #[serde(skip)]
    pub load_token: Option<u64>,
}

impl WindowRecord {
    /// Returns a copy without live-only fields, as it would come back from storage.
    pub fn detached(&self) -> Self {
        Self {
            content: None,
            load_token: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetRecord {
    pub id: String,
    /// Key into the static widget registry.
    pub widget_id: String,
    #[serde(deserialize_with = "round_to_i32")]
    pub x: i32,
    #[serde(deserialize_with = "round_to_i32")]
    pub y: i32,
    #[serde(default, deserialize_with = "round_to_u32")]
    pub z_index: u32,
}

/// What to do with a persisted window that matches nothing in the app registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnmatchedWindowPolicy {
    /// Keep the record with an "unavailable" placeholder.
    #[default]
    Placeholder,
    /// Remove the record from the rehydrated set.
    Drop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopPreferences {
    pub unmatched_window_policy: UnmatchedWindowPolicy,
    /// Pull windows and widgets back into reach when a drag ends off-screen.
    pub clamp_on_drag_end: bool,
    /// Restore the persisted layout on boot instead of starting from the bootstrap window.
    pub restore_on_boot: bool,
}

impl Default for DesktopPreferences {
    fn default() -> Self {
        Self {
            unmatched_window_policy: UnmatchedWindowPolicy::Placeholder,
            clamp_on_drag_end: true,
            restore_on_boot: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesktopState {
    pub next_window_seq: u64,
    pub next_load_token: u64,
    /// Collection order drives taskbar order; `z_index` drives stacking.
    pub windows: Vec<WindowRecord>,
    pub widgets: Vec<WidgetRecord>,
    pub start_menu_open: bool,
    /// Persistence stays gated until the boot snapshot has been applied.
    pub boot_hydrated: bool,
    pub preferences: DesktopPreferences,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            next_window_seq: 1,
            next_load_token: 1,
            windows: Vec::new(),
            widgets: Vec::new(),
            start_menu_open: false,
            boot_hydrated: false,
            preferences: DesktopPreferences::default(),
        }
    }
}

impl DesktopState {
    pub fn with_preferences(preferences: DesktopPreferences) -> Self {
        Self {
            preferences,
            ..Self::default()
        }
    }

    pub fn focused_window_id(&self) -> Option<WindowId> {
        self.windows
            .iter()
            .find(|w| w.is_focused)
            .map(|w| w.id.clone())
    }

    pub fn window(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| &w.id == window_id)
    }

    pub fn widget(&self, id: &str) -> Option<&WidgetRecord> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn snapshot(&self) -> DesktopSnapshot {
        DesktopSnapshot {
            windows: self.windows.clone(),
            widgets: self.widgets.clone(),
        }
    }
}

/// Window and widget collections as loaded from or written to durable storage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DesktopSnapshot {
    pub windows: Vec<WindowRecord>,
    pub widgets: Vec<WidgetRecord>,
}

/// Request to open a window with explicit content.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenWindowRequest {
    pub title: String,
    pub icon: String,
    pub app: Option<String>,
    pub url: Option<String>,
    /// Absent geometry falls back to the registry default for `app`, then to a cascade.
    pub rect: Option<WindowRect>,
    pub content: ContentFactory,
}

impl OpenWindowRequest {
    pub fn new(title: impl Into<String>, icon: impl Into<String>, content: ContentFactory) -> Self {
        Self {
            title: title.into(),
            icon: icon.into(),
            app: None,
            url: None,
            rect: None,
            content,
        }
    }
}

/// Fully described ad hoc window hosting an embedded frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlWindowSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointerDelta {
    pub dx: i32,
    pub dy: i32,
}

impl PointerDelta {
    pub fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn window_record_serializes_to_the_flat_durable_layout() {
        let record = WindowRecord {
            id: WindowId::new("explorer1"),
            title: "File Explorer".to_string(),
            icon: "🗂️".to_string(),
            app: None,
            url: None,
            rect: WindowRect::new(80, 96, 700, 520),
            z_index: 11,
            minimized: false,
            is_focused: true,
            maximized: false,
            restore_rect: None,
            content: None,
            load_token: Some(4),
        };

        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "id": "explorer1",
                "title": "File Explorer",
                "icon": "🗂️",
                "left": 80,
                "top": 96,
                "width": 700,
                "height": 520,
                "zIndex": 11,
                "minimized": false,
                "focused": true,
            })
        );
    }

    #[test]
    fn window_record_decodes_without_optional_flags() {
        let record: WindowRecord = serde_json::from_str(
            r#"{"id":"terminal-1","title":"Terminal","icon":"🖥️","left":1,"top":2,"width":3,"height":4}"#,
        )
        .expect("decode");
        assert_eq!(record.rect, WindowRect::new(1, 2, 3, 4));
        assert_eq!(record.z_index, 0);
        assert!(!record.minimized && !record.is_focused && !record.maximized);
        assert_eq!(record.content, None);
    }

    #[test]
    fn url_backed_ids_are_recognized_by_prefix() {
        assert!(WindowId::new("pwa-chess-1700000000000").is_url_backed());
        assert!(!WindowId::new("explorer-1700000000000-1").is_url_backed());
    }

    #[test]
    fn widget_record_uses_camel_case_keys() {
        let widget = WidgetRecord {
            id: "weather-1".to_string(),
            widget_id: "weather".to_string(),
            x: 10,
            y: 20,
            z_index: 101,
        };
        assert_eq!(
            serde_json::to_value(&widget).expect("serialize"),
            serde_json::json!({"id":"weather-1","widgetId":"weather","x":10,"y":20,"zIndex":101})
        );
    }
}
