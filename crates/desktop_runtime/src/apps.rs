//! Static registry of built-in apps and floating widgets.

use crate::{
    content::ContentFactory,
    model::{
        OpenWindowRequest, WindowId, WindowRecord, WindowRect, BOOTSTRAP_WINDOW_LEFT,
        BOOTSTRAP_WINDOW_TOP, Z_INDEX_BASELINE,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppDescriptor {
    pub app_id: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub default_rect: WindowRect,
    pub show_on_desktop: bool,
    pub show_in_launcher: bool,
}

impl AppDescriptor {
    pub fn content_factory(&self) -> ContentFactory {
        ContentFactory::app(self.app_id)
    }
}

const APP_REGISTRY: [AppDescriptor; 7] = [
    AppDescriptor {
        app_id: "explorer",
        title: "File Explorer",
        icon: "🗂️",
        default_rect: WindowRect::new(420, 120, 700, 520),
        show_on_desktop: true,
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: "browser",
        title: "Browser",
        icon: "🌐",
        default_rect: WindowRect::new(80, 80, 900, 600),
        show_on_desktop: false,
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: "terminal",
        title: "Terminal",
        icon: "🖥️",
        default_rect: WindowRect::new(320, 170, 420, 260),
        show_on_desktop: true,
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: "textedit",
        title: "Text Editor",
        icon: "📝",
        default_rect: WindowRect::new(420, 120, 700, 520),
        show_on_desktop: false,
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: "settings",
        title: "Settings",
        icon: "⚙️",
        default_rect: WindowRect::new(400, 220, 350, 220),
        show_on_desktop: true,
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: "package-manager",
        title: "Package Manager",
        icon: "📦",
        default_rect: WindowRect::new(420, 120, 700, 520),
        show_on_desktop: true,
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: "libreoffice",
        title: "LibreOffice",
        icon: "📄",
        default_rect: WindowRect::new(420, 120, 1024, 768),
        show_on_desktop: false,
        show_in_launcher: true,
    },
];

pub fn app_registry() -> &'static [AppDescriptor] {
    &APP_REGISTRY
}

pub fn launcher_apps() -> Vec<AppDescriptor> {
    app_registry()
        .iter()
        .copied()
        .filter(|entry| entry.show_in_launcher)
        .collect()
}

pub fn desktop_icon_apps() -> Vec<AppDescriptor> {
    app_registry()
        .iter()
        .copied()
        .filter(|entry| entry.show_on_desktop)
        .collect()
}

pub fn app_descriptor(app_id: &str) -> Option<&'static AppDescriptor> {
    app_registry().iter().find(|entry| entry.app_id == app_id)
}

/// Builds the open request a registry launch uses: registry title, icon, geometry and content.
pub fn default_open_request(app_id: &str) -> Option<OpenWindowRequest> {
    let descriptor = app_descriptor(app_id)?;
    let mut req = OpenWindowRequest::new(
        descriptor.title,
        descriptor.icon,
        descriptor.content_factory(),
    );
    req.app = Some(descriptor.app_id.to_string());
    req.rect = Some(descriptor.default_rect);
    Some(req)
}

/// The single focused window seeded on first run and whenever durable state is unusable.
pub fn bootstrap_window() -> WindowRecord {
    let descriptor = &APP_REGISTRY[0];
    WindowRecord {
        id: WindowId::new(format!("{}1", descriptor.app_id)),
        title: descriptor.title.to_string(),
        icon: descriptor.icon.to_string(),
        app: Some(descriptor.app_id.to_string()),
        url: None,
        rect: WindowRect {
            x: BOOTSTRAP_WINDOW_LEFT,
            y: BOOTSTRAP_WINDOW_TOP,
            ..descriptor.default_rect
        },
        z_index: Z_INDEX_BASELINE,
        minimized: false,
        is_focused: true,
        maximized: false,
        restore_rect: None,
        content: Some(descriptor.content_factory()),
        load_token: None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetDescriptor {
    pub widget_id: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
}

const WIDGET_REGISTRY: [WidgetDescriptor; 3] = [
    WidgetDescriptor {
        widget_id: "weather",
        title: "Weather",
        icon: "☀️",
    },
    WidgetDescriptor {
        widget_id: "notes",
        title: "Sticky Notes",
        icon: "📝",
    },
    WidgetDescriptor {
        widget_id: "sysmon",
        title: "System Monitor",
        icon: "📊",
    },
];

pub fn widget_registry() -> &'static [WidgetDescriptor] {
    &WIDGET_REGISTRY
}

pub fn widget_descriptor(widget_id: &str) -> Option<&'static WidgetDescriptor> {
    widget_registry()
        .iter()
        .find(|entry| entry.widget_id == widget_id)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn registry_ids_are_unique() {
        let mut ids: Vec<_> = app_registry().iter().map(|app| app.app_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), app_registry().len());
    }

    #[test]
    fn desktop_shortcuts_cover_the_built_in_launch_points() {
        let ids: Vec<_> = desktop_icon_apps().iter().map(|app| app.app_id).collect();
        assert_eq!(
            ids,
            vec!["explorer", "terminal", "settings", "package-manager"]
        );
    }

    #[test]
    fn bootstrap_window_uses_first_registry_entry() {
        let window = bootstrap_window();
        assert_eq!(window.app.as_deref(), Some("explorer"));
        assert_eq!((window.rect.x, window.rect.y), (80, 80));
        assert_eq!(window.z_index, 10);
        assert!(window.is_focused);
        assert!(window.content.is_some());
    }

    #[test]
    fn default_open_request_uses_registry_geometry() {
        let req = default_open_request("settings").expect("settings registered");
        assert_eq!(req.rect, Some(WindowRect::new(400, 220, 350, 220)));
        assert_eq!(req.title, "Settings");
        assert!(default_open_request("nyxnet").is_none());
    }
}
