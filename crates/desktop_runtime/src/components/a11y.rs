//! DOM focus helpers for the start menu's roving keyboard navigation.

use wasm_bindgen::JsCast;

fn menu_items(menu_id: &str) -> Vec<web_sys::HtmlElement> {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return Vec::new();
    };
    let Some(menu) = document.get_element_by_id(menu_id) else {
        return Vec::new();
    };
    let Ok(nodes) = menu.query_selector_all(r#"[role="menuitem"]"#) else {
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
        .filter(|item| item.get_attribute("aria-disabled").as_deref() != Some("true"))
        .collect()
}

fn active_element() -> Option<web_sys::Element> {
    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.active_element())
}

/// Focuses the first enabled item inside a menu container.
pub(super) fn focus_first_menu_item(menu_id: &str) -> bool {
    match menu_items(menu_id).first() {
        Some(first) => first.focus().is_ok(),
        None => false,
    }
}

/// Picks the next item index for a navigation key. Arrow keys wrap.
fn roving_index(key: &str, current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match key {
        "ArrowDown" => Some(current.map_or(0, |index| (index + 1) % len)),
        "ArrowUp" => Some(current.map_or(len - 1, |index| (index + len - 1) % len)),
        "Home" => Some(0),
        "End" => Some(len - 1),
        _ => None,
    }
}

/// Handles arrow/home/end menu navigation and prevents default when handled.
pub(super) fn handle_menu_roving_keydown(ev: &web_sys::KeyboardEvent, menu_id: &str) -> bool {
    let items = menu_items(menu_id);
    let active = active_element();
    let current = active.as_ref().and_then(|active| {
        items
            .iter()
            .position(|item| item.is_same_node(Some(active.as_ref())))
    });
    let Some(next) = roving_index(&ev.key(), current, items.len()) else {
        return false;
    };

    let _ = items[next].focus();
    ev.prevent_default();
    ev.stop_propagation();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn arrow_keys_wrap_around_the_menu() {
        assert_eq!(roving_index("ArrowDown", Some(2), 3), Some(0));
        assert_eq!(roving_index("ArrowUp", Some(0), 3), Some(2));
        assert_eq!(roving_index("ArrowDown", None, 3), Some(0));
        assert_eq!(roving_index("ArrowUp", None, 3), Some(2));
    }

    #[test]
    fn home_end_jump_and_other_keys_are_ignored() {
        assert_eq!(roving_index("Home", Some(1), 4), Some(0));
        assert_eq!(roving_index("End", Some(1), 4), Some(3));
        assert_eq!(roving_index("Tab", Some(1), 4), None);
        assert_eq!(roving_index("ArrowDown", None, 0), None);
    }
}
