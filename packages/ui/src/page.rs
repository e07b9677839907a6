//! One-off page chores run at startup.

use crate::dom::Dom;

pub const YEAR_SELECTOR: &str = "#annee-actuelle";
const DEBUG_CLASS: &str = "layout-debug";

pub fn set_theme<D: Dom>(dom: &D, theme: &str) {
    if let Some(root) = dom.root() {
        dom.set_attribute(&root, "data-theme", theme);
    }
}

/// Writes the current year into the footer, when the placeholder exists.
pub fn stamp_year<D: Dom>(dom: &D, year: i32) -> bool {
    match dom.query(YEAR_SELECTOR) {
        Some(node) => {
            dom.set_text_content(&node, &year.to_string());
            true
        }
        None => false,
    }
}

/// Shift+D, whatever the keyboard's caps state.
pub fn is_debug_shortcut(key: &str, shift: bool) -> bool {
    shift && key.eq_ignore_ascii_case("d")
}

pub fn toggle_layout_debug<D: Dom>(dom: &D) {
    if let Some(body) = dom.body() {
        let on = !dom.has_class(&body, DEBUG_CLASS);
        dom.set_class(&body, DEBUG_CLASS, on);
    }
}
