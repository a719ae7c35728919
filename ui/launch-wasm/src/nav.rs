//! Page navigation for the single-page layout.
//!
//! Every `.page` section carries an id; showing one hides the rest and
//! records the choice in the URL hash so reloads land on the same page.

use gloo_console::warn;

use crate::dom::{self, Elements};

pub const DEFAULT_PAGE: &str = "home-page";

/// Show the page on load that the URL hash points at, if any.
pub fn init(els: &Elements) {
    let hash = dom::window()
        .location()
        .hash()
        .unwrap_or_default();
    let target = hash.trim_start_matches('#');
    let target = if !target.is_empty() && dom::by_id(target).is_some() {
        target.to_string()
    } else {
        DEFAULT_PAGE.to_string()
    };
    show_page(els, &target);
}

/// Activate `page_id`, deactivate every other `.page`, and push the hash.
pub fn show_page(els: &Elements, page_id: &str) {
    let mut found = false;
    for page in &els.pages {
        let active = page.id() == page_id;
        dom::set_class(page, "active", active);
        found |= active;
    }
    if !found {
        warn!("unknown page id", page_id);
        return;
    }

    let history = dom::window().history();
    if let Ok(history) = history {
        let _ = history.push_state_with_url(
            &wasm_bindgen::JsValue::NULL,
            "",
            Some(&format!("#{page_id}")),
        );
    }

    // Changing pages always collapses the mobile menu.
    close_mobile_menu(els);
    dom::window().scroll_to_with_x_and_y(0.0, 0.0);
}

pub fn toggle_mobile_menu(els: &Elements) {
    dom::toggle_class(&els.mobile_menu, "hidden");
}

pub fn close_mobile_menu(els: &Elements) {
    dom::add_class(&els.mobile_menu, "hidden");
}

/// Switch the visible DAO panel. Tab buttons carry `data-tab` naming the
/// `#<name>-section` they reveal.
pub fn show_dao_section(els: &Elements, name: &str) {
    for tab in &els.dao_tabs {
        let active = tab.get_attribute("data-tab").as_deref() == Some(name);
        dom::set_class(tab, "active", active);
    }
    for section in dom::query_all(".dao-section") {
        let active = section.id() == format!("{name}-section");
        dom::set_class(&section, "hidden", !active);
    }
}
