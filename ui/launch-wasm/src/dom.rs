//! DOM element bindings.
//!
//! All wallet/navigation elements are resolved once at startup into
//! [`Elements`]; ids match the markup in `index.html`. Decorative elements
//! (canvases, stat counters) are looked up lazily at their call sites, since
//! not every page variant ships them.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

// ── Helpers ──

fn doc() -> Document {
    gloo_utils::document()
}

pub fn document() -> Document {
    doc()
}

pub fn window() -> web_sys::Window {
    gloo_utils::window()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn query(selector: &str) -> Option<Element> {
    doc().query_selector(selector).ok()?
}

pub fn query_all(selector: &str) -> Vec<Element> {
    let nl = doc().query_selector_all(selector).unwrap();
    let mut v = Vec::new();
    for i in 0..nl.length() {
        if let Some(e) = nl.item(i) {
            if let Ok(el) = e.dyn_into::<Element>() {
                v.push(el);
            }
        }
    }
    v
}

/// Query all matching elements within a parent element.
pub fn query_all_within(parent: &Element, selector: &str) -> Vec<Element> {
    let nl = parent.query_selector_all(selector).unwrap();
    let mut v = Vec::new();
    for i in 0..nl.length() {
        if let Some(e) = nl.item(i) {
            if let Ok(el) = e.dyn_into::<Element>() {
                v.push(el);
            }
        }
    }
    v
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn set_inner_html(el: &Element, html: &str) {
    el.set_inner_html(html);
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str) {
    let _ = el.class_list().toggle(cls);
}

pub fn set_class(el: &Element, cls: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(cls, on);
}

pub fn create_element(tag: &str) -> Element {
    doc().create_element(tag).unwrap()
}

/// Set an inline style property, ignoring failures.
pub fn set_style(el: &HtmlElement, prop: &str, value: &str) {
    let _ = el.style().set_property(prop, value);
}

// ── Elements struct ──

/// All fixed DOM element references used by the site.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // Navigation
    pub mobile_menu_button: HtmlElement,
    pub mobile_menu: Element,
    pub pages: Vec<Element>,
    pub nav_links: Vec<Element>,
    pub dao_tabs: Vec<Element>,

    // Wallet entry points (desktop + mobile header)
    pub wallet_connect_button: HtmlElement,
    pub wallet_connected: Element,
    pub connected_address: Element,
    pub mobile_wallet_connect_button: HtmlElement,
    pub mobile_wallet_connected: Element,
    pub mobile_connected_address: Element,

    // Connected-state dropdown
    pub wallet_dropdown: Element,
    pub copy_address_button: HtmlElement,
    pub network_info_button: HtmlElement,
    pub disconnect_button: HtmlElement,

    // Wallet modal
    pub wallet_modal: HtmlElement,
    pub wallet_modal_content: Element,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_html {
    ($id:expr) => {
        by_id_typed::<HtmlElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing html element #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            mobile_menu_button: get_html!("mobile-menu-button"),
            mobile_menu: get_el!("mobile-menu"),
            pages: query_all(".page"),
            nav_links: query_all("[data-page]"),
            dao_tabs: query_all(".tab-btn"),

            wallet_connect_button: get_html!("wallet-connect-button"),
            wallet_connected: get_el!("wallet-connected"),
            connected_address: get_el!("connected-address"),
            mobile_wallet_connect_button: get_html!("mobile-wallet-connect-button"),
            mobile_wallet_connected: get_el!("mobile-wallet-connected"),
            mobile_connected_address: get_el!("mobile-connected-address"),

            wallet_dropdown: get_el!("wallet-dropdown"),
            copy_address_button: get_html!("copy-address-button"),
            network_info_button: get_html!("network-info-button"),
            disconnect_button: get_html!("disconnect-button"),

            wallet_modal: get_html!("wallet-modal"),
            wallet_modal_content: get_el!("wallet-modal-content"),
        })
    }
}
