//! Event binding.
//!
//! Wires all UI event listeners once at startup. Async flows are spawned
//! via `wasm_bindgen_futures::spawn_local`; the session events themselves
//! come back through `wallet_ui::bind_session`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::creator;
use crate::dom::Elements;
use crate::nav;
use crate::wallet_ui;

/// Helper: attach sync click handler.
macro_rules! on_click {
    ($el:expr, $cb:expr) => {{
        let cb = Closure::wrap(Box::new($cb) as Box<dyn FnMut(web_sys::MouseEvent)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }};
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) {
    // ── Mobile menu ──
    {
        let els2 = els.clone();
        on_click!(els.mobile_menu_button, move |_| {
            nav::toggle_mobile_menu(&els2);
        });
    }

    // ── Navigation links ──
    for link in &els.nav_links {
        let Some(page_id) = link.get_attribute("data-page") else {
            continue;
        };
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
            e.prevent_default();
            nav::show_page(&els2, &page_id);
        }) as Box<dyn FnMut(_)>);
        link.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }

    // ── DAO tabs ──
    for tab in &els.dao_tabs {
        let Some(name) = tab.get_attribute("data-tab") else {
            continue;
        };
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            nav::show_dao_section(&els2, &name);
        }) as Box<dyn FnMut(_)>);
        tab.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }

    // ── Wallet entry points ──
    {
        let els2 = els.clone();
        on_click!(els.wallet_connect_button, move |_| {
            wallet_ui::open_wallet_modal(&els2);
        });
    }
    {
        let els2 = els.clone();
        on_click!(els.mobile_wallet_connect_button, move |_| {
            nav::close_mobile_menu(&els2);
            wallet_ui::open_wallet_modal(&els2);
        });
    }

    // Connected badge toggles the account dropdown.
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
            e.stop_propagation();
            wallet_ui::toggle_dropdown(&els2);
        }) as Box<dyn FnMut(_)>);
        els.wallet_connected
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }

    // ── Dropdown actions ──
    {
        let els2 = els.clone();
        on_click!(els.copy_address_button, move |_| {
            wallet_ui::copy_address(&els2);
        });
    }
    {
        let els2 = els.clone();
        on_click!(els.network_info_button, move |_| {
            wallet_ui::show_network_info(&els2);
        });
    }
    {
        let els2 = els.clone();
        on_click!(els.disconnect_button, move |_| {
            crate::dom::add_class(&els2.wallet_dropdown, "hidden");
            wallet_ui::disconnect_flow();
        });
    }

    // Clicking the modal backdrop closes the picker.
    {
        let els2 = els.clone();
        let modal: web_sys::EventTarget = els.wallet_modal.clone().into();
        let cb = Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
            let target = e.target();
            let on_backdrop = target
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                .is_some_and(|el| el.id() == els2.wallet_modal.id());
            if on_backdrop {
                wallet_ui::close_wallet_modal(&els2);
            }
        }) as Box<dyn FnMut(_)>);
        modal
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }

    // Token creator wizard (only present on the creator page).
    creator::bind_events(els);
}
