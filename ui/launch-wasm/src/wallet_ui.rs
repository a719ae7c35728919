//! Wallet UI glue.
//!
//! Translates [`SessionEvent`]s into DOM updates and toasts, renders the
//! provider picker modal, and drives the connect/disconnect flows from
//! button clicks. All session mutations go through `state::session()`.

use std::rc::Rc;

use gloo_console::{error, log};
use unifa_session::display::{format_sol, short_address};
use unifa_session::{ProviderKind, SessionError, SessionEvent, Status};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};

use crate::dom::{self, Elements};
use crate::notify;
use crate::rpc;
use crate::state;

/// Subscribe the DOM to session events. Call once at startup.
pub fn bind_session(els: &Elements) {
    let session = state::session();
    let els = els.clone();
    session.subscribe(Rc::new(move |event: &SessionEvent| match event {
        SessionEvent::Connected(address) => {
            render_connected(&els, address);
            close_wallet_modal(&els);
            notify::success(&format!("Connected: {}", short_address(address)));
            announce_balance(address.clone());
        }
        SessionEvent::Disconnected => {
            render_disconnected(&els);
            notify::info("Wallet disconnected");
        }
        SessionEvent::AccountChanged(address) => {
            render_connected(&els, address);
            notify::info(&format!("Account changed: {}", short_address(address)));
            announce_balance(address.clone());
        }
        SessionEvent::ConnectionFailed(message) => {
            render_disconnected(&els);
            notify::error(message);
        }
    }));
}

/// Paint the header according to the current session status.
pub fn render(els: &Elements) {
    let session = state::session();
    match session.status() {
        Status::Connected => {
            if let Some(address) = session.address() {
                render_connected(els, &address);
            }
        }
        _ => render_disconnected(els),
    }
}

fn render_connected(els: &Elements, address: &str) {
    let short = short_address(address);
    dom::set_text(&els.connected_address, &short);
    dom::set_text(&els.mobile_connected_address, &short);

    dom::add_class(&els.wallet_connect_button, "hidden");
    dom::remove_class(&els.wallet_connected, "hidden");
    dom::add_class(&els.wallet_connected, "flex");

    dom::add_class(&els.mobile_wallet_connect_button, "hidden");
    dom::remove_class(&els.mobile_wallet_connected, "hidden");
}

fn render_disconnected(els: &Elements) {
    dom::remove_class(&els.wallet_connect_button, "hidden");
    dom::add_class(&els.wallet_connected, "hidden");
    dom::remove_class(&els.wallet_connected, "flex");
    dom::add_class(&els.wallet_dropdown, "hidden");

    dom::remove_class(&els.mobile_wallet_connect_button, "hidden");
    dom::add_class(&els.mobile_wallet_connected, "hidden");

    dom::set_text(&els.connected_address, "");
    dom::set_text(&els.mobile_connected_address, "");
}

/// Fetch the SOL balance in the background and toast it.
fn announce_balance(address: String) {
    spawn_local(async move {
        let session = state::session();
        match rpc::get_balance(session.network(), &address).await {
            Ok(lamports) => {
                notify::info(&format!("Balance: {} SOL", format_sol(lamports)));
            }
            Err(e) => {
                // Balance is decorative; the connection itself succeeded.
                log!("balance lookup failed:", e);
            }
        }
    });
}

// ── Provider picker modal ──

pub fn open_wallet_modal(els: &Elements) {
    let session = state::session();
    let mut html = String::new();
    for kind in ProviderKind::ALL {
        let status = match kind {
            ProviderKind::TrustWallet | ProviderKind::Coinbase => "Coming soon",
            _ if session.is_installed(kind) => "Detected",
            _ => "Not installed",
        };
        html.push_str(&format!(
            "<button class=\"wallet-option w-full flex items-center justify-between \
             px-4 py-3 rounded-lg bg-dark-800 hover:bg-dark-700 transition-colors\" \
             data-wallet=\"{id}\">\
             <span class=\"font-medium\">{name}</span>\
             <span class=\"text-sm text-gray-400\">{status}</span>\
             </button>",
            id = kind.id(),
            name = kind.display_name(),
        ));
    }
    dom::set_inner_html(&els.wallet_modal_content, &html);
    wire_wallet_options(els);

    dom::remove_class(&els.wallet_modal, "hidden");
}

pub fn close_wallet_modal(els: &Elements) {
    dom::add_class(&els.wallet_modal, "hidden");
}

/// Attach a connect handler to every freshly rendered `.wallet-option`.
fn wire_wallet_options(els: &Elements) {
    for option in dom::query_all_within(&els.wallet_modal_content, ".wallet-option") {
        let Some(kind) = option
            .get_attribute("data-wallet")
            .and_then(|id| id.parse::<ProviderKind>().ok())
        else {
            continue;
        };
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            connect_flow(kind);
        }) as Box<dyn FnMut(_)>);
        option
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
}

/// Kick off a connect attempt. Failure toasts arrive via the
/// `ConnectionFailed` event; a missing extension also opens its
/// install page.
pub fn connect_flow(kind: ProviderKind) {
    spawn_local(async move {
        let session = state::session();
        match session.connect(kind).await {
            Ok(()) => {}
            Err(SessionError::ProviderNotInstalled(kind)) => {
                if let Some(url) = kind.install_url() {
                    let _ = dom::window().open_with_url_and_target(url, "_blank");
                }
            }
            Err(SessionError::AlreadyConnecting) => {
                notify::info("A connection attempt is already in progress");
            }
            Err(e) => {
                error!("wallet connect failed:", e.to_string());
            }
        }
    });
}

pub fn disconnect_flow() {
    spawn_local(async move {
        state::session().disconnect().await;
    });
}

// ── Dropdown actions ──

pub fn copy_address(els: &Elements) {
    let Some(address) = state::session().address() else {
        return;
    };
    let els = els.clone();
    spawn_local(async move {
        let clipboard = dom::window().navigator().clipboard();
        match JsFuture::from(clipboard.write_text(&address)).await {
            Ok(_) => notify::success("Address copied to clipboard"),
            Err(_) => notify::error("Could not copy address"),
        }
        dom::add_class(&els.wallet_dropdown, "hidden");
    });
}

pub fn show_network_info(els: &Elements) {
    let network = state::session().network();
    notify::info(&format!(
        "Network: Solana {} ({})",
        network.name, network.symbol
    ));
    dom::add_class(&els.wallet_dropdown, "hidden");
}

pub fn toggle_dropdown(els: &Elements) {
    dom::toggle_class(&els.wallet_dropdown, "hidden");
}
