//! unifa.launch browser frontend
//!
//! Pure Rust + WASM implementation of the token-launch site's interaction
//! layer: page navigation, wallet connection, decorative canvases and the
//! token/DAO statistics charts. Modularised per concern; the wallet session
//! state machine itself lives in the `unifa-session` crate.

pub mod animate;
pub mod background;
pub mod charts;
pub mod creator;
pub mod dom;
pub mod events;
pub mod nav;
pub mod notify;
pub mod providers;
pub mod rpc;
pub mod state;
pub mod wallet_ui;

use std::rc::Rc;

use gloo_console::log;
use unifa_session::network::DEFAULT_NETWORK;
use unifa_session::{ProviderKind, WalletSession};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// WASM entry point, called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init()
}

/// Main initialisation sequence (runs once per page load).
fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;

    // Detect injected wallet extensions and build the session around them.
    let registry = providers::detect_registry();
    if registry.is_installed(ProviderKind::Phantom) || registry.is_installed(ProviderKind::Solflare)
    {
        log!("Solana wallet detected");
    } else {
        log!("No Solana wallet detected");
        notify::info("No Solana wallet detected. Please install Phantom or another Solana wallet.");
    }
    state::set_session(WalletSession::new(
        registry,
        DEFAULT_NETWORK,
        Rc::new(|task| spawn_local(task)),
    ));

    // Route session events into the UI, then paint the initial state.
    wallet_ui::bind_session(&els);
    wallet_ui::render(&els);

    // Page navigation (honours the URL hash on load).
    nav::init(&els);

    // Bind all event listeners
    events::bind_events(&els);

    // Decorative layers and statistics.
    background::start();
    animate::start();
    charts::init_charts();

    Ok(())
}
