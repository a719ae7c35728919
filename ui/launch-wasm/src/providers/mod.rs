//! Wallet provider implementations over the injected browser globals.
//!
//! One module per wallet surface; all of them implement the
//! `unifa_session::WalletProvider` trait so the session can stay ignorant
//! of the per-extension quirks handled here.

pub mod injected;
pub mod metamask;
pub mod solana;
pub mod stubs;
pub mod walletconnect;

use gloo_console::log;
use js_sys::Reflect;
use unifa_session::network::DEFAULT_NETWORK;
use unifa_session::{ProviderRegistry, SessionError};
use wasm_bindgen::JsValue;

/// Probe the page for injected wallet objects and build the registry.
/// Kinds whose extension is absent are simply not registered; the two
/// unimplemented kinds get stub entries that fail on connect.
pub fn detect_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::default();

    if let Some(p) = solana::InjectedSolanaProvider::phantom() {
        log!("Phantom provider detected");
        registry.register(p);
    }
    if let Some(p) = solana::InjectedSolanaProvider::solflare() {
        log!("Solflare provider detected");
        registry.register(p);
    }
    if let Some(p) = metamask::MetaMaskProvider::detect() {
        log!("MetaMask provider detected");
        registry.register(p);
    }
    if let Some(p) = walletconnect::WalletConnectProvider::detect(DEFAULT_NETWORK) {
        log!("WalletConnect bridge available");
        registry.register(p);
    }
    registry.register(stubs::StubProvider::trust_wallet());
    registry.register(stubs::StubProvider::coinbase());

    registry
}

/// Map a raw JS provider error onto the session taxonomy. EIP-1193 code
/// 4001 and "user rejected" message texts become `UserRejected`; anything
/// else is carried through as an opaque reason.
pub fn map_provider_error(err: &JsValue) -> SessionError {
    let code = Reflect::get(err, &"code".into())
        .ok()
        .and_then(|v| v.as_f64());
    let message = Reflect::get(err, &"message".into())
        .ok()
        .and_then(|v| v.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"));

    if code == Some(4001.0) || message.to_ascii_lowercase().contains("user rejected") {
        return SessionError::UserRejected;
    }
    SessionError::Unknown(message)
}
