//! MetaMask over `window.ethereum` (EIP-1193 `request` surface), pointed
//! at the Solana-compatible chain (id 101). A wrong chain triggers
//! `wallet_switchEthereumChain`, falling back to `wallet_addEthereumChain`
//! when the wallet reports code 4902 (chain unknown).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use gloo_console::warn;
use js_sys::{Array, Reflect};
use serde_json::json;
use unifa_session::network::{SOLANA_CHAIN_ID, SOLANA_MAINNET};
use unifa_session::{ProviderEvent, ProviderEventHandler, ProviderKind, SessionError, WalletProvider};
use wasm_bindgen::prelude::*;

use super::injected;
use super::map_provider_error;

const SOLANA_CHAIN_ID_HEX: &str = "0x65";

pub struct MetaMaskProvider {
    raw: JsValue,
    connected: Cell<bool>,
    handler: Rc<RefCell<Option<ProviderEventHandler>>>,
    bound: Cell<bool>,
    listeners: RefCell<Vec<Closure<dyn FnMut(JsValue)>>>,
}

impl MetaMaskProvider {
    /// `window.ethereum`, guarded by its `isMetaMask` flag.
    pub fn detect() -> Option<Rc<Self>> {
        let raw = injected::injected_object("ethereum")?;
        if !injected::bool_flag(&raw, "isMetaMask") {
            return None;
        }
        Some(Rc::new(MetaMaskProvider {
            raw,
            connected: Cell::new(false),
            handler: Rc::new(RefCell::new(None)),
            bound: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
        }))
    }

    async fn request(&self, body: serde_json::Value) -> Result<JsValue, JsValue> {
        let args = Array::of1(&injected::to_js(&body));
        injected::call_async(&self.raw, "request", &args).await
    }

    /// Make sure the wallet is on the Solana-compatible chain; switch or
    /// add it as needed. Any way this fails is a `NetworkMismatch`.
    async fn ensure_chain(&self) -> Result<(), SessionError> {
        let chain_hex = self
            .request(json!({ "method": "eth_chainId" }))
            .await
            .map_err(|e| map_provider_error(&e))?
            .as_string()
            .unwrap_or_default();
        let chain_id = u64::from_str_radix(chain_hex.trim_start_matches("0x"), 16).unwrap_or(0);
        if chain_id == SOLANA_CHAIN_ID {
            return Ok(());
        }

        let switch = self
            .request(json!({
                "method": "wallet_switchEthereumChain",
                "params": [{ "chainId": SOLANA_CHAIN_ID_HEX }],
            }))
            .await;
        let Err(switch_err) = switch else { return Ok(()) };

        // 4902: the chain has not been added to this wallet yet.
        let code = Reflect::get(&switch_err, &"code".into())
            .ok()
            .and_then(|v| v.as_f64());
        if code != Some(4902.0) {
            warn!("failed to switch to Solana network", switch_err.clone());
            return Err(SessionError::NetworkMismatch);
        }

        self.request(json!({
            "method": "wallet_addEthereumChain",
            "params": [{
                "chainId": SOLANA_CHAIN_ID_HEX,
                "chainName": "Solana",
                "rpcUrls": [SOLANA_MAINNET.rpc_url],
                "nativeCurrency": { "name": "Solana", "symbol": "SOL", "decimals": 18 },
                "blockExplorerUrls": ["https://explorer.solana.com/"],
            }],
        }))
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!("failed to add Solana network", e.clone());
            SessionError::NetworkMismatch
        })
    }

    fn bind_listeners(&self) {
        if self.bound.get() {
            return;
        }
        self.bound.set(true);

        let mut listeners = self.listeners.borrow_mut();

        let slot = Rc::clone(&self.handler);
        let on_accounts_changed = Closure::wrap(Box::new(move |payload: JsValue| {
            let handler = slot.borrow().clone();
            if let Some(handler) = handler {
                handler(ProviderEvent::AccountChanged(injected::changed_account(
                    &payload,
                )));
            }
        }) as Box<dyn FnMut(JsValue)>);
        injected::on(&self.raw, "accountsChanged", &on_accounts_changed);
        listeners.push(on_accounts_changed);

        let slot = Rc::clone(&self.handler);
        let on_disconnect = Closure::wrap(Box::new(move |_: JsValue| {
            let handler = slot.borrow().clone();
            if let Some(handler) = handler {
                handler(ProviderEvent::Disconnect);
            }
        }) as Box<dyn FnMut(JsValue)>);
        injected::on(&self.raw, "disconnect", &on_disconnect);
        listeners.push(on_disconnect);
    }
}

#[async_trait(?Send)]
impl WalletProvider for MetaMaskProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::MetaMask
    }

    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    async fn connect(&self) -> Result<String, SessionError> {
        let accounts = self
            .request(json!({ "method": "eth_requestAccounts" }))
            .await
            .map_err(|e| map_provider_error(&e))?;
        let address = injected::changed_account(&accounts)
            .ok_or_else(|| SessionError::Unknown("no accounts provided by wallet".into()))?;

        self.ensure_chain().await?;

        self.connected.set(true);
        Ok(address)
    }

    async fn disconnect(&self) {
        // MetaMask has no programmatic disconnect; forget the connection.
        self.connected.set(false);
    }

    fn subscribe(&self, handler: ProviderEventHandler) {
        *self.handler.borrow_mut() = Some(handler);
        self.bind_listeners();
    }

    fn unsubscribe(&self) {
        *self.handler.borrow_mut() = None;
    }
}
