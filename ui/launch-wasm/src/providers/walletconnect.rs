//! WalletConnect v1 bridge client built on the `window.WalletConnect`
//! constructor the page loads from a CDN. Sessions are established
//! through `createSession` and the address arrives via the `connect`
//! event, which is awaited through a hand-rolled promise.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use gloo_console::warn;
use js_sys::{Array, Function, Promise, Reflect};
use serde_json::json;
use unifa_session::network::{NetworkConfig, SOLANA_CHAIN_ID};
use unifa_session::{ProviderEvent, ProviderEventHandler, ProviderKind, SessionError, WalletProvider};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use super::injected;
use super::map_provider_error;

const BRIDGE_URL: &str = "https://bridge.walletconnect.org";

pub struct WalletConnectProvider {
    connector: JsValue,
    network: &'static NetworkConfig,
    handler: Rc<RefCell<Option<ProviderEventHandler>>>,
    bound: Cell<bool>,
    listeners: RefCell<Vec<Closure<dyn FnMut(JsValue, JsValue)>>>,
    // Settled by the `connect` event while `connect()` awaits it.
    pending: Rc<RefCell<Option<(Function, Function)>>>,
}

impl WalletConnectProvider {
    /// Instantiate a connector when the WalletConnect bundle is loaded.
    pub fn detect(network: &'static NetworkConfig) -> Option<Rc<Self>> {
        let ctor = injected::injected_object("WalletConnect")?;
        let ctor: Function = ctor.dyn_into().ok()?;

        let options = injected::to_js(&json!({
            "bridge": BRIDGE_URL,
            "chainId": SOLANA_CHAIN_ID,
        }));
        if let Some(modal) = injected::injected_object("QRCodeModal") {
            let _ = Reflect::set(&options, &"qrcodeModal".into(), &modal);
        }

        let connector = Reflect::construct(&ctor, &Array::of1(&options)).ok()?;
        let provider = Rc::new(WalletConnectProvider {
            connector: connector.into(),
            network,
            handler: Rc::new(RefCell::new(None)),
            bound: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
            pending: Rc::new(RefCell::new(None)),
        });
        // The connect event settles the pending promise, so the listeners
        // must be live before the first connect() call.
        provider.bind_listeners();
        Some(provider)
    }

    /// `payload.params[0].accounts[0]`, the shape WalletConnect hands to
    /// its `connect` and `session_update` callbacks.
    fn payload_account(payload: &JsValue) -> Option<String> {
        let params = Reflect::get(payload, &"params".into()).ok()?;
        let first = Array::from(&params).get(0);
        let accounts = Reflect::get(&first, &"accounts".into()).ok()?;
        injected::changed_account(&accounts)
    }

    fn bind_listeners(&self) {
        if self.bound.get() {
            return;
        }
        self.bound.set(true);

        let mut listeners = self.listeners.borrow_mut();

        let slot = Rc::clone(&self.handler);
        let pending = Rc::clone(&self.pending);
        let on_connect = Closure::wrap(Box::new(move |error: JsValue, payload: JsValue| {
            let settle = pending.borrow_mut().take();
            if !error.is_null() && !error.is_undefined() {
                if let Some((_, reject)) = settle {
                    let _ = reject.call1(&JsValue::NULL, &error);
                }
                return;
            }
            let account = Self::payload_account(&payload);
            if let Some((resolve, reject)) = settle {
                match &account {
                    Some(address) => {
                        let _ = resolve.call1(&JsValue::NULL, &JsValue::from_str(address));
                    }
                    None => {
                        let _ = reject.call1(
                            &JsValue::NULL,
                            &JsValue::from_str("no accounts in WalletConnect session"),
                        );
                    }
                }
            }
            let handler = slot.borrow().clone();
            if let Some(handler) = handler {
                handler(ProviderEvent::Connect);
            }
        })
            as Box<dyn FnMut(JsValue, JsValue)>);
        injected::on2(&self.connector, "connect", &on_connect);
        listeners.push(on_connect);

        let slot = Rc::clone(&self.handler);
        let on_session_update = Closure::wrap(Box::new(move |error: JsValue, payload: JsValue| {
            if !error.is_null() && !error.is_undefined() {
                warn!("WalletConnect session update failed", error.clone());
                return;
            }
            let handler = slot.borrow().clone();
            if let Some(handler) = handler {
                handler(ProviderEvent::AccountChanged(Self::payload_account(&payload)));
            }
        })
            as Box<dyn FnMut(JsValue, JsValue)>);
        injected::on2(&self.connector, "session_update", &on_session_update);
        listeners.push(on_session_update);

        let slot = Rc::clone(&self.handler);
        let on_disconnect = Closure::wrap(Box::new(move |_: JsValue, _: JsValue| {
            let handler = slot.borrow().clone();
            if let Some(handler) = handler {
                handler(ProviderEvent::Disconnect);
            }
        })
            as Box<dyn FnMut(JsValue, JsValue)>);
        injected::on2(&self.connector, "disconnect", &on_disconnect);
        listeners.push(on_disconnect);
    }

    fn existing_account(&self) -> Option<String> {
        let accounts = injected::get_prop(&self.connector, "accounts")?;
        injected::changed_account(&accounts)
    }
}

#[async_trait(?Send)]
impl WalletProvider for WalletConnectProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::WalletConnect
    }

    fn is_connected(&self) -> bool {
        injected::bool_flag(&self.connector, "connected")
    }

    async fn connect(&self) -> Result<String, SessionError> {
        if self.is_connected() {
            if let Some(address) = self.existing_account() {
                return Ok(address);
            }
        }

        let pending = Rc::clone(&self.pending);
        let settled = Promise::new(&mut |resolve, reject| {
            *pending.borrow_mut() = Some((resolve, reject));
        });

        let options = injected::to_js(&json!({
            "chainId": SOLANA_CHAIN_ID,
            "rpc": { (SOLANA_CHAIN_ID.to_string()): self.network.rpc_url },
        }));
        injected::call_async(&self.connector, "createSession", &Array::of1(&options))
            .await
            .map_err(|e| {
                self.pending.borrow_mut().take();
                map_provider_error(&e)
            })?;

        let address = JsFuture::from(settled)
            .await
            .map_err(|e| map_provider_error(&e))?;
        address
            .as_string()
            .ok_or_else(|| SessionError::Unknown("no accounts in WalletConnect session".into()))
    }

    async fn disconnect(&self) {
        if !self.is_connected() {
            return;
        }
        if let Err(e) =
            injected::call_async(&self.connector, "killSession", &Array::new()).await
        {
            warn!("WalletConnect killSession failed", e);
        }
    }

    fn subscribe(&self, handler: ProviderEventHandler) {
        *self.handler.borrow_mut() = Some(handler);
    }

    fn unsubscribe(&self) {
        *self.handler.borrow_mut() = None;
    }
}
