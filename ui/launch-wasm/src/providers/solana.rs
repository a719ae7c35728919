//! Phantom and Solflare share the injected Solana-provider surface:
//! `connect()` resolving to a public key, `disconnect()`, and
//! `connect`/`disconnect`/`accountChanged` events. One implementation
//! covers both; only the lookup path and the `isPhantom` check differ.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use js_sys::Array;
use unifa_session::{ProviderEvent, ProviderEventHandler, ProviderKind, SessionError, WalletProvider};
use wasm_bindgen::prelude::*;

use super::injected;
use super::map_provider_error;

pub struct InjectedSolanaProvider {
    kind: ProviderKind,
    raw: JsValue,
    handler: Rc<RefCell<Option<ProviderEventHandler>>>,
    bound: Cell<bool>,
    // Keeps the JS-facing closures alive for the page lifetime. They are
    // never dropped while registered: the extension may be mid-dispatch.
    listeners: RefCell<Vec<Closure<dyn FnMut(JsValue)>>>,
}

impl InjectedSolanaProvider {
    /// `window.phantom.solana`, guarded by its `isPhantom` flag.
    pub fn phantom() -> Option<Rc<Self>> {
        let raw = injected::injected_object("phantom.solana")?;
        if !injected::bool_flag(&raw, "isPhantom") {
            return None;
        }
        Some(Self::new(ProviderKind::Phantom, raw))
    }

    /// `window.solflare`.
    pub fn solflare() -> Option<Rc<Self>> {
        let raw = injected::injected_object("solflare")?;
        Some(Self::new(ProviderKind::Solflare, raw))
    }

    fn new(kind: ProviderKind, raw: JsValue) -> Rc<Self> {
        Rc::new(InjectedSolanaProvider {
            kind,
            raw,
            handler: Rc::new(RefCell::new(None)),
            bound: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
        })
    }

    /// Attach the extension's event listeners once. The closures forward
    /// into the current handler slot, so `unsubscribe` only has to empty
    /// the slot.
    fn bind_listeners(&self) {
        if self.bound.get() {
            return;
        }
        self.bound.set(true);

        let mut listeners = self.listeners.borrow_mut();

        let slot = Rc::clone(&self.handler);
        let on_connect = Closure::wrap(Box::new(move |_: JsValue| {
            let handler = slot.borrow().clone();
            if let Some(handler) = handler {
                handler(ProviderEvent::Connect);
            }
        }) as Box<dyn FnMut(JsValue)>);
        injected::on(&self.raw, "connect", &on_connect);
        listeners.push(on_connect);

        let slot = Rc::clone(&self.handler);
        let on_disconnect = Closure::wrap(Box::new(move |_: JsValue| {
            let handler = slot.borrow().clone();
            if let Some(handler) = handler {
                handler(ProviderEvent::Disconnect);
            }
        }) as Box<dyn FnMut(JsValue)>);
        injected::on(&self.raw, "disconnect", &on_disconnect);
        listeners.push(on_disconnect);

        let slot = Rc::clone(&self.handler);
        let on_account_changed = Closure::wrap(Box::new(move |payload: JsValue| {
            let handler = slot.borrow().clone();
            if let Some(handler) = handler {
                handler(ProviderEvent::AccountChanged(injected::changed_account(
                    &payload,
                )));
            }
        }) as Box<dyn FnMut(JsValue)>);
        injected::on(&self.raw, "accountChanged", &on_account_changed);
        listeners.push(on_account_changed);
    }
}

#[async_trait(?Send)]
impl WalletProvider for InjectedSolanaProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn is_connected(&self) -> bool {
        injected::bool_flag(&self.raw, "isConnected")
    }

    async fn connect(&self) -> Result<String, SessionError> {
        let resp = injected::call_async(&self.raw, "connect", &Array::new())
            .await
            .map_err(|e| map_provider_error(&e))?;

        let public_key = injected::get_prop(&resp, "publicKey")
            .ok_or_else(|| SessionError::Unknown(format!("no public key returned from {}", self.kind)))?;
        injected::account_address(&public_key)
            .ok_or_else(|| SessionError::Unknown(format!("no public key returned from {}", self.kind)))
    }

    async fn disconnect(&self) {
        if injected::has_method(&self.raw, "disconnect") {
            let _ = injected::call_async(&self.raw, "disconnect", &Array::new()).await;
        }
    }

    fn subscribe(&self, handler: ProviderEventHandler) {
        *self.handler.borrow_mut() = Some(handler);
        self.bind_listeners();
    }

    fn unsubscribe(&self) {
        *self.handler.borrow_mut() = None;
    }
}
