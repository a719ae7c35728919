//! Reflection helpers for objects wallet extensions inject into `window`.
//!
//! The injected APIs are untyped from our side, so everything goes through
//! `js_sys::Reflect`: property walks, method calls (promise-returning or
//! not) and `on(event, handler)` listener registration.

use js_sys::{Array, Function, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Walk a dot-separated path from `window` (e.g. `"phantom.solana"`).
/// Returns `None` if any segment is missing, null or undefined.
pub fn injected_object(path: &str) -> Option<JsValue> {
    let mut current: JsValue = crate::dom::window().into();
    for segment in path.split('.') {
        current = Reflect::get(&current, &JsValue::from_str(segment)).ok()?;
        if current.is_undefined() || current.is_null() {
            return None;
        }
    }
    Some(current)
}

pub fn bool_flag(obj: &JsValue, name: &str) -> bool {
    Reflect::get(obj, &name.into())
        .ok()
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

pub fn get_prop(obj: &JsValue, name: &str) -> Option<JsValue> {
    let v = Reflect::get(obj, &name.into()).ok()?;
    if v.is_undefined() || v.is_null() { None } else { Some(v) }
}

/// Call `obj.method(args…)` synchronously.
pub fn call(obj: &JsValue, method: &str, args: &Array) -> Result<JsValue, JsValue> {
    let f: Function = Reflect::get(obj, &method.into())?
        .dyn_into()
        .map_err(|_| JsValue::from_str(&format!("{method} is not a function")))?;
    f.apply(obj, args)
}

/// Call `obj.method(args…)` and await the result when it is a promise.
pub async fn call_async(obj: &JsValue, method: &str, args: &Array) -> Result<JsValue, JsValue> {
    let ret = call(obj, method, args)?;
    match ret.dyn_into::<Promise>() {
        Ok(promise) => JsFuture::from(promise).await,
        Err(value) => Ok(value),
    }
}

pub fn has_method(obj: &JsValue, method: &str) -> bool {
    Reflect::get(obj, &method.into())
        .map(|v| v.is_function())
        .unwrap_or(false)
}

/// Register a one-argument listener via `obj.on(event, handler)`.
pub fn on(obj: &JsValue, event: &str, handler: &Closure<dyn FnMut(JsValue)>) {
    let args = Array::of2(&event.into(), handler.as_ref().unchecked_ref());
    let _ = call(obj, "on", &args);
}

/// Register a two-argument listener (`(error, payload)` callback shape,
/// used by the WalletConnect bridge).
pub fn on2(obj: &JsValue, event: &str, handler: &Closure<dyn FnMut(JsValue, JsValue)>) {
    let args = Array::of2(&event.into(), handler.as_ref().unchecked_ref());
    let _ = call(obj, "on", &args);
}

/// Best-effort extraction of an account address: plain strings pass
/// through, public-key objects are rendered via their `toBase58`.
pub fn account_address(value: &JsValue) -> Option<String> {
    if let Some(s) = value.as_string() {
        return Some(s);
    }
    if has_method(value, "toBase58") {
        if let Ok(rendered) = call(value, "toBase58", &Array::new()) {
            return rendered.as_string();
        }
    }
    None
}

/// Normalise an `accountChanged`-style payload (a single account, an
/// account array, or nothing) into `Option<address>`.
pub fn changed_account(payload: &JsValue) -> Option<String> {
    if payload.is_undefined() || payload.is_null() {
        return None;
    }
    if let Some(arr) = payload.dyn_ref::<Array>() {
        if arr.length() == 0 {
            return None;
        }
        return account_address(&arr.get(0));
    }
    account_address(payload)
}

/// Serialise JSON parameters into a plain JS object (not an ES map),
/// which is what the injected request APIs expect.
pub fn to_js(value: &serde_json::Value) -> JsValue {
    use serde::Serialize;
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::UNDEFINED)
}
