//! Toast notifications, bottom-right, one at a time. A fresh toast
//! replaces whatever is still on screen.

use std::cell::RefCell;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::dom;

#[derive(Clone, Copy)]
pub enum NotifyKind {
    Success,
    Error,
    Info,
}

impl NotifyKind {
    fn background_class(self) -> &'static str {
        match self {
            NotifyKind::Success => "bg-success-500",
            NotifyKind::Error => "bg-danger-500",
            NotifyKind::Info => "bg-primary-500",
        }
    }
}

thread_local! {
    static CURRENT: RefCell<Option<HtmlElement>> = const { RefCell::new(None) };
    static TIMERS: RefCell<Vec<Timeout>> = const { RefCell::new(Vec::new()) };
}

pub fn success(message: &str) {
    show(NotifyKind::Success, message);
}

pub fn error(message: &str) {
    show(NotifyKind::Error, message);
}

pub fn info(message: &str) {
    show(NotifyKind::Info, message);
}

pub fn show(kind: NotifyKind, message: &str) {
    dismiss_current();

    let Ok(el) = dom::create_element("div").dyn_into::<HtmlElement>() else {
        return;
    };
    el.set_class_name(&format!(
        "fixed bottom-4 right-4 {} text-white px-6 py-3 rounded-lg shadow-lg z-50 \
         transition-opacity duration-300 opacity-0",
        kind.background_class()
    ));
    el.set_text_content(Some(message));

    if let Some(body) = dom::document().body() {
        let _ = body.append_child(&el);
    }

    // Fade in on the next tick, fade out after three seconds, then remove.
    let fade_in = {
        let el = el.clone();
        Timeout::new(10, move || {
            let _ = el.class_list().remove_1("opacity-0");
        })
    };
    let fade_out = {
        let el = el.clone();
        Timeout::new(3_000, move || {
            let _ = el.class_list().add_1("opacity-0");
            let el = el.clone();
            let remove = Timeout::new(300, move || {
                el.remove();
                CURRENT.with(|c| {
                    let mut current = c.borrow_mut();
                    if current.as_ref() == Some(&el) {
                        *current = None;
                    }
                });
            });
            TIMERS.with(|t| t.borrow_mut().push(remove));
        })
    };
    TIMERS.with(|t| {
        let mut timers = t.borrow_mut();
        timers.clear();
        timers.push(fade_in);
        timers.push(fade_out);
    });
    CURRENT.with(|c| *c.borrow_mut() = Some(el));
}

fn dismiss_current() {
    TIMERS.with(|t| t.borrow_mut().clear());
    CURRENT.with(|c| {
        if let Some(el) = c.borrow_mut().take() {
            el.remove();
        }
    });
}
