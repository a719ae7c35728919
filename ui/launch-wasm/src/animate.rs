//! Hero canvas, stat counters and scroll-triggered reveals.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Element, HtmlCanvasElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit,
};

use crate::dom;

const STATS_DURATION_MS: f64 = 2_000.0;

pub fn start() {
    start_hero_canvas();
    animate_stats();
    init_scroll_animations();
}

// ── Hero particle cloud ──

/// Slowly rotating 3D point cloud on `#hero-canvas`, projected onto the
/// 2D context with a simple perspective divide.
fn start_hero_canvas() {
    let Some(canvas) = dom::by_id_typed::<HtmlCanvasElement>("hero-canvas") else {
        return;
    };
    let Ok(Some(ctx_obj)) = canvas.get_context("2d") else {
        return;
    };
    let Ok(ctx) = ctx_obj.dyn_into::<CanvasRenderingContext2d>() else {
        return;
    };

    fit_to_viewport(&canvas);
    {
        let canvas = canvas.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            fit_to_viewport(&canvas);
        }) as Box<dyn FnMut(_)>);
        let _ = dom::window()
            .add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
        cb.forget();
    }

    // Unit-cube point cloud, rotated a little every frame.
    let points: Vec<(f64, f64, f64)> = (0..400)
        .map(|_| {
            (
                js_sys::Math::random() * 2.0 - 1.0,
                js_sys::Math::random() * 2.0 - 1.0,
                js_sys::Math::random() * 2.0 - 1.0,
            )
        })
        .collect();
    let angle = Rc::new(RefCell::new(0.0_f64));

    let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let frame2 = Rc::clone(&frame);
    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let w = canvas.width() as f64;
        let h = canvas.height() as f64;
        let a = {
            let mut angle = angle.borrow_mut();
            *angle += 0.001;
            *angle
        };

        ctx.clear_rect(0.0, 0.0, w, h);
        ctx.set_fill_style_str("rgba(0, 115, 245, 0.8)");
        let (sin, cos) = a.sin_cos();
        for &(x, y, z) in &points {
            let rx = x * cos + z * sin;
            let rz = z * cos - x * sin;
            // Camera sits at z = 2 looking down the axis.
            let depth = 2.0 - rz;
            if depth <= 0.1 {
                continue;
            }
            let scale = (h / 2.0) / depth;
            let px = w / 2.0 + rx * scale;
            let py = h / 2.0 + y * scale;
            let r = (2.5 / depth).max(0.5);
            ctx.begin_path();
            let _ = ctx.arc(px, py, r, 0.0, std::f64::consts::TAU);
            ctx.fill();
        }

        if let Some(cb) = frame2.borrow().as_ref() {
            let _ = dom::window().request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let Some(cb) = frame.borrow().as_ref() {
        let _ = dom::window().request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn fit_to_viewport(canvas: &HtmlCanvasElement) {
    let window = dom::window();
    if let Some(w) = window.inner_width().ok().and_then(|v| v.as_f64()) {
        canvas.set_width(w as u32);
    }
    if let Some(h) = window.inner_height().ok().and_then(|v| v.as_f64()) {
        canvas.set_height(h as u32);
    }
}

// ── Stat counters ──

struct Stat {
    element: Element,
    target: u64,
    format: fn(u64) -> String,
}

fn with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Count the landing-page stats up from zero over two seconds, ending on
/// their exact target values.
fn animate_stats() {
    let specs: [(&str, u64, fn(u64) -> String); 4] = [
        ("stats-projects", 125, |n| n.to_string()),
        ("stats-volume", 50, |n| format!("${n}M")),
        ("stats-users", 25_000, with_commas),
        ("stats-funds", 12, |n| format!("${n}M")),
    ];
    let stats: Vec<Stat> = specs
        .iter()
        .filter_map(|&(id, target, format)| {
            Some(Stat {
                element: dom::by_id(id)?,
                target,
                format,
            })
        })
        .collect();
    if stats.is_empty() {
        return;
    }

    let start: Rc<RefCell<Option<f64>>> = Rc::new(RefCell::new(None));
    let frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let frame2 = Rc::clone(&frame);
    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        let begun = *start.borrow_mut().get_or_insert(now);
        let progress = ((now - begun) / STATS_DURATION_MS).min(1.0);

        for stat in &stats {
            let current = (stat.target as f64 * progress).floor() as u64;
            dom::set_text(&stat.element, &(stat.format)(current));
        }

        if progress < 1.0 {
            if let Some(cb) = frame2.borrow().as_ref() {
                let _ = dom::window().request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(cb) = frame.borrow().as_ref() {
        let _ = dom::window().request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

// ── Scroll reveals ──

/// Fade `.animate-on-scroll` elements in once a tenth of their area has
/// scrolled into view, then stop watching them.
fn init_scroll_animations() {
    let targets = dom::query_all(".animate-on-scroll");
    if targets.is_empty() {
        return;
    }

    let observer: Rc<RefCell<Option<IntersectionObserver>>> = Rc::new(RefCell::new(None));
    let observer2 = Rc::clone(&observer);
    let cb = Closure::wrap(Box::new(move |entries: Vec<IntersectionObserverEntry>| {
        for entry in entries {
            if entry.is_intersecting() {
                let target = entry.target();
                dom::add_class(&target, "animate-fadeIn");
                if let Some(observer) = observer2.borrow().as_ref() {
                    observer.unobserve(&target);
                }
            }
        }
    }) as Box<dyn FnMut(Vec<IntersectionObserverEntry>)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(0.1));
    let Ok(obs) =
        IntersectionObserver::new_with_options(cb.as_ref().unchecked_ref(), &options)
    else {
        return;
    };
    cb.forget();

    for target in &targets {
        obs.observe(target);
    }
    *observer.borrow_mut() = Some(obs);
}
