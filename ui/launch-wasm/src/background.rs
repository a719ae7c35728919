//! Full-page particle field behind the landing content.
//!
//! Drifting points joined by short links, with a slight parallax pull
//! towards the pointer. Drawn on a 2D canvas appended to the
//! `#background-animation` container and resized with the window.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

use crate::dom;

const PARTICLE_COUNT: usize = 140;
const LINK_DISTANCE: f64 = 110.0;
const POINT_COLOR: &str = "rgba(0, 115, 245, 0.8)";
const LINK_COLOR: &str = "rgba(93, 21, 245, 0.2)";
const PARALLAX_STRENGTH: f64 = 40.0;

struct Particle {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    radius: f64,
}

struct Field {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    particles: Vec<Particle>,
    // Pointer position normalised to [-1, 1] around the viewport centre.
    mouse_x: f64,
    mouse_y: f64,
    // Eased parallax offset trailing the pointer.
    offset_x: f64,
    offset_y: f64,
}

impl Field {
    fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Field {
        let mut field = Field {
            canvas,
            ctx,
            particles: Vec::with_capacity(PARTICLE_COUNT),
            mouse_x: 0.0,
            mouse_y: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        field.fit_viewport();
        let (w, h) = field.size();
        for _ in 0..PARTICLE_COUNT {
            field.particles.push(Particle {
                x: js_sys::Math::random() * w,
                y: js_sys::Math::random() * h,
                vx: (js_sys::Math::random() - 0.5) * 0.6,
                vy: (js_sys::Math::random() - 0.5) * 0.6,
                radius: 1.0 + js_sys::Math::random() * 1.5,
            });
        }
        field
    }

    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn fit_viewport(&mut self) {
        let window = dom::window();
        let w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1280.0);
        let h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(720.0);
        self.canvas.set_width(w as u32);
        self.canvas.set_height(h as u32);
    }

    fn step(&mut self) {
        let (w, h) = self.size();

        self.offset_x += (self.mouse_x * PARALLAX_STRENGTH - self.offset_x) * 0.05;
        self.offset_y += (self.mouse_y * PARALLAX_STRENGTH - self.offset_y) * 0.05;

        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            if p.x < 0.0 || p.x > w {
                p.vx = -p.vx;
            }
            if p.y < 0.0 || p.y > h {
                p.vy = -p.vy;
            }
        }
    }

    fn draw(&self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w, h);
        self.ctx.save();
        let _ = self.ctx.translate(self.offset_x, self.offset_y);

        self.ctx.set_stroke_style_str(LINK_COLOR);
        self.ctx.set_line_width(1.0);
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let dx = a.x - b.x;
                let dy = a.y - b.y;
                if dx * dx + dy * dy < LINK_DISTANCE * LINK_DISTANCE {
                    self.ctx.begin_path();
                    self.ctx.move_to(a.x, a.y);
                    self.ctx.line_to(b.x, b.y);
                    self.ctx.stroke();
                }
            }
        }

        self.ctx.set_fill_style_str(POINT_COLOR);
        for p in &self.particles {
            self.ctx.begin_path();
            let _ = self
                .ctx
                .arc(p.x, p.y, p.radius, 0.0, std::f64::consts::TAU);
            self.ctx.fill();
        }

        self.ctx.restore();
    }
}

/// Spin up the background animation. No-op when the container is absent.
pub fn start() {
    let Some(container) = dom::by_id_typed::<HtmlElement>("background-animation") else {
        return;
    };

    let Ok(canvas) = dom::create_element("canvas").dyn_into::<HtmlCanvasElement>() else {
        return;
    };
    let _ = container.append_child(&canvas);

    let Ok(Some(ctx_obj)) = canvas.get_context("2d") else {
        return;
    };
    let Ok(ctx) = ctx_obj.dyn_into::<CanvasRenderingContext2d>() else {
        return;
    };

    let field = Rc::new(RefCell::new(Field::new(canvas, ctx)));

    // Pointer tracking for the parallax offset.
    {
        let field = Rc::clone(&field);
        let cb = Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
            let window = dom::window();
            let w = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(1.0)
                .max(1.0);
            let h = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(1.0)
                .max(1.0);
            let mut field = field.borrow_mut();
            field.mouse_x = (e.client_x() as f64 / w) * 2.0 - 1.0;
            field.mouse_y = (e.client_y() as f64 / h) * 2.0 - 1.0;
        }) as Box<dyn FnMut(_)>);
        let _ = dom::window()
            .add_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref());
        cb.forget();
    }

    // Keep the canvas matched to the viewport.
    {
        let field = Rc::clone(&field);
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            field.borrow_mut().fit_viewport();
        }) as Box<dyn FnMut(_)>);
        let _ = dom::window()
            .add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
        cb.forget();
    }

    // requestAnimationFrame loop; the closure re-schedules itself.
    let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let frame2 = Rc::clone(&frame);
    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        {
            let mut field = field.borrow_mut();
            field.step();
            field.draw();
        }
        if let Some(cb) = frame2.borrow().as_ref() {
            let _ = dom::window().request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let Some(cb) = frame.borrow().as_ref() {
        let _ = dom::window().request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
