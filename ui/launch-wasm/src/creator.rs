//! Token creator wizard.
//!
//! A four-step form (`#step-1` .. `#step-4`) with a `.step-item` progress
//! indicator, a growable milestone list and a deployment-success panel.
//! Pure client-side flow; no chain transaction is issued here.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::dom::{self, Elements};
use crate::notify;

const STEP_COUNT: u32 = 4;

pub fn bind_events(_els: &Elements) {
    // The wizard only exists on the creator page; bind whatever is present.
    for button in dom::query_all("[data-step-next]") {
        if let Some(step) = step_attr(&button, "data-step-next") {
            on_element_click(&button, move || next_step(step));
        }
    }
    for button in dom::query_all("[data-step-prev]") {
        if let Some(step) = step_attr(&button, "data-step-prev") {
            on_element_click(&button, move || prev_step(step));
        }
    }
    if let Some(deploy) = dom::by_id("deploy-token-button") {
        on_element_click(&deploy, deploy_token);
    }
    if let Some(reset) = dom::by_id("reset-token-creator") {
        on_element_click(&reset, reset_creator);
    }
    if let Some(add) = dom::by_id("add-milestone-button") {
        on_element_click(&add, add_milestone);
    }
}

fn step_attr(el: &Element, attr: &str) -> Option<u32> {
    el.get_attribute(attr)?.parse().ok()
}

fn on_element_click(el: &Element, mut handler: impl FnMut() + 'static) {
    let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
        handler();
    }) as Box<dyn FnMut(_)>);
    el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
        .unwrap();
    cb.forget();
}

fn step_panel(step: u32) -> Option<Element> {
    dom::by_id(&format!("step-{step}"))
}

fn step_items() -> Vec<Element> {
    dom::query_all(".step-item")
}

/// Advance from `current` to the next step panel.
pub fn next_step(current: u32) {
    if current < 1 || current >= STEP_COUNT {
        return;
    }
    if let Some(panel) = step_panel(current) {
        dom::remove_class(&panel, "active");
    }
    if let Some(panel) = step_panel(current + 1) {
        dom::add_class(&panel, "active");
    }

    let items = step_items();
    if let Some(item) = items.get(current as usize) {
        dom::add_class(item, "active");
    }
    if let Some(item) = items.get(current as usize - 1) {
        dom::add_class(item, "completed");
    }
}

/// Go back from `current` to the previous step panel.
pub fn prev_step(current: u32) {
    if current <= 1 {
        return;
    }
    if let Some(panel) = step_panel(current) {
        dom::remove_class(&panel, "active");
    }
    if let Some(panel) = step_panel(current - 1) {
        dom::add_class(&panel, "active");
    }

    if let Some(item) = step_items().get(current as usize - 1) {
        dom::remove_class(item, "active");
    }
}

/// Swap the final step for the success panel and mark the wizard done.
pub fn deploy_token() {
    if let Some(panel) = step_panel(STEP_COUNT) {
        dom::remove_class(&panel, "active");
    }
    if let Some(success) = dom::by_id("deployment-success") {
        dom::add_class(&success, "active");
    }
    if let Some(item) = step_items().last() {
        dom::add_class(item, "completed");
    }
    notify::success("Token deployed");
}

/// Back to step one with a clean progress indicator.
pub fn reset_creator() {
    if let Some(success) = dom::by_id("deployment-success") {
        dom::remove_class(&success, "active");
    }
    if let Some(panel) = step_panel(1) {
        dom::add_class(&panel, "active");
    }
    for (index, item) in step_items().iter().enumerate() {
        dom::set_class(item, "active", index == 0);
        dom::remove_class(item, "completed");
    }
}

// ── Milestones ──

pub fn add_milestone() {
    let Some(container) = dom::by_id("milestones-container") else {
        return;
    };
    let number = container.children().length() + 1;

    let item = dom::create_element("div");
    item.set_class_name("milestone-item p-6 bg-dark-500 rounded-lg mb-4");
    item.set_inner_html(&format!(
        "<div class=\"flex justify-between items-center mb-4\">\
           <h4 class=\"font-medium\">Milestone {number}</h4>\
           <button class=\"milestone-remove text-gray-400 hover:text-white\">\u{2715}</button>\
         </div>\
         <div class=\"grid grid-cols-1 md:grid-cols-2 gap-4\">\
           <div><label class=\"block text-gray-400 text-sm mb-2\">Title</label>\
             <input type=\"text\" class=\"input-field\" placeholder=\"e.g. Prototype Development\"></div>\
           <div><label class=\"block text-gray-400 text-sm mb-2\">Funding</label>\
             <input type=\"text\" class=\"input-field\" placeholder=\"0\"></div>\
           <div><label class=\"block text-gray-400 text-sm mb-2\">Deadline</label>\
             <input type=\"date\" class=\"input-field\"></div>\
           <div><label class=\"block text-gray-400 text-sm mb-2\">Completion Criteria</label>\
             <select class=\"input-field\">\
               <option>Community Vote</option>\
               <option>Team Confirmation</option>\
               <option>Smart Contract Verification</option>\
             </select></div>\
           <div class=\"md:col-span-2\">\
             <label class=\"block text-gray-400 text-sm mb-2\">Description</label>\
             <textarea class=\"input-field\" rows=\"3\" \
               placeholder=\"Describe what will be delivered...\"></textarea></div>\
         </div>"
    ));
    let _ = container.append_child(&item);

    if let Some(remove) = item.query_selector(".milestone-remove").ok().flatten() {
        let item = item.clone();
        on_element_click(&remove, move || {
            item.remove();
            renumber_milestones();
        });
    }
}

fn renumber_milestones() {
    for (index, item) in dom::query_all(".milestone-item").iter().enumerate() {
        if let Some(heading) = item.query_selector("h4").ok().flatten() {
            dom::set_text(&heading, &format!("Milestone {}", index + 1));
        }
    }
}
