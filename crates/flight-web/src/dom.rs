use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::{NAV_ATTRIBUTE, NAV_SELECTOR, TRANSITIONING_CLASS};

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Call `handler` with the `data-section` value of any nav link clicked.
pub fn wire_nav_links(document: &web::Document, handler: impl FnMut(String) + 'static) {
    let links = match document.query_selector_all(NAV_SELECTOR) {
        Ok(list) => list,
        Err(e) => {
            log::warn!("nav query failed: {:?}", e);
            return;
        }
    };
    let handler = std::rc::Rc::new(std::cell::RefCell::new(handler));
    for i in 0..links.length() {
        let Some(el) = links.item(i).and_then(|n| n.dyn_into::<web::Element>().ok()) else {
            continue;
        };
        let Some(raw) = el.get_attribute(NAV_ATTRIBUTE) else {
            continue;
        };
        let handler = handler.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
            ev.prevent_default();
            (handler.borrow_mut())(raw.clone());
        }) as Box<dyn FnMut(_)>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
    log::info!("wired {} nav links", links.length());
}

/// Toggle the body class the page chrome keys its fade on.
pub fn set_transitioning_class(document: &web::Document, on: bool) {
    if let Some(body) = document.body() {
        let _ = body.class_list().toggle_with_force(TRANSITIONING_CLASS, on);
    }
}

#[inline]
pub fn location_hash() -> Option<String> {
    web::window().and_then(|w| w.location().hash().ok())
}
