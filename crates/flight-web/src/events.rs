use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::nav;
use crate::scene::SceneState;

pub fn handle_global_keydown(ev: &web::KeyboardEvent, scene: &Rc<RefCell<SceneState>>) {
    let Some(action) = nav::action_for_key(&ev.key()) else {
        return;
    };
    match scene.borrow_mut().apply(action) {
        Ok(true) => ev.prevent_default(),
        Ok(false) => {}
        Err(e) => log::error!("key {:?}: {}", ev.key(), e),
    }
}

pub fn wire_global_keydown(scene: Rc<RefCell<SceneState>>) {
    if let Some(window) = web::window() {
        let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
            handle_global_keydown(&ev, &scene);
        }) as Box<dyn FnMut(_)>);
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
