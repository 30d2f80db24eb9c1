use std::cell::RefCell;
use std::rc::Rc;

use instant::Instant;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

use crate::dom;
use crate::scene::{FrameReport, SceneState};

pub type CompleteCallback = Rc<RefCell<Option<js_sys::Function>>>;

/// Advance the scene one frame and fire the JS completion callback if the
/// flight landed. Shared by the RAF loop and `LandingScene::tick`.
pub fn step_scene(
    scene: &Rc<RefCell<SceneState>>,
    on_complete: &CompleteCallback,
    dt: f32,
) -> FrameReport {
    let report = scene.borrow_mut().frame(dt);
    if let Some(done) = &report.completed {
        // cloned so the callback may replace itself
        let callback = on_complete.borrow().clone();
        if let Some(cb) = callback {
            let section = JsValue::from_str(done.selection.section.as_str());
            let exploring = JsValue::from_bool(done.selection.exploring);
            if let Err(e) = cb.call2(&JsValue::NULL, &section, &exploring) {
                log::error!("transition-complete callback failed: {:?}", e);
            }
        }
    }
    report
}

pub struct FrameContext {
    pub scene: Rc<RefCell<SceneState>>,
    pub on_complete: CompleteCallback,
    pub render: js_sys::Function,
    pub document: web::Document,
    pub last_instant: Instant,
    pub was_transitioning: bool,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;
        let dt_sec = dt.as_secs_f32();

        let report = step_scene(&self.scene, &self.on_complete, dt_sec);
        if report.transitioning != self.was_transitioning {
            dom::set_transitioning_class(&self.document, report.transitioning);
            self.was_transitioning = report.transitioning;
        }

        if let Err(e) = self
            .render
            .call1(&JsValue::NULL, &JsValue::from_f64(dt_sec as f64))
        {
            log::error!("render callback failed: {:?}", e);
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
