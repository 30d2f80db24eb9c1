#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;

use flight_core::{
    ElementEvent, Selection, SelectionRequest, TransitionParams, PARTICLE_COUNT,
};
use instant::Instant;
use wasm_bindgen::prelude::*;

mod constants;
mod dom;
mod events;
mod frame;
mod nav;
mod scene;

use frame::CompleteCallback;
use scene::SceneState;

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn initial_selection(section: Option<String>) -> anyhow::Result<Selection> {
    let from_hash = dom::location_hash().and_then(|h| nav::section_from_hash(&h));
    let section = match (section, from_hash) {
        (Some(name), _) => name.parse()?,
        (None, Some(section)) => section,
        (None, None) => return Ok(Selection::default()),
    };
    Ok(Selection::new(section, false))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("flight-web starting");
    Ok(())
}

/// Handle the page's renderer holds: feeds selections in, reads the camera
/// pose and particle buffer out once per frame.
#[wasm_bindgen]
pub struct LandingScene {
    scene: Rc<RefCell<SceneState>>,
    on_complete: CompleteCallback,
}

#[wasm_bindgen]
impl LandingScene {
    /// `section` defaults to the location hash, then to `projects`.
    #[wasm_bindgen(constructor)]
    pub fn new(section: Option<String>) -> Result<LandingScene, JsValue> {
        let initial = initial_selection(section).map_err(to_js)?;
        let scene = SceneState::new(&TransitionParams::default(), initial).map_err(to_js)?;
        log::info!("[scene] opened on {} with {} particles", initial, PARTICLE_COUNT);
        Ok(LandingScene {
            scene: Rc::new(RefCell::new(scene)),
            on_complete: Rc::new(RefCell::new(None)),
        })
    }

    /// Returns whether a flight was started.
    pub fn set_selection(&self, section: &str, exploring: bool, staged: bool) -> Result<bool, JsValue> {
        let section = section.parse().map_err(to_js)?;
        self.scene
            .borrow_mut()
            .select(Selection::new(section, exploring), staged)
            .map_err(to_js)
    }

    /// Same as a nav link: `section[:explore][:direct]`.
    pub fn navigate(&self, request: &str) -> Result<bool, JsValue> {
        let request: SelectionRequest = request.parse().map_err(to_js)?;
        self.scene.borrow_mut().request(request).map_err(to_js)
    }

    /// Manual stepping for pages that run their own loop. Returns `true` on
    /// the frame a flight lands.
    pub fn tick(&self, dt: f32) -> bool {
        frame::step_scene(&self.scene, &self.on_complete, dt)
            .completed
            .is_some()
    }

    pub fn camera_position(&self) -> Vec<f32> {
        self.scene.borrow().machine().pose().position.to_array().to_vec()
    }

    pub fn field_of_view(&self) -> f32 {
        self.scene.borrow().machine().pose().field_of_view
    }

    /// While `true` the renderer points the camera at the origin and disables orbit controls.
    pub fn look_at_origin(&self) -> bool {
        self.scene.borrow().machine().look_at().is_some()
    }

    pub fn is_transitioning(&self) -> bool {
        self.scene.borrow().machine().is_transitioning()
    }

    pub fn user_control_enabled(&self) -> bool {
        self.scene.borrow().composer().user_control_enabled()
    }

    pub fn tunnel_visible(&self) -> bool {
        self.scene.borrow().machine().tunnel().is_visible()
    }

    /// Copy of the particle buffer, `x, y, z` per particle.
    pub fn particles(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.scene.borrow().machine().tunnel().as_flat())
    }

    pub fn mounted_groups(&self) -> js_sys::Array {
        self.scene
            .borrow()
            .composer()
            .mounted_groups()
            .iter()
            .map(|g| JsValue::from_str(g.as_str()))
            .collect()
    }

    /// Click from a decorative element; returns a short event name or `undefined`.
    pub fn select_element(&self, id: u32) -> Result<Option<String>, JsValue> {
        let event = self
            .scene
            .borrow_mut()
            .element_selected(id)
            .map_err(to_js)?;
        Ok(event.map(|e| match e {
            ElementEvent::ProjectToggled { expanded: true, .. } => "expanded".to_string(),
            ElementEvent::ProjectToggled { expanded: false, .. } => "collapsed".to_string(),
        }))
    }

    pub fn set_hovered(&self, id: u32, hovered: bool) {
        self.scene.borrow_mut().set_hovered(id, hovered);
    }

    pub fn element_scale(&self, id: u32) -> f32 {
        self.scene.borrow().composer().element_scale(id)
    }

    /// Flattened `x, y, z` wander targets for the backdrop leaves.
    pub fn leaf_positions(&self) -> Vec<f32> {
        self.scene
            .borrow()
            .leaf_positions()
            .iter()
            .flat_map(|p| p.to_array())
            .collect()
    }

    /// `callback(section, exploring)` once per landed flight.
    pub fn on_transition_complete(&self, callback: js_sys::Function) {
        *self.on_complete.borrow_mut() = Some(callback);
    }

    /// Wire nav links and keys, then drive the scene from
    /// `requestAnimationFrame`, calling `render(dt)` after every step.
    /// Later calls are ignored.
    pub fn run(&self, render: js_sys::Function) -> Result<(), JsValue> {
        let document = dom::window_document().ok_or_else(|| to_js("no document"))?;
        if !self.scene.borrow_mut().claim_frame_loop() {
            log::warn!("[scene] run called again; frame loop already started");
            return Ok(());
        }

        let scene_nav = self.scene.clone();
        dom::wire_nav_links(&document, move |raw| {
            let result = raw
                .parse::<SelectionRequest>()
                .and_then(|r| scene_nav.borrow_mut().request(r));
            if let Err(e) = result {
                log::error!("nav {:?}: {}", raw, e);
            }
        });
        events::wire_global_keydown(self.scene.clone());

        let ctx = Rc::new(RefCell::new(frame::FrameContext {
            scene: self.scene.clone(),
            on_complete: self.on_complete.clone(),
            render,
            document,
            last_instant: Instant::now(),
            was_transitioning: false,
        }));
        frame::start_loop(ctx);
        Ok(())
    }
}
