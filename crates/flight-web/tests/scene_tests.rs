// Host-side tests for the page scene state.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod nav {
    include!("../src/nav.rs");
}
mod scene {
    include!("../src/scene.rs");
}

use flight_core::{
    ElementEvent, PathKind, SceneGroup, Section, Selection, TransitionParams,
};
use nav::NavAction;
use scene::SceneState;

const FRAME: f32 = 1.0 / 60.0;

fn scene() -> SceneState {
    let mut params = TransitionParams::default();
    params.tunnel.particle_count = 128;
    SceneState::new(&params, Selection::default()).unwrap()
}

fn land(s: &mut SceneState) -> flight_core::TransitionComplete {
    for _ in 0..60 * 60 {
        if let Some(done) = s.frame(FRAME).completed {
            return done;
        }
    }
    panic!("flight never landed");
}

#[test]
fn opens_at_rest_on_the_initial_section() {
    let s = scene();
    assert!(!s.machine().is_transitioning());
    assert!(s.composer().is_mounted(SceneGroup::ProjectHolograms));
    assert_eq!(s.selection(), Selection::default());
}

#[test]
fn nav_jump_flies_through_the_tunnel() {
    let mut s = scene();
    assert!(s.apply(NavAction::GoTo(Section::About)).unwrap());
    assert_eq!(s.machine().run().unwrap().kind(), PathKind::Staged);
    let mut saw_tunnel = false;
    let done = loop {
        let report = s.frame(FRAME);
        saw_tunnel |= s.composer().is_mounted(SceneGroup::SpaceTravel);
        if let Some(done) = report.completed {
            break done;
        }
        assert!(report.transitioning);
    };
    assert!(saw_tunnel);
    assert_eq!(done.selection.section, Section::About);
    assert!(s.composer().is_mounted(SceneGroup::TeamConstellation));
    assert!(s.composer().user_control_enabled());
}

#[test]
fn expanding_a_project_opens_the_detail_view() {
    let mut s = scene();
    let event = s.element_selected(1).unwrap();
    assert_eq!(event, Some(ElementEvent::ProjectToggled { id: 1, expanded: true }));
    assert!(s.selection().exploring);
    assert_eq!(s.machine().run().unwrap().kind(), PathKind::Direct);
    // same-section move keeps the holograms on screen
    assert!(s.composer().is_mounted(SceneGroup::ProjectHolograms));
    land(&mut s);

    let event = s.element_selected(1).unwrap();
    assert_eq!(event, Some(ElementEvent::ProjectToggled { id: 1, expanded: false }));
    assert!(!s.selection().exploring);
}

#[test]
fn clock_only_moves_forward() {
    let mut s = scene();
    s.frame(0.5);
    s.frame(f32::NAN);
    s.frame(-1.0);
    assert_eq!(s.clock(), 0.5);
    assert_eq!(s.leaf_positions().len(), 10);
}

#[test]
fn leaves_follow_frames() {
    let mut s = scene();
    let start = s.leaf_positions();
    for _ in 0..4 {
        s.frame(0.5);
    }
    assert_eq!(s.clock(), 2.0);
    assert_ne!(s.leaf_positions(), start);
}

#[test]
fn frame_loop_is_claimed_once() {
    let mut s = scene();
    assert!(s.claim_frame_loop());
    assert!(!s.claim_frame_loop());
    assert!(!s.claim_frame_loop());
}
