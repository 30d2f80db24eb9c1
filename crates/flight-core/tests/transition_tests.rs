// Host-side integration tests for the transition machine and camera path.

use flight_core::path::{CameraPath, PathStep, Waypoints};
use flight_core::*;
use glam::Vec3;

const FRAME: f32 = 1.0 / 60.0;
const TICK_CAP: usize = 60 * 120;

fn params() -> TransitionParams {
    let mut p = TransitionParams::default();
    p.tunnel.particle_count = 256;
    p
}

fn machine_at(selection: Selection) -> TransitionMachine {
    TransitionMachine::new(&params(), selection.arrival_pose())
        .unwrap()
        .with_initial_selection(selection)
}

/// Tick until the run completes; returns the completion and the tick count.
fn run_to_completion(m: &mut TransitionMachine) -> (TransitionComplete, usize) {
    for i in 0..TICK_CAP {
        if let Some(done) = m.tick(FRAME) {
            return (done, i + 1);
        }
    }
    panic!("run did not complete within {TICK_CAP} ticks");
}

#[test]
fn staged_request_builds_four_waypoints_for_every_selection() {
    for target in Selection::all() {
        let from = if target.section == Section::Projects && !target.exploring {
            Selection::new(Section::Contact, false)
        } else {
            Selection::default()
        };
        let mut m = machine_at(from);
        assert_eq!(m.state(), MachineState::Idle);
        assert!(m.on_selection_changed(target, true).unwrap());
        assert_eq!(m.state(), MachineState::Running);

        let run = m.run().expect("run");
        assert_eq!(run.kind(), PathKind::Staged);
        assert_eq!(run.waypoints().len(), 4);
        let last = run.final_target().unwrap();
        let expected = match (target.section, target.exploring) {
            (Section::About, _) => Vec3::new(0.0, 10.0, 20.0),
            (_, true) => Vec3::new(0.0, 8.0, 15.0),
            _ => Vec3::new(0.0, 15.0, 30.0),
        };
        assert_eq!(last.position, expected, "target {target}");
        assert_eq!(last.field_of_view, target.resting_fov());
        assert_eq!(m.look_at(), Some(Vec3::ZERO));
    }
}

#[test]
fn projects_to_about_staged_flight_lands_on_about_pose() {
    let mut m = TransitionMachine::new(&params(), Pose::new(Vec3::new(0.0, 15.0, 30.0), 60.0))
        .unwrap()
        .with_initial_selection(Selection::new(Section::Projects, false));
    let about = Selection::new(Section::About, false);
    m.on_selection_changed(about, true).unwrap();

    let mut max_fov: f32 = 0.0;
    let mut done = None;
    for _ in 0..TICK_CAP {
        let out = m.tick(FRAME);
        max_fov = max_fov.max(m.pose().field_of_view);
        if out.is_some() {
            done = out;
            break;
        }
    }
    let done = done.expect("completed");
    assert_eq!(done.selection, about);
    assert_eq!(done.kind, PathKind::Staged);
    assert!(!m.is_transitioning());
    assert_eq!(m.state(), MachineState::Idle);
    assert!(m.look_at().is_none());
    assert!(!m.tunnel().is_active());

    let pose = m.pose();
    assert!(
        pose.position.distance(Vec3::new(0.0, 10.0, 20.0)) < 0.1,
        "landed at {:?}",
        pose.position
    );
    assert!((pose.field_of_view - 60.0).abs() < 0.2, "fov {}", pose.field_of_view);
    // the tunnel widened the view on the way
    assert!(max_fov > 70.0, "max fov {max_fov}");
}

#[test]
fn tunnel_stage_lasts_its_duration_hint() {
    let mut m = machine_at(Selection::default());
    m.on_selection_changed(Selection::new(Section::Contact, false), true)
        .unwrap();
    let mut tunnel_ticks = 0;
    for _ in 0..TICK_CAP {
        if m.current_stage() == Some(2) {
            tunnel_ticks += 1;
        }
        if m.tick(FRAME).is_some() {
            break;
        }
    }
    let seconds = tunnel_ticks as f32 * FRAME;
    assert!((seconds - 3.0).abs() <= 2.0 * FRAME, "tunnel lasted {seconds}s");
}

#[test]
fn completion_fires_exactly_once() {
    let mut m = machine_at(Selection::default());
    m.on_selection_changed(Selection::new(Section::About, true), false)
        .unwrap();
    let (_, _) = run_to_completion(&mut m);
    for _ in 0..120 {
        assert!(m.tick(FRAME).is_none());
    }
}

#[test]
fn direct_move_uses_single_waypoint_and_exploring_fov() {
    let mut m = machine_at(Selection::default());
    let target = Selection::new(Section::Projects, true);
    m.on_selection_changed(target, false).unwrap();
    assert_eq!(m.run().unwrap().waypoints().len(), 1);
    assert!(m.look_at().is_none());
    let (done, ticks) = run_to_completion(&mut m);
    assert_eq!(done.kind, PathKind::Direct);
    assert!(ticks < 60 * 10);
    assert!(m.pose().position.distance(Vec3::new(0.0, 8.0, 15.0)) < 0.1);
    assert!((m.pose().field_of_view - 50.0).abs() < 0.2);
}

#[test]
fn replacing_mid_flight_keeps_one_run_and_a_continuous_pose() {
    let mut m = machine_at(Selection::default());
    m.on_selection_changed(Selection::new(Section::About, false), true)
        .unwrap();
    for _ in 0..90 {
        m.tick(FRAME);
    }
    assert!(m.is_transitioning());
    let before = m.pose();

    let contact = Selection::new(Section::Contact, false);
    assert!(m.on_selection_changed(contact, true).unwrap());
    let after = m.pose();
    assert_eq!(before, after);
    assert_eq!(m.current_stage(), Some(0));
    assert_eq!(m.runs_started(), 2);

    // the first frame after the swap moves only a frame's worth
    let prev = m.pose();
    m.tick(FRAME);
    assert!(m.pose().distance_to(&prev) < 1.0);

    let (done, _) = run_to_completion(&mut m);
    assert_eq!(done.selection, contact);
    assert!(m.tick(FRAME).is_none());
}

#[test]
fn last_request_wins() {
    let mut m = machine_at(Selection::default());
    m.on_selection_changed(Selection::new(Section::About, false), true)
        .unwrap();
    m.tick(FRAME);
    m.on_selection_changed(Selection::new(Section::Contact, false), true)
        .unwrap();
    m.tick(FRAME);
    let last = Selection::new(Section::Projects, true);
    m.on_selection_changed(last, false).unwrap();
    let (done, _) = run_to_completion(&mut m);
    assert_eq!(done.selection, last);
    assert_eq!(done.kind, PathKind::Direct);
}

/// Fly a two-waypoint run with `spring`; returns whether it completed within
/// `cap` ticks, asserting the pose stays finite throughout.
fn path_completes(spring: SpringConfig, cap: usize) -> bool {
    let mut wps = Waypoints::new();
    for target in [Vec3::new(4.0, 8.0, 25.0), Vec3::new(0.0, 10.0, 20.0)] {
        wps.push(Waypoint::new(Pose::new(target, 55.0), spring, FovTrack::Fixed));
    }
    let mut path = CameraPath::new(Pose::default(), Convergence::default());
    path.start(TransitionRun::new(PathKind::Direct, wps).unwrap());
    for _ in 0..cap {
        let step = path.advance(FRAME);
        let pose = path.pose();
        assert!(
            pose.position.is_finite() && pose.field_of_view.is_finite(),
            "{spring:?} produced {pose:?}"
        );
        if step == PathStep::Completed {
            return true;
        }
    }
    false
}

#[test]
fn runs_finish_for_any_positive_spring() {
    let masses = [0.5_f32, 1.0, 3.0];
    let tensions = [20.0_f32, 120.0, 300.0];
    let frictions = [5.0_f32, 26.0, 80.0];
    for &mass in &masses {
        for &tension in &tensions {
            for &friction in &frictions {
                let spring = SpringConfig::new(mass, tension, friction).unwrap();
                assert!(
                    path_completes(spring, TICK_CAP),
                    "m={mass} k={tension} c={friction} stuck"
                );
            }
        }
    }
}

#[test]
fn stiff_light_and_heavily_damped_springs_finish() {
    // the overdamped case has a ~25 s time constant, so it gets a longer cap
    let cases = [
        (0.01_f32, 120.0_f32, 40.0_f32),
        (1.0, 5.0e6, 50.0),
        (1.0, 120.0, 3000.0),
        (1.0e-4, 1.0e4, 1.0e-2),
        (50.0, 1.0e5, 1.0e4),
    ];
    for (mass, tension, friction) in cases {
        let spring = SpringConfig::new(mass, tension, friction).unwrap();
        assert!(
            path_completes(spring, 60 * 600),
            "m={mass} k={tension} c={friction} stuck"
        );
    }
}

#[test]
fn idle_zero_ticks_change_nothing() {
    let mut m = machine_at(Selection::default());
    let pose = m.pose();
    let particles = m.tunnel().positions().to_vec();
    for _ in 0..100 {
        assert!(m.tick(0.0).is_none());
    }
    assert_eq!(m.pose(), pose);
    assert_eq!(m.tunnel().positions(), &particles[..]);
    assert_eq!(m.state(), MachineState::Idle);
}

#[test]
fn bad_frame_deltas_never_poison_the_pose() {
    let mut m = machine_at(Selection::default());
    m.on_selection_changed(Selection::new(Section::About, false), true)
        .unwrap();
    for dt in [f32::NAN, -1.0, 0.0, f32::INFINITY, f32::NEG_INFINITY] {
        m.tick(dt);
        let p = m.pose();
        assert!(p.position.is_finite() && p.field_of_view.is_finite());
    }
    assert!(m.tunnel().positions().iter().all(|p| p[2].is_finite()));
}

#[test]
fn composer_follows_the_machine() {
    let mut m = machine_at(Selection::default());
    let mut c = SceneComposer::new(Selection::default(), 1);
    c.observe(&m);
    assert!(c.is_mounted(SceneGroup::ProjectHolograms));

    m.on_selection_changed(Selection::new(Section::About, false), true)
        .unwrap();
    for _ in 0..TICK_CAP {
        let done = m.tick(FRAME);
        c.observe(&m);
        if let Some(done) = done {
            c.on_transition_complete(&done);
            break;
        }
        // nothing section-specific while flying
        assert!(!c.is_mounted(SceneGroup::ProjectHolograms));
        assert!(!c.is_mounted(SceneGroup::TeamConstellation));
        assert_eq!(c.is_mounted(SceneGroup::SpaceTravel), m.tunnel().is_visible());
    }
    assert!(c.is_mounted(SceneGroup::TeamConstellation));
    assert!(c.user_control_enabled());
}
