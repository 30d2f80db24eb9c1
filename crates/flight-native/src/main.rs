use anyhow::{bail, Context};
use glam::Vec3;

use flight_core::{
    Camera, Pose, SceneComposer, Selection, SelectionRequest, TransitionMachine,
    TransitionParams,
};

const DEFAULT_FPS: f32 = 60.0;
const MAX_FLIGHT_SEC: f32 = 120.0;
const DEFAULT_SCRIPT: [&str; 4] = ["about", "contact", "projects:explore:direct", "projects"];

struct Options {
    fps: f32,
    steps: Vec<SelectionRequest>,
}

fn parse_args(args: impl Iterator<Item = String>) -> anyhow::Result<Options> {
    let mut fps = DEFAULT_FPS;
    let mut steps = Vec::new();
    let mut args = args;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--fps" => {
                let value = args.next().context("--fps needs a value")?;
                fps = value.parse().with_context(|| format!("bad --fps {value:?}"))?;
                if !(fps.is_finite() && fps > 0.0) {
                    bail!("--fps must be > 0");
                }
            }
            _ => steps.push(
                arg.parse::<SelectionRequest>()
                    .with_context(|| format!("bad step {arg:?}"))?,
            ),
        }
    }
    if steps.is_empty() {
        for s in DEFAULT_SCRIPT {
            steps.push(s.parse()?);
        }
    }
    Ok(Options { fps, steps })
}

#[derive(Debug, Default)]
struct FlightLog {
    frames: u32,
    tunnel_frames: u32,
    max_fov: f32,
    landed: Option<Pose>,
}

fn fly(
    machine: &mut TransitionMachine,
    composer: &mut SceneComposer,
    request: SelectionRequest,
    fps: f32,
) -> anyhow::Result<FlightLog> {
    let dt = 1.0 / fps;
    let mut flight = FlightLog::default();
    if !machine.on_selection_changed(request.selection, request.staged)? {
        log::info!("already at {}", request.selection);
        return Ok(flight);
    }
    composer.observe(machine);
    let max_frames = (MAX_FLIGHT_SEC * fps) as u32;
    while flight.frames < max_frames {
        let done = machine.tick(dt);
        composer.observe(machine);
        flight.frames += 1;
        if machine.tunnel().is_visible() {
            flight.tunnel_frames += 1;
        }
        let pose = machine.pose();
        flight.max_fov = flight.max_fov.max(pose.field_of_view);
        if flight.frames % (fps as u32).max(1) == 0 {
            let cam = Camera::from_pose(&pose, machine.look_at(), 16.0 / 9.0);
            let origin = cam.view_projection().project_point3(Vec3::ZERO);
            log::debug!(
                "t={:.2}s stage={:?} pos=({:.2},{:.2},{:.2}) fov={:.1} origin_ndc=({:.2},{:.2}) groups={:?}",
                flight.frames as f32 * dt,
                machine.current_stage(),
                pose.position.x,
                pose.position.y,
                pose.position.z,
                pose.field_of_view,
                origin.x,
                origin.y,
                composer.mounted_groups().iter().map(|g| g.as_str()).collect::<Vec<_>>()
            );
        }
        if let Some(done) = done {
            composer.on_transition_complete(&done);
            flight.landed = Some(done.pose);
            return Ok(flight);
        }
    }
    bail!(
        "flight to {} did not land within {MAX_FLIGHT_SEC}s",
        request.selection
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let opts = parse_args(std::env::args().skip(1))?;
    let start = Selection::default();
    let mut machine = TransitionMachine::new(&TransitionParams::default(), start.arrival_pose())?
        .with_initial_selection(start);
    let mut composer = SceneComposer::new(start, 0);
    log::info!(
        "replaying {} steps at {} fps from {}",
        opts.steps.len(),
        opts.fps,
        start
    );

    for request in &opts.steps {
        let flight = fly(&mut machine, &mut composer, *request, opts.fps)?;
        if let Some(pose) = flight.landed {
            log::info!(
                "{} ({}): {:.2}s, tunnel {:.2}s, max fov {:.1}, landed ({:.2},{:.2},{:.2}) fov {:.1}",
                request.selection,
                if request.staged { "staged" } else { "direct" },
                flight.frames as f32 / opts.fps,
                flight.tunnel_frames as f32 / opts.fps,
                flight.max_fov,
                pose.position.x,
                pose.position.y,
                pose.position.z,
                pose.field_of_view
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn default_script_when_no_steps() {
        let opts = parse_args(args(&[])).unwrap();
        assert_eq!(opts.steps.len(), DEFAULT_SCRIPT.len());
        assert_eq!(opts.fps, DEFAULT_FPS);
    }

    #[test]
    fn rejects_bad_steps_and_fps() {
        assert!(parse_args(args(&["pricing"])).is_err());
        assert!(parse_args(args(&["--fps", "0"])).is_err());
        assert!(parse_args(args(&["--fps"])).is_err());
        let opts = parse_args(args(&["--fps", "30", "about:direct"])).unwrap();
        assert_eq!(opts.fps, 30.0);
        assert!(!opts.steps[0].staged);
    }

    #[test]
    fn scripted_flights_land() {
        let start = Selection::default();
        let mut params = TransitionParams::default();
        params.tunnel.particle_count = 32;
        let mut machine = TransitionMachine::new(&params, start.arrival_pose())
            .unwrap()
            .with_initial_selection(start);
        let mut composer = SceneComposer::new(start, 0);
        let about: SelectionRequest = "about".parse().unwrap();
        let flight = fly(&mut machine, &mut composer, about, 60.0).unwrap();
        let pose = flight.landed.unwrap();
        assert!(pose.position.distance(Vec3::new(0.0, 10.0, 20.0)) < 0.1);
        assert!(flight.tunnel_frames >= 179);
        // repeating the same selection is a no-op
        let again = fly(&mut machine, &mut composer, about, 60.0).unwrap();
        assert_eq!(again.frames, 0);
    }
}
