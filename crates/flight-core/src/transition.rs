use glam::Vec3;

use crate::camera::Pose;
use crate::error::Result;
use crate::params::{sanitize_dt, TransitionParams, TunnelWindow};
use crate::path::{
    direct_waypoints, staged_waypoints, CameraPath, PathKind, PathStep, TransitionRun,
};
use crate::selection::Selection;
use crate::tunnel::ParticleTunnel;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MachineState {
    Idle,
    Running,
}

/// Emitted once per finished run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionComplete {
    pub selection: Selection,
    pub kind: PathKind,
    pub pose: Pose,
}

/// Watches the page selection and flies the camera between sections.
///
/// Owns the [`CameraPath`] and the [`ParticleTunnel`]; both advance from
/// [`TransitionMachine::tick`] with the same `dt` and the same snapshot of the
/// run, so the tunnel never streams a frame ahead of or behind the camera.
pub struct TransitionMachine {
    path: CameraPath,
    tunnel: ParticleTunnel,
    window: TunnelWindow,
    observed: Option<Selection>,
    runs_started: u64,
}

impl TransitionMachine {
    pub fn new(params: &TransitionParams, initial_pose: Pose) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            path: CameraPath::new(initial_pose, params.convergence),
            tunnel: ParticleTunnel::new(&params.tunnel)?,
            window: params.tunnel.window,
            observed: None,
            runs_started: 0,
        })
    }

    /// Treat `selection` as already observed; no run is started for it.
    pub fn with_initial_selection(mut self, selection: Selection) -> Self {
        self.observed = Some(selection);
        self
    }

    pub fn state(&self) -> MachineState {
        if self.path.is_running() {
            MachineState::Running
        } else {
            MachineState::Idle
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.path.is_running()
    }

    pub fn pose(&self) -> Pose {
        self.path.pose()
    }

    pub fn look_at(&self) -> Option<Vec3> {
        self.path.look_at()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.observed
    }

    pub fn run(&self) -> Option<&TransitionRun> {
        self.path.run()
    }

    /// Index of the waypoint being flown to, if running.
    pub fn current_stage(&self) -> Option<usize> {
        self.path.run().map(TransitionRun::current_index)
    }

    pub fn tunnel(&self) -> &ParticleTunnel {
        &self.tunnel
    }

    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }

    /// Observe the page selection. Returns `true` when a run was started or
    /// replaced. The first observation always moves directly; after that
    /// `staged` picks the four-stage flight over the direct move.
    pub fn on_selection_changed(&mut self, selection: Selection, staged: bool) -> Result<bool> {
        if self.observed == Some(selection) {
            return Ok(false);
        }
        let kind = if staged && self.observed.is_some() {
            PathKind::Staged
        } else {
            PathKind::Direct
        };
        let waypoints = match kind {
            PathKind::Staged => staged_waypoints(&self.path.pose(), selection)?,
            PathKind::Direct => direct_waypoints(selection)?,
        };
        let Some(run) = TransitionRun::new(kind, waypoints) else {
            return Ok(false);
        };

        self.observed = Some(selection);
        self.runs_started += 1;
        let stages = run.waypoints().len();
        if self.path.start(run).is_some() {
            log::debug!("[transition] replaced in-flight run -> {selection} ({kind:?}, {stages} stages)");
        } else {
            log::debug!("[transition] start -> {selection} ({kind:?}, {stages} stages)");
        }
        self.sync_tunnel();
        Ok(true)
    }

    /// Advance one rendered frame. Returns the completion signal on the frame
    /// the run finishes; `None` otherwise, including while idle.
    pub fn tick(&mut self, dt: f32) -> Option<TransitionComplete> {
        if !self.path.is_running() {
            return None;
        }
        let dt = sanitize_dt(dt);

        // the tunnel uses the window of the stage this frame started in
        self.sync_tunnel();
        self.tunnel.tick(dt);
        let kind = self.path.run().map(TransitionRun::kind);
        let step = self.path.advance(dt);
        log::trace!("[transition] dt={dt:.4} step={step:?}");

        match step {
            PathStep::Completed => {
                self.tunnel.set_active(false);
                let pose = self.path.pose();
                let selection = self.observed.unwrap_or_default();
                log::info!(
                    "[transition] arrived at {selection} pos=({:.2},{:.2},{:.2}) fov={:.1}",
                    pose.position.x,
                    pose.position.y,
                    pose.position.z,
                    pose.field_of_view
                );
                Some(TransitionComplete {
                    selection,
                    kind: kind.unwrap_or(PathKind::Direct),
                    pose,
                })
            }
            PathStep::StageAdvanced { .. } => {
                self.sync_tunnel();
                None
            }
            PathStep::Moving | PathStep::Idle => None,
        }
    }

    fn sync_tunnel(&mut self) {
        let streaming = match self.path.run() {
            Some(run) if run.kind() == PathKind::Staged => match self.window {
                TunnelWindow::TunnelStage => run.in_timed_stage(),
                TunnelWindow::WholeRun => true,
            },
            _ => false,
        };
        self.tunnel.set_active(streaming);
    }
}
