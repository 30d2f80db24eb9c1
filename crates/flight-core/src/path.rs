//! Camera path interpolation.
//!
//! A [`TransitionRun`] is an ordered list of spring waypoints. [`CameraPath`]
//! owns the one camera [`Pose`] and walks the active run forward each frame:
//! x, y, z and field of view are independent spring channels, and a stage is
//! done once the position settles within the [`Convergence`] thresholds or,
//! for a stage with a duration hint, once that much time has passed.

use glam::Vec3;
use smallvec::SmallVec;

use crate::camera::Pose;
use crate::constants::{
    vec3, ARRIVAL_SPRING, DIRECT_SPRING, FOV_PROGRESS_DEPTH, FOV_REST, FOV_TRAVEL_SPAN,
    PULL_BACK_SCALE, PULL_BACK_SPRING, RECENTER_POSITION, RECENTER_SPRING, TUNNEL_DURATION_SEC,
    TUNNEL_EXIT_POSITION, TUNNEL_SPRING,
};
use crate::error::Result;
use crate::params::Convergence;
use crate::selection::Selection;
use crate::spring::{substeps, SpringChannel, SpringConfig};

/// How the field of view moves while a waypoint is current.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FovTrack {
    /// Widens with depth: `60 + clamp(|z| / 25, 0, 1) * 20`.
    Derived,
    /// Springs toward the waypoint's own `field_of_view`.
    Fixed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    pub target: Pose,
    pub spring: SpringConfig,
    pub fov: FovTrack,
}

impl Waypoint {
    pub fn new(target: Pose, spring: SpringConfig, fov: FovTrack) -> Self {
        Self {
            target,
            spring,
            fov,
        }
    }

    /// Travel waypoint whose fov follows depth.
    fn travel(position: Vec3, spring: SpringConfig) -> Self {
        Self::new(
            Pose::new(position, travel_fov(position.z)),
            spring,
            FovTrack::Derived,
        )
    }

    #[inline]
    fn fov_target(&self, z: f32) -> f32 {
        match self.fov {
            FovTrack::Derived => travel_fov(z),
            FovTrack::Fixed => self.target.field_of_view,
        }
    }
}

/// Field of view for a camera at depth `z` during a staged flight.
#[inline]
pub fn travel_fov(z: f32) -> f32 {
    FOV_REST + (z.abs() / FOV_PROGRESS_DEPTH).clamp(0.0, 1.0) * FOV_TRAVEL_SPAN
}

pub type Waypoints = SmallVec<[Waypoint; 4]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathKind {
    /// One spring move straight to the arrival pose.
    Direct,
    /// Pull-back, recenter, tunnel, arrival.
    Staged,
}

/// Four waypoints flying from `from` to the arrival pose of `to`.
pub fn staged_waypoints(from: &Pose, to: Selection) -> Result<Waypoints> {
    let mut out = Waypoints::new();
    out.push(Waypoint::travel(
        from.position * PULL_BACK_SCALE,
        SpringConfig::from_tuple(PULL_BACK_SPRING)?,
    ));
    out.push(Waypoint::travel(
        vec3(RECENTER_POSITION),
        SpringConfig::from_tuple(RECENTER_SPRING)?,
    ));
    out.push(Waypoint::travel(
        vec3(TUNNEL_EXIT_POSITION),
        SpringConfig::from_tuple(TUNNEL_SPRING)?.with_duration_hint(TUNNEL_DURATION_SEC)?,
    ));
    out.push(Waypoint::new(
        to.arrival_pose(),
        SpringConfig::from_tuple(ARRIVAL_SPRING)?,
        FovTrack::Fixed,
    ));
    Ok(out)
}

/// Single snappy waypoint to the arrival pose of `to`.
pub fn direct_waypoints(to: Selection) -> Result<Waypoints> {
    let mut out = Waypoints::new();
    out.push(Waypoint::new(
        to.arrival_pose(),
        SpringConfig::from_tuple(DIRECT_SPRING)?,
        FovTrack::Fixed,
    ));
    Ok(out)
}

#[derive(Clone, Debug)]
pub struct TransitionRun {
    kind: PathKind,
    waypoints: Waypoints,
    current_index: usize,
    elapsed_in_stage: f32,
    active: bool,
}

impl TransitionRun {
    /// Empty waypoint lists are not runs; returns `None`.
    pub fn new(kind: PathKind, waypoints: Waypoints) -> Option<Self> {
        if waypoints.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            waypoints,
            current_index: 0,
            elapsed_in_stage: 0.0,
            active: true,
        })
    }

    pub fn kind(&self) -> PathKind {
        self.kind
    }
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }
    pub fn current_index(&self) -> usize {
        self.current_index
    }
    pub fn elapsed_in_stage(&self) -> f32 {
        self.elapsed_in_stage
    }
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn current(&self) -> Option<&Waypoint> {
        self.waypoints.get(self.current_index)
    }

    pub fn final_target(&self) -> Option<&Pose> {
        self.waypoints.last().map(|w| &w.target)
    }

    /// The current stage ends on time rather than on convergence.
    pub fn in_timed_stage(&self) -> bool {
        self.current()
            .and_then(|w| w.spring.duration_hint())
            .is_some()
    }

    /// Move to the next waypoint; returns `false` once past the last one.
    fn advance_stage(&mut self) -> bool {
        self.current_index += 1;
        self.elapsed_in_stage = 0.0;
        if self.current_index >= self.waypoints.len() {
            self.active = false;
        }
        self.active
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathStep {
    /// No run; nothing moved.
    Idle,
    Moving,
    StageAdvanced { index: usize },
    Completed,
}

/// Owner of the camera pose and the active run.
pub struct CameraPath {
    x: SpringChannel,
    y: SpringChannel,
    z: SpringChannel,
    fov: SpringChannel,
    run: Option<TransitionRun>,
    convergence: Convergence,
}

impl CameraPath {
    pub fn new(pose: Pose, convergence: Convergence) -> Self {
        Self {
            x: SpringChannel::at_rest(pose.position.x),
            y: SpringChannel::at_rest(pose.position.y),
            z: SpringChannel::at_rest(pose.position.z),
            fov: SpringChannel::at_rest(pose.field_of_view),
            run: None,
            convergence,
        }
    }

    pub fn pose(&self) -> Pose {
        Pose::new(
            Vec3::new(self.x.value, self.y.value, self.z.value),
            self.fov.value,
        )
    }

    pub fn velocity(&self) -> Vec3 {
        Vec3::new(self.x.velocity, self.y.velocity, self.z.velocity)
    }

    /// Origin while a staged run is flying, otherwise free.
    pub fn look_at(&self) -> Option<Vec3> {
        match &self.run {
            Some(run) if run.kind == PathKind::Staged => Some(Vec3::ZERO),
            _ => None,
        }
    }

    pub fn run(&self) -> Option<&TransitionRun> {
        self.run.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Install `run`, dropping whatever was in flight. Channel values and
    /// velocities carry over so the pose stays continuous.
    pub fn start(&mut self, run: TransitionRun) -> Option<TransitionRun> {
        self.run.replace(run)
    }

    pub fn cancel(&mut self) -> Option<TransitionRun> {
        self.run.take()
    }

    /// Integrate the current stage by `dt` seconds (already sanitized).
    pub fn advance(&mut self, dt: f32) -> PathStep {
        let Some(run) = self.run.as_mut() else {
            return PathStep::Idle;
        };
        let Some(wp) = run.current().copied() else {
            self.run = None;
            return PathStep::Completed;
        };

        let (steps, h) = substeps(dt);
        let target = wp.target.position;
        for _ in 0..steps {
            self.x.step(&wp.spring, target.x, h);
            self.y.step(&wp.spring, target.y, h);
            self.z.step(&wp.spring, target.z, h);
            let fov_target = wp.fov_target(self.z.value);
            self.fov.step(&wp.spring, fov_target, h);
        }
        run.elapsed_in_stage += dt;

        let done = match wp.spring.duration_hint() {
            Some(hint) => run.elapsed_in_stage >= hint,
            None => {
                let c = &self.convergence;
                let pos = Vec3::new(self.x.value, self.y.value, self.z.value);
                let vel = Vec3::new(self.x.velocity, self.y.velocity, self.z.velocity);
                let position_settled =
                    pos.distance(target) < c.position && vel.length() < c.velocity;
                let fov_settled = wp.fov == FovTrack::Derived
                    || self.fov.is_settled(wp.target.field_of_view, c.fov, c.fov);
                position_settled && fov_settled
            }
        };
        if !done {
            return PathStep::Moving;
        }
        if run.advance_stage() {
            log::debug!(
                "[path] stage {} of {}",
                run.current_index + 1,
                run.waypoints.len()
            );
            PathStep::StageAdvanced {
                index: run.current_index,
            }
        } else {
            self.run = None;
            PathStep::Completed
        }
    }
}
