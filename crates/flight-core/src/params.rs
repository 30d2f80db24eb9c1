use crate::constants::{
    FOV_EPSILON, MAX_FRAME_DT, MIN_FRAME_DT, PARTICLE_COUNT, PARTICLE_DEPTH_BOUND, PARTICLE_SEED,
    PARTICLE_SPEED, PARTICLE_SPREAD_XY, POSITION_EPSILON, VELOCITY_EPSILON,
};
use crate::error::{FlightError, Result};

/// When the particle tunnel streams during a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TunnelWindow {
    /// Only while the run sits in its duration-hinted (tunnel) stage.
    #[default]
    TunnelStage,
    /// For every tick of a staged run.
    WholeRun,
}

/// Thresholds a stage must meet before the path moves to the next waypoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Convergence {
    pub position: f32,
    pub velocity: f32,
    pub fov: f32,
}

impl Default for Convergence {
    fn default() -> Self {
        Self {
            position: POSITION_EPSILON,
            velocity: VELOCITY_EPSILON,
            fov: FOV_EPSILON,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TunnelParams {
    pub particle_count: usize,
    pub spread_xy: f32,
    pub depth_bound: f32,
    pub speed: f32,
    pub seed: u64,
    pub window: TunnelWindow,
}

impl Default for TunnelParams {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            spread_xy: PARTICLE_SPREAD_XY,
            depth_bound: PARTICLE_DEPTH_BOUND,
            speed: PARTICLE_SPEED,
            seed: PARTICLE_SEED,
            window: TunnelWindow::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct TransitionParams {
    pub tunnel: TunnelParams,
    pub convergence: Convergence,
}

impl TransitionParams {
    pub fn validate(&self) -> Result<()> {
        let t = &self.tunnel;
        if t.particle_count == 0 {
            return Err(FlightError::InvalidParams("particle_count must be > 0"));
        }
        if !(t.depth_bound.is_finite() && t.depth_bound > 0.0) {
            return Err(FlightError::InvalidParams("depth_bound must be finite and > 0"));
        }
        if !(t.spread_xy.is_finite() && t.spread_xy >= 0.0) {
            return Err(FlightError::InvalidParams("spread_xy must be finite and >= 0"));
        }
        if !(t.speed.is_finite() && t.speed > 0.0) {
            return Err(FlightError::InvalidParams("speed must be finite and > 0"));
        }
        let c = &self.convergence;
        if [c.position, c.velocity, c.fov]
            .iter()
            .any(|e| !(e.is_finite() && *e > 0.0))
        {
            return Err(FlightError::InvalidParams("convergence epsilons must be > 0"));
        }
        Ok(())
    }
}

/// Clamp a frame delta into `[MIN_FRAME_DT, MAX_FRAME_DT]`; NaN and non-positive
/// values become the minimum so nothing downstream ever integrates a NaN.
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > MIN_FRAME_DT {
        dt.min(MAX_FRAME_DT)
    } else if dt == f32::INFINITY {
        MAX_FRAME_DT
    } else {
        MIN_FRAME_DT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_dt_clamps_bad_input() {
        assert_eq!(sanitize_dt(f32::NAN), MIN_FRAME_DT);
        assert_eq!(sanitize_dt(-0.5), MIN_FRAME_DT);
        assert_eq!(sanitize_dt(0.0), MIN_FRAME_DT);
        assert_eq!(sanitize_dt(f32::NEG_INFINITY), MIN_FRAME_DT);
        assert_eq!(sanitize_dt(f32::INFINITY), MAX_FRAME_DT);
        assert_eq!(sanitize_dt(5.0), MAX_FRAME_DT);
        assert_eq!(sanitize_dt(1.0 / 60.0), 1.0 / 60.0);
    }

    #[test]
    fn default_params_validate() {
        assert!(TransitionParams::default().validate().is_ok());
        let mut p = TransitionParams::default();
        p.tunnel.particle_count = 0;
        assert!(p.validate().is_err());
        let mut p = TransitionParams::default();
        p.convergence.velocity = 0.0;
        assert!(p.validate().is_err());
    }
}
