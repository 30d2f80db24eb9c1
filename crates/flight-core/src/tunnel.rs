use rand::prelude::*;

use crate::error::Result;
use crate::params::{sanitize_dt, TransitionParams, TunnelParams};

/// Fixed-size particle buffer streaming along +Z for the space-travel effect.
///
/// Particles are allocated once and recycled by wrapping; only `z` moves.
pub struct ParticleTunnel {
    positions: Vec<[f32; 3]>,
    depth_bound: f32,
    speed: f32,
    active: bool,
}

impl ParticleTunnel {
    pub fn new(params: &TunnelParams) -> Result<Self> {
        TransitionParams {
            tunnel: params.clone(),
            ..Default::default()
        }
        .validate()?;
        let mut rng = StdRng::seed_from_u64(params.seed);
        let xy = params.spread_xy;
        let zb = params.depth_bound;
        let positions = (0..params.particle_count)
            .map(|_| {
                [
                    rng.gen_range(-xy..=xy),
                    rng.gen_range(-xy..=xy),
                    rng.gen_range(-zb..=zb),
                ]
            })
            .collect();
        Ok(Self {
            positions,
            depth_bound: zb,
            speed: params.speed,
            active: false,
        })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn depth_bound(&self) -> f32 {
        self.depth_bound
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Rendered only while streaming.
    pub fn is_visible(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            log::debug!("[tunnel] {}", if active { "streaming" } else { "stopped" });
        }
        self.active = active;
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Flat `x, y, z, x, y, z, ...` view for direct GPU/JS upload.
    pub fn as_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Move every particle by `dt * speed` along z; no-op when inactive.
    pub fn tick(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.advance(dt);
    }

    /// In-place scan regardless of the active flag. `dt` goes through
    /// [`sanitize_dt`] first.
    pub fn advance(&mut self, dt: f32) {
        let dt = sanitize_dt(dt);
        let bound = self.depth_bound;
        // reduced to under one lap
        let dz = (dt as f64 * self.speed as f64).rem_euclid(2.0 * bound as f64) as f32;
        for p in &mut self.positions {
            p[2] = wrap_depth(p[2] + dz, bound);
        }
    }
}

/// Fold a z that ran past `+bound` back to the near edge, keeping the overshoot.
/// Non-finite input lands on the near edge.
#[inline]
pub fn wrap_depth(z: f32, bound: f32) -> f32 {
    if z > bound {
        let span = 2.0 * bound;
        let w = (z + bound).rem_euclid(span) - bound;
        if w.is_finite() {
            w.clamp(-bound, bound)
        } else {
            -bound
        }
    } else {
        // NaN.max(x) is x
        z.max(-bound)
    }
}
