use crate::constants::SPRING_SUBSTEP_SEC;
use crate::error::{FlightError, Result};

/// Damped spring parameters in the mass/tension/friction form.
///
/// Fields are private so every instance has passed [`SpringConfig::new`]:
/// a spring with zero friction never settles and would keep a run alive forever.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    mass: f32,
    tension: f32,
    friction: f32,
    duration_hint: Option<f32>,
}

impl SpringConfig {
    pub fn new(mass: f32, tension: f32, friction: f32) -> Result<Self> {
        check_positive("mass", mass)?;
        check_positive("tension", tension)?;
        check_positive("friction", friction)?;
        Ok(Self {
            mass,
            tension,
            friction,
            duration_hint: None,
        })
    }

    /// Build from a `(mass, tension, friction)` tuple as stored in `constants`.
    pub fn from_tuple((mass, tension, friction): (f32, f32, f32)) -> Result<Self> {
        Self::new(mass, tension, friction)
    }

    /// Attach an authoritative stage duration in seconds.
    pub fn with_duration_hint(mut self, seconds: f32) -> Result<Self> {
        check_positive("duration_hint", seconds)?;
        self.duration_hint = Some(seconds);
        Ok(self)
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }
    pub fn tension(&self) -> f32 {
        self.tension
    }
    pub fn friction(&self) -> f32 {
        self.friction
    }
    pub fn duration_hint(&self) -> Option<f32> {
        self.duration_hint
    }

    /// Damping ratio `friction / (2 * sqrt(mass * tension))`.
    pub fn damping_ratio(&self) -> f32 {
        let (m, k, c) = self.as_f64();
        (c / (2.0 * (m * k).sqrt())) as f32
    }

    #[inline]
    fn as_f64(&self) -> (f64, f64, f64) {
        (self.mass as f64, self.tension as f64, self.friction as f64)
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FlightError::InvalidSpring { field, value })
    }
}

/// One scalar driven by a spring: a position coordinate or the field of view.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpringChannel {
    pub value: f32,
    pub velocity: f32,
}

impl SpringChannel {
    pub fn at_rest(value: f32) -> Self {
        Self {
            value,
            velocity: 0.0,
        }
    }

    /// Advance by `h` seconds toward a fixed `target` using the exact
    /// solution of `m x'' + c x' + k x = 0`, so any positive spring stays
    /// finite and decays regardless of stiffness.
    pub fn step(&mut self, config: &SpringConfig, target: f32, h: f32) {
        if !(h > 0.0) {
            return;
        }
        let (x, v) = damped_offset(
            config,
            self.value as f64 - target as f64,
            self.velocity as f64,
            h as f64,
        );
        self.value = to_finite_f32(target as f64 + x);
        self.velocity = to_finite_f32(v);
    }

    /// Advance by `dt` seconds using fixed sub-steps of at most [`SPRING_SUBSTEP_SEC`].
    pub fn advance(&mut self, config: &SpringConfig, target: f32, dt: f32) {
        let (steps, h) = substeps(dt);
        for _ in 0..steps {
            self.step(config, target, h);
        }
    }

    pub fn is_settled(&self, target: f32, value_eps: f32, velocity_eps: f32) -> bool {
        (self.value - target).abs() < value_eps && self.velocity.abs() < velocity_eps
    }
}

// Ratios this close to 1 use the critically damped form.
const CRITICAL_BAND: f64 = 1.0e-6;

/// Offset and velocity after `t` seconds for a free damped oscillator starting
/// at offset `x0` with velocity `v0`.
fn damped_offset(config: &SpringConfig, x0: f64, v0: f64, t: f64) -> (f64, f64) {
    let (m, k, c) = config.as_f64();
    let w0 = (k / m).sqrt();
    let alpha = c / (2.0 * m);
    let zeta = alpha / w0;

    if (zeta - 1.0).abs() < CRITICAL_BAND {
        // x = e^{-w0 t} (x0 + (v0 + w0 x0) t)
        let decay = (-w0 * t).exp();
        let b = v0 + w0 * x0;
        let x = decay * (x0 + b * t);
        let v = decay * (v0 - w0 * b * t);
        (x, v)
    } else if zeta < 1.0 {
        let wd = w0 * (1.0 - zeta * zeta).sqrt();
        let decay = (-alpha * t).exp();
        let (sin, cos) = (wd * t).sin_cos();
        let x = decay * (x0 * cos + (v0 + alpha * x0) / wd * sin);
        let v = decay * (v0 * cos - (alpha * v0 + w0 * w0 * x0) / wd * sin);
        (x, v)
    } else {
        // real roots; the slow one comes from the product w0^2 to avoid cancellation
        let spread = alpha * (1.0 - 1.0 / (zeta * zeta)).sqrt();
        let fast = -alpha - spread;
        let slow = (w0 * w0) / fast;
        let a = (v0 - slow * x0) / (fast - slow);
        let b = x0 - a;
        let ef = (fast * t).exp();
        let es = (slow * t).exp();
        let x = a * ef + b * es;
        let v = a * fast * ef + b * slow * es;
        (x, v)
    }
}

#[inline]
fn to_finite_f32(x: f64) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(-(f32::MAX as f64), f32::MAX as f64) as f32
    }
}

/// Split `dt` into equal sub-steps no longer than [`SPRING_SUBSTEP_SEC`].
#[inline]
pub fn substeps(dt: f32) -> (u32, f32) {
    if dt <= 0.0 {
        return (0, 0.0);
    }
    let steps = (dt / SPRING_SUBSTEP_SEC).ceil().max(1.0) as u32;
    (steps, dt / steps as f32)
}
