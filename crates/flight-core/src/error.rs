use thiserror::Error;

/// Configuration errors raised by the flight core.
///
/// Everything here is a caller mistake caught at construction or parse time;
/// per-frame operations never fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlightError {
    /// A spring parameter was zero, negative, or not finite.
    #[error("invalid spring {field}: {value} (must be finite and > 0)")]
    InvalidSpring { field: &'static str, value: f32 },
    /// Section name outside `projects`, `about`, `contact`.
    #[error("unknown section: {0:?}")]
    UnknownSection(String),
    /// Transition parameters that cannot produce a valid simulation.
    #[error("invalid params: {0}")]
    InvalidParams(&'static str),
}

pub type Result<T> = std::result::Result<T, FlightError>;
