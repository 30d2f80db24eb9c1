pub mod camera;
pub mod composer;
pub mod constants;
pub mod error;
pub mod params;
pub mod path;
pub mod selection;
pub mod spring;
pub mod transition;
pub mod tunnel;

pub use camera::*;
pub use composer::{ElementEvent, ElementId, ElementKind, SceneComposer, SceneGroup};
pub use constants::*;
pub use error::FlightError;
pub use params::*;
pub use path::{FovTrack, PathKind, TransitionRun, Waypoint};
pub use selection::*;
pub use spring::SpringConfig;
pub use transition::*;
pub use tunnel::ParticleTunnel;
