use glam::Vec3;

// Shared camera/particle tuning constants used by both web and native frontends.

// Arrival poses, keyed by (section, exploring)
pub const ABOUT_ARRIVAL: [f32; 3] = [0.0, 10.0, 20.0];
pub const EXPLORING_ARRIVAL: [f32; 3] = [0.0, 8.0, 15.0];
pub const OVERVIEW_ARRIVAL: [f32; 3] = [0.0, 15.0, 30.0];

// Fixed stage poses for staged flights
pub const RECENTER_POSITION: [f32; 3] = [0.0, 8.0, 25.0];
pub const TUNNEL_EXIT_POSITION: [f32; 3] = [0.0, 8.0, -25.0];
pub const PULL_BACK_SCALE: f32 = 0.8; // fraction of the current position kept on pull-back

// Field of view (degrees)
pub const FOV_REST: f32 = 60.0;
pub const FOV_EXPLORING: f32 = 50.0;
pub const FOV_TRAVEL_SPAN: f32 = 20.0; // added on top of FOV_REST at full progress
pub const FOV_PROGRESS_DEPTH: f32 = 25.0; // |z| at which travel progress saturates

// Springs: (mass, tension, friction)
pub const PULL_BACK_SPRING: (f32, f32, f32) = (2.0, 120.0, 40.0);
pub const RECENTER_SPRING: (f32, f32, f32) = (1.0, 100.0, 50.0);
pub const TUNNEL_SPRING: (f32, f32, f32) = (1.0, 80.0, 40.0);
pub const ARRIVAL_SPRING: (f32, f32, f32) = (1.0, 120.0, 50.0);
pub const DIRECT_SPRING: (f32, f32, f32) = (1.0, 150.0, 50.0);
pub const TUNNEL_DURATION_SEC: f32 = 3.0; // authoritative length of the tunnel stage

// Spring integration
pub const SPRING_SUBSTEP_SEC: f32 = 0.001;

// Convergence epsilons
pub const POSITION_EPSILON: f32 = 0.05; // world units
pub const VELOCITY_EPSILON: f32 = 0.05; // world units per second
pub const FOV_EPSILON: f32 = 0.1; // degrees and degrees per second

// Frame-time clamps (seconds)
pub const MIN_FRAME_DT: f32 = 1.0e-6;
pub const MAX_FRAME_DT: f32 = 1.0;

// Particle tunnel
pub const PARTICLE_COUNT: usize = 5000;
pub const PARTICLE_SPREAD_XY: f32 = 10.0; // x,y sampled in [-spread, spread]
pub const PARTICLE_DEPTH_BOUND: f32 = 50.0; // z kept in [-bound, bound]
pub const PARTICLE_SPEED: f32 = 100.0; // z units per second
pub const PARTICLE_SEED: u64 = 42;

// Decorative wander
pub const WANDER_INTERVAL_SEC: f32 = 2.0;
pub const WANDER_STEP: f32 = 3.0;
pub const WANDER_LIMIT: f32 = 15.0; // x/z clamp
pub const WANDER_HEIGHT_MIN: f32 = 0.5;
pub const WANDER_HEIGHT_SPAN: f32 = 2.0;

// Default leaf layout for the backdrop
pub const DEFAULT_LEAF_POSITIONS: [[f32; 3]; 10] = [
    [-9.0, 0.5, -9.0],
    [-3.0, 0.5, -3.0],
    [0.0, 0.5, 0.0],
    [3.0, 0.5, 3.0],
    [9.0, 0.5, 9.0],
    [-6.0, 0.5, 6.0],
    [6.0, 0.5, -6.0],
    [-12.0, 0.5, 0.0],
    [12.0, 0.5, 0.0],
    [0.0, 0.5, 12.0],
];

// Hologram scale
pub const HOLOGRAM_SCALE_EXPANDED: f32 = 1.5;
pub const HOLOGRAM_SCALE_HOVERED: f32 = 1.2;
pub const MEMBER_SCALE_HOVERED: f32 = 1.1;

#[inline]
pub fn vec3(a: [f32; 3]) -> Vec3 {
    Vec3::new(a[0], a[1], a[2])
}
