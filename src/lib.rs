//! Jungle Run - an endless lane runner with a zombie on your heels
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (body physics, pursuer, courses, screens, trap challenge)
//! - `platform`: Collaborator seams for input, presentation and identity
//! - `persistence`: Save slot storage (memory, JSON file, LocalStorage)
//! - `audio`: Fire-and-forget feedback events
//! - `settings`: Host preferences

pub mod audio;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation timestep (one rendered frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Lane centres on the x axis
    pub const LANES: [f32; 3] = [-3.0, 0.0, 3.0];
    /// Lateral travel limit for the runner
    pub const LATERAL_LIMIT: f32 = 4.0;
    /// Lateral speed (units/s)
    pub const LATERAL_SPEED: f32 = 15.0;

    /// Resting height of the runner's centre
    pub const GROUND_HEIGHT: f32 = 1.0;
    /// Height tolerance for "on the ground" checks
    pub const GROUND_EPSILON: f32 = 1e-3;
    /// Runner centre height while sliding
    pub const SLIDE_HEIGHT: f32 = 0.3;
    /// Slide duration (seconds)
    pub const SLIDE_DURATION: f32 = 0.6;
    /// Jump launch velocity (units/s)
    pub const JUMP_VELOCITY: f32 = 18.0;
    /// Gravity (units/s²)
    pub const GRAVITY: f32 = 40.0;
    /// Runner half-extents (x, y, z)
    pub const RUNNER_HALF_EXTENT: [f32; 3] = [0.75, 1.0, 0.75];

    /// Pursuer starts this far behind the start line (+z is behind)
    pub const PURSUER_START_OFFSET: f32 = 25.0;
    /// Gap the pursuer keeps behind a full-speed runner
    pub const PURSUER_TRAIL_OFFSET: f32 = 20.0;
    /// Planar distance at which the pursuer catches the runner
    pub const CATCH_RADIUS: f32 = 2.0;

    /// Gems awarded per pickup
    pub const GEM_REWARD: u64 = 10;
    /// Gems spent to continue after a game over
    pub const CONTINUE_COST: u32 = 50;

    /// Trap challenge sequence length
    pub const TRAP_SEQUENCE_LEN: usize = 6;
    /// Trap challenge reveal window (seconds)
    pub const TRAP_REVEAL_SECS: f32 = 3.0;
    /// Trap challenge time limit (whole seconds)
    pub const TRAP_TIME_LIMIT: u32 = 60;

    /// Default pre-run countdown (whole seconds)
    pub const COUNTDOWN_SECS: u32 = 3;
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(start: f32, end: f32, factor: f32) -> f32 {
    start + (end - start) * factor
}

/// Distance between two points on the ground (x/z) plane
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}
