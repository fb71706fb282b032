//! Tank Battle - A top-down tank combat arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (drive model, combat, AI, world streaming)
//! - `audio`: Sound handles, attenuation and sound events
//! - `settings`: Player preferences (drive system, key bindings, volume)
//! - `tuning`: Data-driven world and physics configuration

pub mod audio;
pub mod error;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use settings::{DriveSystem, KeyBindings, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Simulation rate the frame-based constants are tuned for
    pub const FPS: u32 = 60;

    /// Viewport dimensions (camera clamping and dead-player reference)
    pub const SCREEN_WIDTH: f32 = 1200.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// World extents
    pub const WORLD_MIN_X: f32 = -3000.0;
    pub const WORLD_MAX_X: f32 = 3000.0;
    pub const WORLD_MIN_Y: f32 = -3000.0;
    pub const WORLD_MAX_Y: f32 = 3000.0;

    /// Side of a terrain chunk in world units
    pub const CHUNK_SIZE: i32 = 500;
    /// Probability of placing an obstacle at a given grid point
    pub const FEATURE_DENSITY: f64 = 0.005;

    /// Tank body
    pub const TANK_WIDTH: f32 = 60.0;
    pub const TANK_HEIGHT: f32 = 90.0;
    pub const TANK_ACCEL: f32 = 0.1;
    pub const TANK_MAX_SPEED: f32 = 3.0;
    /// Degrees per tick
    pub const BASE_TURN_RATE: f32 = 1.0;
    pub const MAX_HEALTH: u32 = 100;

    /// Turret
    pub const TURRET_ROTATION_SPEED: f32 = 1.5; // degrees per tick
    pub const TURRET_LENGTH: f32 = 50.0;
    pub const INITIAL_TURRET_ANGLE: f32 = 90.0;

    /// Weapons
    pub const FIRE_COOLDOWN_FRAMES: u32 = 180;
    pub const BULLET_SPEED: f32 = 10.0;
    pub const BULLET_RADIUS: f32 = 5.0;
    pub const BULLET_DAMAGE: u32 = 25;
    pub const BULLET_LIFESPAN: u32 = 200;
    pub const MAX_BULLET_RANGE: f32 = 500.0;

    /// AI fire eligibility
    pub const FIRING_TOLERANCE: f32 = 5.0;
    pub const MAX_FIRING_DISTANCE: f32 = 800.0;
    /// AI move episodes last this many ticks (inclusive)
    pub const AI_EPISODE_MIN_TICKS: u32 = 30;
    pub const AI_EPISODE_MAX_TICKS: u32 = 120;

    /// Audio
    pub const SOUND_VOLUME: f32 = 0.2;
    pub const HIT_VOLUME_FACTOR: f32 = 0.7;
    /// Distance at which sound is fully attenuated
    pub const MAX_SOUND_DISTANCE: f32 = 1000.0;

    /// Spawning
    pub const SPAWN_ATTEMPTS: u32 = 1000;
    pub const SPAWN_MIN_DIST: f32 = 150.0;
    pub const PLAYER_SPAWN_AREA: u32 = 1;
    pub const AI_SPAWN_AREA: u32 = 4;
    pub const NUM_FRIENDLIES: u32 = 2;
    pub const NUM_ENEMIES: u32 = 3;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Signed shortest difference `target - current` in degrees, in (-180, 180]
#[inline]
pub fn shortest_angle_diff(current: f32, target: f32) -> f32 {
    let mut diff = normalize_degrees(target) - normalize_degrees(current);
    if diff > 180.0 {
        diff -= 360.0;
    } else if diff <= -180.0 {
        diff += 360.0;
    }
    diff
}

/// Unit vector for a heading in degrees.
///
/// 0° points along world +x and angles grow counter-clockwise on screen,
/// so world y (which grows downward) takes the negated sine.
#[inline]
pub fn heading_vector(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), -rad.sin())
}

/// Bearing in degrees from `from` to `to`, using the same convention as [`heading_vector`]
#[inline]
pub fn bearing_degrees(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    (-d.y).atan2(d.x).to_degrees()
}
