//! Data-driven world and physics configuration
//!
//! Everything the simulation treats as a constant is read from here so a
//! front end can supply its own balance without recompiling.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::Rect;

/// World and physics tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub world_min_x: f32,
    pub world_max_x: f32,
    pub world_min_y: f32,
    pub world_max_y: f32,
    pub chunk_size: i32,
    pub feature_density: f64,

    // === Viewport ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Tank ===
    pub tank_width: f32,
    pub tank_height: f32,
    pub tank_accel: f32,
    pub tank_max_speed: f32,
    pub base_turn_rate: f32,
    pub max_health: u32,
    pub turret_rotation_speed: f32,
    pub turret_length: f32,
    /// Turret heading every tank spawns with
    pub initial_turret_angle: f32,

    // === Weapons ===
    pub fire_cooldown_frames: u32,
    pub bullet_speed: f32,
    pub bullet_radius: f32,
    pub bullet_damage: u32,
    pub bullet_lifespan: u32,
    pub max_bullet_range: f32,
    pub firing_tolerance: f32,
    pub max_firing_distance: f32,

    // === Audio ===
    pub max_sound_distance: f32,
    pub hit_volume_factor: f32,

    // === Roster ===
    pub friendlies: u32,
    pub enemies: u32,
    /// Enemies that only track with their turret (target practice)
    pub passive_enemies: u32,
    pub spawn_attempts: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_min_x: WORLD_MIN_X,
            world_max_x: WORLD_MAX_X,
            world_min_y: WORLD_MIN_Y,
            world_max_y: WORLD_MAX_Y,
            chunk_size: CHUNK_SIZE,
            feature_density: FEATURE_DENSITY,

            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            tank_width: TANK_WIDTH,
            tank_height: TANK_HEIGHT,
            tank_accel: TANK_ACCEL,
            tank_max_speed: TANK_MAX_SPEED,
            base_turn_rate: BASE_TURN_RATE,
            max_health: MAX_HEALTH,
            turret_rotation_speed: TURRET_ROTATION_SPEED,
            turret_length: TURRET_LENGTH,
            initial_turret_angle: INITIAL_TURRET_ANGLE,

            fire_cooldown_frames: FIRE_COOLDOWN_FRAMES,
            bullet_speed: BULLET_SPEED,
            bullet_radius: BULLET_RADIUS,
            bullet_damage: BULLET_DAMAGE,
            bullet_lifespan: BULLET_LIFESPAN,
            max_bullet_range: MAX_BULLET_RANGE,
            firing_tolerance: FIRING_TOLERANCE,
            max_firing_distance: MAX_FIRING_DISTANCE,

            max_sound_distance: MAX_SOUND_DISTANCE,
            hit_volume_factor: HIT_VOLUME_FACTOR,

            friendlies: NUM_FRIENDLIES,
            enemies: NUM_ENEMIES,
            passive_enemies: 0,
            spawn_attempts: SPAWN_ATTEMPTS,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world_min_x >= self.world_max_x || self.world_min_y >= self.world_max_y {
            return Err(ConfigError::Invalid("world extents are empty".into()));
        }
        if self.chunk_size <= 0 {
            return Err(ConfigError::Invalid(format!(
                "chunk_size must be positive, got {}",
                self.chunk_size
            )));
        }
        if !(0.0..=1.0).contains(&self.feature_density) {
            return Err(ConfigError::Invalid(format!(
                "feature_density must be within [0, 1], got {}",
                self.feature_density
            )));
        }
        if self.tank_width < 2.0 || self.tank_height < 2.0 {
            return Err(ConfigError::Invalid("tank dimensions too small".into()));
        }
        if self.tank_width >= self.world_width() || self.tank_height >= self.world_height() {
            return Err(ConfigError::Invalid("tank does not fit in the world".into()));
        }
        if self.tank_max_speed <= 0.0 {
            return Err(ConfigError::Invalid("tank_max_speed must be positive".into()));
        }
        Ok(())
    }

    /// The whole world as a rectangle
    pub fn world_bounds(&self) -> Rect {
        Rect::new(
            self.world_min_x,
            self.world_min_y,
            self.world_width(),
            self.world_height(),
        )
    }

    #[inline]
    pub fn world_width(&self) -> f32 {
        self.world_max_x - self.world_min_x
    }

    #[inline]
    pub fn world_height(&self) -> f32 {
        self.world_max_y - self.world_min_y
    }

    /// Reverse throttle is capped at half the forward maximum
    #[inline]
    pub fn max_reverse_speed(&self) -> f32 {
        self.tank_max_speed / 2.0
    }

    /// Base volume for a hit relative to fire/explosion
    #[inline]
    pub fn hit_volume(&self, base_volume: f32) -> f32 {
        base_volume * self.hit_volume_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "chunk_size": 250, "enemies": 5 }"#).unwrap();
        assert_eq!(tuning.chunk_size, 250);
        assert_eq!(tuning.enemies, 5);
        assert_eq!(tuning.tank_width, TANK_WIDTH);
        assert_eq!(tuning.fire_cooldown_frames, FIRE_COOLDOWN_FRAMES);
        assert_eq!(tuning.initial_turret_angle, INITIAL_TURRET_ANGLE);
    }

    #[test]
    fn test_rejects_bad_chunk_size() {
        let err = Tuning::from_json(r#"{ "chunk_size": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_density() {
        let err = Tuning::from_json(r#"{ "feature_density": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
        assert_eq!(Tuning::default().max_reverse_speed(), 1.5);
    }
}
