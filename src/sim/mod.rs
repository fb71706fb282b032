//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (roster order)
//! - No rendering or platform dependencies

pub mod ai;
pub mod camera;
pub mod combat;
pub mod movement;
pub mod rect;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod turret;
pub mod world;

pub use ai::{AiBrain, Maneuver, update_ai_tank};
pub use camera::Camera;
pub use combat::{
    BulletFate, advance_bullet, can_fire_at, find_target, fire, resolve_hits, take_damage,
    update_bullets,
};
pub use movement::{DriveCommand, DriveIntent, TrackIntent, update_movement};
pub use rect::Rect;
pub use state::{Allegiance, Bullet, Controller, GamePhase, GameState, PLAYER_INDEX, Tank};
pub use terrain::{ChunkKey, find_safe_spawn, generate_chunk};
pub use tick::{TickInput, tick};
pub use turret::{aim_at, rotate_toward};
pub use world::World;
