//! Game state and core simulation types
//!
//! All mutable game state lives in [`GameState`]. Tanks are never removed
//! from the roster; destroyed tanks stay behind as wrecks.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::AiBrain;
use super::camera::Camera;
use super::rect::Rect;
use super::terrain::{ChunkKey, find_safe_spawn};
use super::world::World;
use crate::audio::SoundEvent;
use crate::consts::*;
use crate::{heading_vector, normalize_degrees};
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Which side a tank fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Allegiance {
    Player,
    Friendly,
    Enemy,
}

impl Allegiance {
    /// Enemies fight the player and friendlies; everyone else fights enemies
    pub fn is_hostile_to(self, other: Allegiance) -> bool {
        match self {
            Allegiance::Enemy => other != Allegiance::Enemy,
            Allegiance::Player | Allegiance::Friendly => other == Allegiance::Enemy,
        }
    }
}

/// What decides a tank's actions each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Controller {
    /// Driven by held keys and the pointer
    PlayerControlled,
    /// Wanders in random episodes, aims and fires at the nearest hostile
    SeekAndFire(AiBrain),
    /// Stands still and only turns its turret
    Passive,
}

/// A tank entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    pub id: u32,
    pub allegiance: Allegiance,
    pub controller: Controller,
    /// Center in world units
    pub pos: Vec2,
    /// Body heading in degrees, [0, 360)
    pub angle: f32,
    /// Turret heading in degrees, independent of the body
    pub turret_angle: f32,
    /// Signed forward speed in world units per tick
    pub speed: f32,
    pub left_track_speed: f32,
    pub right_track_speed: f32,
    pub health: u32,
    pub max_health: u32,
    pub alive: bool,
    pub wreck: bool,
    /// Ticks until the cannon can fire again
    pub fire_cooldown: u32,
}

impl Tank {
    pub fn new(
        id: u32,
        allegiance: Allegiance,
        controller: Controller,
        pos: Vec2,
        tuning: &Tuning,
    ) -> Self {
        Self {
            id,
            allegiance,
            controller,
            pos,
            angle: 0.0,
            turret_angle: normalize_degrees(tuning.initial_turret_angle),
            speed: 0.0,
            left_track_speed: 0.0,
            right_track_speed: 0.0,
            health: tuning.max_health,
            max_health: tuning.max_health,
            alive: true,
            wreck: false,
            fire_cooldown: 0,
        }
    }

    /// Axis-aligned body box (not rotated with the heading)
    pub fn hitbox(&self, tuning: &Tuning) -> Rect {
        Rect::centered(self.pos, tuning.tank_width, tuning.tank_height)
    }

    /// Zero body and track speeds
    pub fn stop(&mut self) {
        self.speed = 0.0;
        self.left_track_speed = 0.0;
        self.right_track_speed = 0.0;
    }

    /// World position of the cannon muzzle
    pub fn muzzle(&self, tuning: &Tuning) -> Vec2 {
        self.pos + heading_vector(self.turret_angle) * tuning.turret_length
    }

    pub fn is_hostile_to(&self, other: &Tank) -> bool {
        self.allegiance.is_hostile_to(other.allegiance)
    }

    #[inline]
    pub fn tick_cooldown(&mut self) {
        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
    }
}

/// A cannon shell in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Where the shell left the muzzle (range is measured from here)
    pub origin: Vec2,
    /// Ticks left before the shell burns out
    pub lifespan: u32,
    /// Side of the tank that fired (for coloring)
    pub owner: Allegiance,
}

impl Bullet {
    pub fn new(pos: Vec2, angle: f32, owner: Allegiance, tuning: &Tuning) -> Self {
        Self {
            pos,
            vel: heading_vector(angle) * tuning.bullet_speed,
            origin: pos,
            lifespan: tuning.bullet_lifespan,
            owner,
        }
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frozen, waiting for resume or the options menu
    Paused,
    /// Options menu: drive system and key bindings
    Options,
    /// All enemies destroyed
    Victory,
    /// Player tank destroyed
    Defeat,
}

impl GamePhase {
    pub fn is_game_over(self) -> bool {
        matches!(self, GamePhase::Victory | GamePhase::Defeat)
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Preferences; the only thing a reset keeps
    pub settings: Settings,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub world: World,
    /// Player first, then friendlies, enemies and passive enemies
    pub tanks: Vec<Tank>,
    pub bullets: Vec<Bullet>,
    pub camera: Camera,
    /// Audible sounds from the last tick, for direction indicators
    pub sound_events: Vec<SoundEvent>,
}

/// Index of the player tank in [`GameState::tanks`]
pub const PLAYER_INDEX: usize = 0;

impl GameState {
    /// Create a new game with the given seed
    pub fn new(seed: u64, tuning: Tuning, settings: Settings) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            settings,
            phase: GamePhase::Playing,
            time_ticks: 0,
            world: World::new(),
            tanks: Vec::new(),
            bullets: Vec::new(),
            camera: Camera::default(),
            sound_events: Vec::new(),
        };
        state.populate();
        log::info!(
            "New game (seed {}): {} tanks, {} terrain features",
            seed,
            state.tanks.len(),
            state.world.features.len()
        );
        state
    }

    /// Rebuild terrain, roster and bullets; settings survive
    pub fn reset(&mut self) {
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        self.world = World::new();
        self.tanks.clear();
        self.bullets.clear();
        self.sound_events.clear();
        self.populate();
        log::info!(
            "Game reset ({} drive kept)",
            self.settings.drive_system.as_str()
        );
    }

    /// Generate the center terrain and spawn the roster
    fn populate(&mut self) {
        for key in ChunkKey::new(0, 0).neighborhood() {
            self.world.ensure_chunk(key, &self.tuning, &mut self.rng);
        }

        self.spawn(Allegiance::Player, Controller::PlayerControlled, PLAYER_SPAWN_AREA);
        for _ in 0..self.tuning.friendlies {
            self.spawn(
                Allegiance::Friendly,
                Controller::SeekAndFire(AiBrain::friendly()),
                AI_SPAWN_AREA,
            );
        }
        for _ in 0..self.tuning.enemies {
            self.spawn(
                Allegiance::Enemy,
                Controller::SeekAndFire(AiBrain::enemy()),
                AI_SPAWN_AREA,
            );
        }
        for _ in 0..self.tuning.passive_enemies {
            self.spawn(Allegiance::Enemy, Controller::Passive, AI_SPAWN_AREA);
        }

        self.camera = Camera::centered_on(self.player().pos, &self.tuning);
    }

    fn spawn(&mut self, allegiance: Allegiance, controller: Controller, area: u32) {
        let pos = find_safe_spawn(
            &self.world.features,
            SPAWN_MIN_DIST,
            area,
            &self.tuning,
            &mut self.rng,
        );
        let id = self.tanks.len() as u32;
        let mut tank = Tank::new(id, allegiance, controller, pos, &self.tuning);
        tank.angle = self.rng.random_range(0..360) as f32;
        self.tanks.push(tank);
    }

    pub fn player(&self) -> &Tank {
        &self.tanks[PLAYER_INDEX]
    }

    pub fn player_mut(&mut self) -> &mut Tank {
        &mut self.tanks[PLAYER_INDEX]
    }

    /// Number of enemy tanks in the roster, alive or not
    pub fn enemy_count(&self) -> usize {
        self.tanks
            .iter()
            .filter(|t| t.allegiance == Allegiance::Enemy)
            .count()
    }

    pub fn enemies_alive(&self) -> usize {
        self.tanks
            .iter()
            .filter(|t| t.allegiance == Allegiance::Enemy && t.alive)
            .count()
    }

    /// Where streaming is centered: the player, or the view center once the player is gone
    pub fn stream_reference(&self) -> Vec2 {
        let player = self.player();
        if player.alive {
            player.pos
        } else {
            self.camera.view_center(&self.tuning)
        }
    }
}
