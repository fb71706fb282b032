//! AI tank behavior
//!
//! Movement and combat are decoupled: the tank wanders in timed random
//! episodes while its turret snaps onto the nearest hostile every tick.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::combat::{can_fire_at, find_target, fire};
use super::movement::{DriveCommand, DriveIntent, update_movement};
use super::rect::Rect;
use super::state::{Bullet, Controller, Tank};
use super::turret::aim_at;
use crate::audio::SoundContext;
use crate::consts::{AI_EPISODE_MAX_TICKS, AI_EPISODE_MIN_TICKS};
use crate::tuning::Tuning;

/// Movement episode choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Maneuver {
    Forward,
    ForwardLeft,
    ForwardRight,
    Stationary,
}

impl Maneuver {
    pub fn intent(self) -> DriveIntent {
        let mut intent = DriveIntent::default();
        match self {
            Maneuver::Forward => intent.forward = true,
            Maneuver::ForwardLeft => {
                intent.forward = true;
                intent.turn_left = true;
            }
            Maneuver::ForwardRight => {
                intent.forward = true;
                intent.turn_right = true;
            }
            Maneuver::Stationary => {}
        }
        intent
    }
}

const ALL_MANEUVERS: [Maneuver; 4] = [
    Maneuver::Forward,
    Maneuver::ForwardLeft,
    Maneuver::ForwardRight,
    Maneuver::Stationary,
];

/// Per-tank wander state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiBrain {
    /// Ticks left in the current episode
    pub move_timer: u32,
    pub maneuver: Maneuver,
    /// Whether a stationary episode may be chosen
    pub may_stop: bool,
}

impl AiBrain {
    /// Enemy brain: any maneuver, including sitting still
    pub fn enemy() -> Self {
        Self {
            move_timer: 0,
            maneuver: Maneuver::Stationary,
            may_stop: true,
        }
    }

    /// Friendly brain: keeps moving to seek out enemies
    pub fn friendly() -> Self {
        Self {
            may_stop: false,
            ..Self::enemy()
        }
    }

    /// Count down the episode and roll a new one when it runs out
    pub fn next_intent<R: Rng>(&mut self, rng: &mut R) -> DriveIntent {
        self.move_timer = self.move_timer.saturating_sub(1);
        if self.move_timer == 0 {
            self.move_timer = rng.random_range(AI_EPISODE_MIN_TICKS..=AI_EPISODE_MAX_TICKS);
            let choices = if self.may_stop {
                &ALL_MANEUVERS[..]
            } else {
                &ALL_MANEUVERS[..3]
            };
            self.maneuver = choices[rng.random_range(0..choices.len())];
        }
        self.maneuver.intent()
    }
}

/// Run one AI tank for a tick. Returns the shell it fired, if any.
pub fn update_ai_tank<R: Rng>(
    tanks: &mut [Tank],
    index: usize,
    features: &[Rect],
    tuning: &Tuning,
    rng: &mut R,
    sound: &mut SoundContext<'_>,
) -> Option<Bullet> {
    if !tanks[index].alive {
        return None;
    }

    let target_pos = find_target(tanks, index).map(|t| tanks[t].pos);
    let tank = &mut tanks[index];

    let Some(target_pos) = target_pos else {
        tank.tick_cooldown();
        tank.stop();
        return None;
    };

    tank.tick_cooldown();

    let intent = match &mut tank.controller {
        Controller::SeekAndFire(brain) => brain.next_intent(rng),
        Controller::Passive => {
            tank.turret_angle = aim_at(tank.pos, target_pos);
            return None;
        }
        Controller::PlayerControlled => return None,
    };

    update_movement(tank, &DriveCommand::Standard(intent), features, tuning);

    tank.turret_angle = aim_at(tank.pos, target_pos);

    if can_fire_at(tank, target_pos, tuning) {
        fire(tank, tuning, sound)
    } else {
        None
    }
}
