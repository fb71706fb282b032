//! Tank drive model
//!
//! Three ways in (standard throttle, independent tracks, AI intents), one
//! way out: every mode ends in the same integrate-collide-clamp step.

use serde::{Deserialize, Serialize};

use super::rect::{Rect, hits_any};
use super::state::Tank;
use crate::heading_vector;
use crate::normalize_degrees;
use crate::tuning::Tuning;

/// Below this speed a tank cannot steer in standard drive
const STEER_DEADBAND: f32 = 0.01;

/// Turn rate multiplier for track differential steering
const TRACK_TURN_GAIN: f32 = 5.0;

/// Throttle/steering request (standard drive and AI)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveIntent {
    pub forward: bool,
    pub reverse: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

/// Per-track request (independent drive)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackIntent {
    pub left_forward: bool,
    pub left_reverse: bool,
    pub right_forward: bool,
    pub right_reverse: bool,
}

impl TrackIntent {
    /// One track driven forward while the other is driven in reverse
    pub fn is_opposed(&self) -> bool {
        (self.left_forward && self.right_reverse) || (self.left_reverse && self.right_forward)
    }
}

/// What a tank was asked to do this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveCommand {
    Standard(DriveIntent),
    Tracks(TrackIntent),
}

/// Step `speed` one tick toward the requested direction.
///
/// Forward wins if both directions are requested. Without a request the
/// speed decays toward zero at half the acceleration.
pub fn step_throttle(
    speed: f32,
    forward: bool,
    reverse: bool,
    max_forward: f32,
    max_reverse: f32,
    accel: f32,
) -> f32 {
    if forward {
        (speed + accel).min(max_forward)
    } else if reverse {
        (speed - accel).max(-max_reverse)
    } else if speed > 0.0 {
        (speed - accel / 2.0).max(0.0)
    } else {
        (speed + accel / 2.0).min(0.0)
    }
}

/// Standard-drive turn rate: sharper when slow, `base` at full speed, `2 * base` at rest
pub fn standard_turn_rate(speed: f32, tuning: &Tuning) -> f32 {
    let max = tuning.tank_max_speed;
    let speed_factor = 1.0 + (max - speed.abs()) / max;
    tuning.base_turn_rate * speed_factor
}

/// Counter-clockwise turn rate from the track differential
pub fn track_turn_rate(left: f32, right: f32, opposed: bool, tuning: &Tuning) -> f32 {
    let difference = right - left;
    let rate = difference / (2.0 * tuning.tank_max_speed) * tuning.base_turn_rate * TRACK_TURN_GAIN;
    if opposed { rate * 2.0 } else { rate }
}

/// Advance one tank by one tick
pub fn update_movement(tank: &mut Tank, command: &DriveCommand, features: &[Rect], tuning: &Tuning) {
    if !tank.alive {
        return;
    }

    match command {
        DriveCommand::Standard(intent) => apply_standard(tank, intent, tuning),
        DriveCommand::Tracks(intent) => apply_tracks(tank, intent, tuning),
    }

    integrate(tank, features, tuning);
}

fn apply_standard(tank: &mut Tank, intent: &DriveIntent, tuning: &Tuning) {
    tank.speed = step_throttle(
        tank.speed,
        intent.forward,
        intent.reverse,
        tuning.tank_max_speed,
        tuning.max_reverse_speed(),
        tuning.tank_accel,
    );

    if tank.speed.abs() > STEER_DEADBAND && (intent.turn_left || intent.turn_right) {
        let rate = standard_turn_rate(tank.speed, tuning);
        // Steering inverts when backing up
        let direction = if tank.speed > 0.0 { 1.0 } else { -1.0 };
        if intent.turn_left {
            tank.angle += rate * direction;
        } else {
            tank.angle -= rate * direction;
        }
        tank.angle = normalize_degrees(tank.angle);
    }
}

fn apply_tracks(tank: &mut Tank, intent: &TrackIntent, tuning: &Tuning) {
    let opposed = intent.is_opposed();
    let max_forward = if opposed {
        tuning.tank_max_speed / 2.0
    } else {
        tuning.tank_max_speed
    };
    let max_reverse = tuning.max_reverse_speed();

    tank.left_track_speed = step_throttle(
        tank.left_track_speed,
        intent.left_forward && !intent.left_reverse,
        intent.left_reverse && !intent.left_forward,
        max_forward,
        max_reverse,
        tuning.tank_accel,
    );
    tank.right_track_speed = step_throttle(
        tank.right_track_speed,
        intent.right_forward && !intent.right_reverse,
        intent.right_reverse && !intent.right_forward,
        max_forward,
        max_reverse,
        tuning.tank_accel,
    );

    tank.speed = (tank.left_track_speed + tank.right_track_speed) / 2.0;
    let rate = track_turn_rate(tank.left_track_speed, tank.right_track_speed, opposed, tuning);
    tank.angle = normalize_degrees(tank.angle + rate);
}

/// Move along the heading, stop dead on terrain, clamp to the world
fn integrate(tank: &mut Tank, features: &[Rect], tuning: &Tuning) {
    let candidate = tank.pos + heading_vector(tank.angle) * tank.speed;
    let footprint = Rect::centered(candidate, tuning.tank_width, tuning.tank_height);

    if hits_any(&footprint, features) {
        tank.stop();
    } else {
        tank.pos = candidate;
    }

    let half_w = tuning.tank_width / 2.0;
    let half_h = tuning.tank_height / 2.0;
    let clamped_x = tank
        .pos
        .x
        .clamp(tuning.world_min_x + half_w, tuning.world_max_x - half_w);
    let clamped_y = tank
        .pos
        .y
        .clamp(tuning.world_min_y + half_h, tuning.world_max_y - half_h);

    if clamped_x != tank.pos.x || clamped_y != tank.pos.y {
        tank.stop();
        tank.pos.x = clamped_x;
        tank.pos.y = clamped_y;
    }
}
