//! Turret aiming

use glam::Vec2;

use crate::{bearing_degrees, normalize_degrees, shortest_angle_diff};

/// Rotate `current` toward `target` by at most `max_step` degrees.
///
/// Takes the short way around and snaps onto the target once it is within
/// one step. The result is in [0, 360).
pub fn rotate_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let diff = shortest_angle_diff(current, target);
    if diff.abs() > max_step {
        normalize_degrees(current + max_step * diff.signum())
    } else {
        normalize_degrees(target)
    }
}

/// Instant aim from `from` at `to`
pub fn aim_at(from: Vec2, to: Vec2) -> f32 {
    normalize_degrees(bearing_degrees(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_toward_steps_short_way() {
        // 350 -> 10 goes up through 360
        let a = rotate_toward(350.0, 10.0, 1.5);
        assert!((a - 351.5).abs() < 1e-4);
        // 10 -> 350 goes down through 0
        let b = rotate_toward(10.0, 350.0, 1.5);
        assert!((b - 8.5).abs() < 1e-4);
        let c = rotate_toward(1.0, 350.0, 1.5);
        assert!((c - 359.5).abs() < 1e-4);
    }

    #[test]
    fn test_rotate_toward_snaps_within_step() {
        assert_eq!(rotate_toward(90.0, 91.0, 1.5), 91.0);
        assert_eq!(rotate_toward(0.5, -0.5, 1.5), 359.5);
    }

    #[test]
    fn test_rotate_toward_converges() {
        let mut angle = 90.0;
        for _ in 0..200 {
            angle = rotate_toward(angle, 300.0, 1.5);
        }
        assert_eq!(angle, 300.0);
    }

    #[test]
    fn test_aim_at_cardinal_directions() {
        assert!((aim_at(Vec2::ZERO, Vec2::new(10.0, 0.0)) - 0.0).abs() < 1e-4);
        assert!((aim_at(Vec2::ZERO, Vec2::new(0.0, -10.0)) - 90.0).abs() < 1e-4);
        assert!((aim_at(Vec2::ZERO, Vec2::new(-10.0, 0.0)) - 180.0).abs() < 1e-4);
        assert!((aim_at(Vec2::ZERO, Vec2::new(0.0, 10.0)) - 270.0).abs() < 1e-4);
    }
}
