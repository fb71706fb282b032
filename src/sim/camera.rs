//! Viewport camera
//!
//! The offset is added to world coordinates to get screen coordinates.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub offset: Vec2,
}

impl Camera {
    /// Camera centered on `focus`, clamped to the world
    pub fn centered_on(focus: Vec2, tuning: &Tuning) -> Self {
        let mut camera = Self::default();
        camera.follow(focus, tuning);
        camera
    }

    /// Center on `focus` without showing anything outside the world
    pub fn follow(&mut self, focus: Vec2, tuning: &Tuning) {
        let viewport = Vec2::new(tuning.screen_width, tuning.screen_height);
        let ideal = viewport / 2.0 - focus;

        let min = viewport - Vec2::new(tuning.world_max_x, tuning.world_max_y);
        let max = -Vec2::new(tuning.world_min_x, tuning.world_min_y);

        // A world smaller than the viewport pins to `min`
        self.offset = ideal.min(max).max(min);
    }

    #[inline]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen - self.offset
    }

    #[inline]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world + self.offset
    }

    /// World position at the middle of the viewport
    pub fn view_center(&self, tuning: &Tuning) -> Vec2 {
        self.screen_to_world(Vec2::new(tuning.screen_width, tuning.screen_height) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_centers_in_open_space() {
        let tuning = Tuning::default();
        let camera = Camera::centered_on(Vec2::new(100.0, -200.0), &tuning);
        assert_eq!(camera.offset, Vec2::new(500.0, 600.0));
        assert_eq!(camera.view_center(&tuning), Vec2::new(100.0, -200.0));
        assert_eq!(camera.world_to_screen(Vec2::new(100.0, -200.0)), Vec2::new(600.0, 400.0));
    }

    #[test]
    fn test_follow_clamps_at_world_edges() {
        let tuning = Tuning::default();

        // Near the top-left corner the camera stops at the world edge
        let camera = Camera::centered_on(Vec2::new(-2990.0, -2990.0), &tuning);
        assert_eq!(camera.offset, Vec2::new(3000.0, 3000.0));
        assert_eq!(camera.screen_to_world(Vec2::ZERO), Vec2::new(-3000.0, -3000.0));

        // Near the bottom-right corner
        let camera = Camera::centered_on(Vec2::new(2990.0, 2990.0), &tuning);
        assert_eq!(camera.offset, Vec2::new(-1800.0, -2200.0));
        assert_eq!(
            camera.screen_to_world(Vec2::new(1200.0, 800.0)),
            Vec2::new(3000.0, 3000.0)
        );
    }
}
