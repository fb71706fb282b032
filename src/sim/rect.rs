//! Axis-aligned rectangles for terrain, hitboxes and bounds
//!
//! Edges are exclusive for overlap: two rectangles that merely touch do not
//! collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in world units (`x`, `y` is the minimum corner)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size centered on `center`
    pub fn centered(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Interiors overlap
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Half-open containment: left/top edges inside, right/bottom outside
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Entirely within `bounds` (touching the edge counts as inside)
    pub fn inside(&self, bounds: &Rect) -> bool {
        self.left() >= bounds.left()
            && self.right() <= bounds.right()
            && self.top() >= bounds.top()
            && self.bottom() <= bounds.bottom()
    }
}

/// Whether `rect` overlaps any of `obstacles`
pub fn hits_any(rect: &Rect, obstacles: &[Rect]) -> bool {
    obstacles.iter().any(|o| rect.intersects(o))
}
