//! Procedural terrain and safe spawn search
//!
//! Chunks are filled by scanning a grid at half-tank stride and rolling
//! against the feature density at each point. Obstacles may overlap.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::{Rect, hits_any};
use crate::tuning::Tuning;

/// Integer key of a `chunk_size`-wide square of world space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkKey {
    pub x: i32,
    pub y: i32,
}

impl ChunkKey {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing a world position (floor division)
    pub fn containing(pos: Vec2, chunk_size: i32) -> Self {
        let size = chunk_size as f32;
        Self::new((pos.x / size).floor() as i32, (pos.y / size).floor() as i32)
    }

    /// This chunk and its eight neighbours, row by row
    pub fn neighborhood(self) -> impl Iterator<Item = ChunkKey> {
        (-1..=1).flat_map(move |dy| (-1..=1).map(move |dx| ChunkKey::new(self.x + dx, self.y + dy)))
    }
}

/// Generate the obstacles of one chunk
pub fn generate_chunk<R: Rng>(key: ChunkKey, tuning: &Tuning, rng: &mut R) -> Vec<Rect> {
    let mut features = Vec::new();
    let bounds = tuning.world_bounds();

    let start_x = key.x * tuning.chunk_size;
    let start_y = key.y * tuning.chunk_size;
    let step_x = ((tuning.tank_width / 2.0) as usize).max(1);
    let step_y = ((tuning.tank_height / 2.0) as usize).max(1);

    for x in (start_x..start_x + tuning.chunk_size).step_by(step_x) {
        for y in (start_y..start_y + tuning.chunk_size).step_by(step_y) {
            if rng.random::<f64>() >= tuning.feature_density {
                continue;
            }

            let w = rng.random_range(tuning.tank_width * 0.5..=tuning.tank_width * 1.5);
            let h = rng.random_range(tuning.tank_height * 0.5..=tuning.tank_height * 1.5);
            let feature = Rect::centered(Vec2::new(x as f32, y as f32), w, h);

            if !feature.inside(&bounds) {
                continue;
            }
            features.push(feature);
        }
    }

    features
}

/// Find a spawn point whose tank box overlaps no feature.
///
/// Samples a square of `spawn_area_size` chunks centered on the origin.
/// `_min_dist` is accepted for callers but the test is box overlap only.
/// Falls back to the origin (possibly unsafe) when attempts run out.
pub fn find_safe_spawn<R: Rng>(
    features: &[Rect],
    _min_dist: f32,
    spawn_area_size: u32,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec2 {
    let half = (spawn_area_size as f32 * tuning.chunk_size as f32) / 2.0;
    let bounds = tuning.world_bounds();

    for _ in 0..tuning.spawn_attempts {
        let candidate = Vec2::new(
            rng.random_range(-half..=half),
            rng.random_range(-half..=half),
        );

        if candidate.x < bounds.left()
            || candidate.x > bounds.right()
            || candidate.y < bounds.top()
            || candidate.y > bounds.bottom()
        {
            continue;
        }

        let footprint = Rect::centered(candidate, tuning.tank_width, tuning.tank_height);
        if !hits_any(&footprint, features) {
            return candidate;
        }
    }

    log::warn!(
        "No safe spawn found in {} attempts, falling back to origin",
        tuning.spawn_attempts
    );
    Vec2::ZERO
}
