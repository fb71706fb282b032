//! Chunked terrain streaming
//!
//! The generated-chunk set only grows during a session: a chunk is generated
//! at most once, even after its features have been pruned.

use std::collections::HashSet;

use glam::Vec2;
use rand::Rng;

use super::rect::Rect;
use super::terrain::{ChunkKey, generate_chunk};
use crate::tuning::Tuning;

/// Terrain features plus the record of which chunks produced them
#[derive(Debug, Clone, Default)]
pub struct World {
    pub features: Vec<Rect>,
    pub generated: HashSet<ChunkKey>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a chunk if it has never been generated. Returns true if new.
    pub fn ensure_chunk<R: Rng>(&mut self, key: ChunkKey, tuning: &Tuning, rng: &mut R) -> bool {
        if !self.generated.insert(key) {
            return false;
        }
        let features = generate_chunk(key, tuning, rng);
        log::debug!(
            "Generated chunk ({}, {}) with {} features",
            key.x,
            key.y,
            features.len()
        );
        self.features.extend(features);
        true
    }

    /// Make sure the 3x3 block of chunks around `reference` exists
    pub fn ensure_around<R: Rng>(&mut self, reference: Vec2, tuning: &Tuning, rng: &mut R) {
        let center = ChunkKey::containing(reference, tuning.chunk_size);
        for key in center.neighborhood() {
            self.ensure_chunk(key, tuning, rng);
        }
    }

    /// Drop features farther than the world's full extent from `reference` on either axis
    pub fn prune_far(&mut self, reference: Vec2, tuning: &Tuning) {
        let (max_dx, max_dy) = (tuning.world_width(), tuning.world_height());
        self.features
            .retain(|f| (f.x - reference.x).abs() < max_dx && (f.y - reference.y).abs() < max_dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn dense() -> Tuning {
        Tuning {
            feature_density: 0.05,
            ..Default::default()
        }
    }

    #[test]
    fn test_ensure_around_generates_nine_chunks_once() {
        let tuning = dense();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut world = World::new();

        world.ensure_around(Vec2::new(10.0, 10.0), &tuning, &mut rng);
        assert_eq!(world.generated.len(), 9);
        let count = world.features.len();

        // Same neighborhood again: nothing regenerated
        world.ensure_around(Vec2::new(400.0, 400.0), &tuning, &mut rng);
        assert_eq!(world.generated.len(), 9);
        assert_eq!(world.features.len(), count);

        // Step one chunk right: three new chunks
        world.ensure_around(Vec2::new(510.0, 10.0), &tuning, &mut rng);
        assert_eq!(world.generated.len(), 12);
        assert!(world.generated.contains(&ChunkKey::new(2, 1)));
    }

    #[test]
    fn test_pruned_chunk_is_not_regenerated() {
        let tuning = dense();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut world = World::new();
        assert!(world.ensure_chunk(ChunkKey::new(0, 0), &tuning, &mut rng));
        world.features.clear();
        assert!(!world.ensure_chunk(ChunkKey::new(0, 0), &tuning, &mut rng));
        assert!(world.features.is_empty());
    }

    #[test]
    fn test_prune_far_uses_full_extent() {
        let tuning = Tuning::default();
        let mut world = World::new();
        world.features = vec![
            Rect::new(-2900.0, 0.0, 10.0, 10.0),
            Rect::new(2900.0, 0.0, 10.0, 10.0),
            Rect::new(0.0, 2900.0, 10.0, 10.0),
        ];

        // From the center nothing is a full world width away
        world.prune_far(Vec2::ZERO, &tuning);
        assert_eq!(world.features.len(), 3);

        // From the far right edge the leftmost feature is 5900 away: kept (< 6000)
        world.prune_far(Vec2::new(2970.0, 0.0), &tuning);
        assert_eq!(world.features.len(), 3);

        // A reference beyond the edge drops it
        world.prune_far(Vec2::new(3200.0, 0.0), &tuning);
        assert_eq!(world.features.len(), 2);
        assert!(world.features.iter().all(|f| f.x > 0.0 || f.y > 0.0));
    }
}
