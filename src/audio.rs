//! Positional sound for the simulation
//!
//! The core never mixes audio. It attenuates by distance to the listener,
//! drives abstract sound handles, and records audible events so a HUD can
//! draw directional indicators.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundKind {
    /// Tank fired its cannon
    Fire,
    /// Tank destroyed
    Explosion,
    /// Bullet struck a tank
    Hit,
}

/// An audible occurrence, for indicator overlays
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundEvent {
    pub kind: SoundKind,
    pub pos: Vec2,
    /// Attenuated volume (always > 0)
    pub volume: f32,
}

/// Something that can be played at a volume
pub trait SoundHandle {
    fn play(&mut self);
    fn set_volume(&mut self, volume: f32);
}

/// Stand-in used when audio assets are unavailable
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSound;

impl SoundHandle for SilentSound {
    fn play(&mut self) {}
    fn set_volume(&mut self, _volume: f32) {}
}

/// The three handles the game plays
pub struct SoundBank {
    pub fire: Box<dyn SoundHandle>,
    pub explosion: Box<dyn SoundHandle>,
    pub hit: Box<dyn SoundHandle>,
}

impl Default for SoundBank {
    fn default() -> Self {
        Self::silent()
    }
}

impl std::fmt::Debug for SoundBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundBank").finish_non_exhaustive()
    }
}

impl SoundBank {
    pub fn new(
        fire: Box<dyn SoundHandle>,
        explosion: Box<dyn SoundHandle>,
        hit: Box<dyn SoundHandle>,
    ) -> Self {
        Self {
            fire,
            explosion,
            hit,
        }
    }

    /// All handles silent
    pub fn silent() -> Self {
        Self::new(
            Box::new(SilentSound),
            Box::new(SilentSound),
            Box::new(SilentSound),
        )
    }

    /// Set volume and play. Inaudible sounds are still played (at zero volume)
    /// but produce no event.
    pub fn emit(&mut self, kind: SoundKind, pos: Vec2, volume: f32) -> Option<SoundEvent> {
        let handle = match kind {
            SoundKind::Fire => &mut self.fire,
            SoundKind::Explosion => &mut self.explosion,
            SoundKind::Hit => &mut self.hit,
        };
        handle.set_volume(volume);
        handle.play();

        (volume > 0.0).then_some(SoundEvent { kind, pos, volume })
    }
}

/// Everything needed to play a positional sound during one tick
pub struct SoundContext<'a> {
    pub bank: &'a mut SoundBank,
    pub events: &'a mut Vec<SoundEvent>,
    pub listener: Vec2,
    /// Volume of a sound played right at the listener
    pub base_volume: f32,
    pub max_distance: f32,
}

impl SoundContext<'_> {
    /// Attenuate toward the listener, play, and record the event if audible
    pub fn play(&mut self, kind: SoundKind, pos: Vec2, base_volume: f32) {
        let volume = attenuate(pos, self.listener, base_volume, self.max_distance);
        if let Some(event) = self.bank.emit(kind, pos, volume) {
            self.events.push(event);
        }
    }
}

/// Linear falloff: `base_volume` at distance 0, silent at `max_distance` and beyond
pub fn attenuate(source: Vec2, listener: Vec2, base_volume: f32, max_distance: f32) -> f32 {
    if max_distance <= 0.0 {
        return base_volume;
    }
    let distance = source.distance(listener);
    if distance >= max_distance {
        return 0.0;
    }
    let ratio = 1.0 - distance / max_distance;
    ratio.clamp(0.0, 1.0) * base_volume
}
