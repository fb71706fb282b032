//! Player preferences
//!
//! Survive a game reset untouched: drive system, key bindings per drive
//! system, and base sound volume.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::consts::SOUND_VOLUME;
use crate::error::ConfigError;
use crate::sim::{DriveIntent, TrackIntent};

/// Control scheme mapping keys to throttle/track behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DriveSystem {
    /// Throttle plus steering
    Standard,
    /// Each track driven separately
    #[default]
    Independent,
}

impl DriveSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriveSystem::Standard => "Standard",
            DriveSystem::Independent => "Independent",
        }
    }
}

/// A keyboard key, identified by its upper-cased name ("W", "ESCAPE", ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Key(String);

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::new(&name)
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.0
    }
}

impl Key {
    pub fn new(name: &str) -> Self {
        Key(name.to_uppercase())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

pub const KEY_PAUSE: &str = "P";
pub const KEY_OPTIONS: &str = "O";

/// Keys that drive the menus or act as modifiers; never bindable
pub const RESERVED_KEYS: [&str; 9] = [
    KEY_PAUSE,
    KEY_OPTIONS,
    "ESCAPE",
    "LSHIFT",
    "RSHIFT",
    "LCTRL",
    "RCTRL",
    "LALT",
    "RALT",
];

/// A rebindable control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingSlot {
    Forward,
    Reverse,
    TurnLeft,
    TurnRight,
    LeftTrackForward,
    LeftTrackReverse,
    RightTrackForward,
    RightTrackReverse,
}

impl BindingSlot {
    /// Which drive system's map this control belongs to
    pub fn drive_system(&self) -> DriveSystem {
        match self {
            BindingSlot::Forward
            | BindingSlot::Reverse
            | BindingSlot::TurnLeft
            | BindingSlot::TurnRight => DriveSystem::Standard,
            _ => DriveSystem::Independent,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BindingSlot::Forward => "Forward",
            BindingSlot::Reverse => "Reverse",
            BindingSlot::TurnLeft => "Turn Left",
            BindingSlot::TurnRight => "Turn Right",
            BindingSlot::LeftTrackForward => "Left Track Forward",
            BindingSlot::LeftTrackReverse => "Left Track Reverse",
            BindingSlot::RightTrackForward => "Right Track Forward",
            BindingSlot::RightTrackReverse => "Right Track Reverse",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardKeys {
    pub forward: Key,
    pub reverse: Key,
    pub turn_left: Key,
    pub turn_right: Key,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndependentKeys {
    pub left_forward: Key,
    pub left_reverse: Key,
    pub right_forward: Key,
    pub right_reverse: Key,
}

/// Key maps, namespaced per drive system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub standard: StandardKeys,
    pub independent: IndependentKeys,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            standard: StandardKeys {
                forward: Key::new("W"),
                reverse: Key::new("R"),
                turn_left: Key::new("A"),
                turn_right: Key::new("S"),
            },
            independent: IndependentKeys {
                left_forward: Key::new("Q"),
                left_reverse: Key::new("A"),
                right_forward: Key::new("W"),
                right_reverse: Key::new("R"),
            },
        }
    }
}

impl KeyBindings {
    /// Current key for a control
    pub fn key(&self, slot: BindingSlot) -> &Key {
        match slot {
            BindingSlot::Forward => &self.standard.forward,
            BindingSlot::Reverse => &self.standard.reverse,
            BindingSlot::TurnLeft => &self.standard.turn_left,
            BindingSlot::TurnRight => &self.standard.turn_right,
            BindingSlot::LeftTrackForward => &self.independent.left_forward,
            BindingSlot::LeftTrackReverse => &self.independent.left_reverse,
            BindingSlot::RightTrackForward => &self.independent.right_forward,
            BindingSlot::RightTrackReverse => &self.independent.right_reverse,
        }
    }

    fn key_mut(&mut self, slot: BindingSlot) -> &mut Key {
        match slot {
            BindingSlot::Forward => &mut self.standard.forward,
            BindingSlot::Reverse => &mut self.standard.reverse,
            BindingSlot::TurnLeft => &mut self.standard.turn_left,
            BindingSlot::TurnRight => &mut self.standard.turn_right,
            BindingSlot::LeftTrackForward => &mut self.independent.left_forward,
            BindingSlot::LeftTrackReverse => &mut self.independent.left_reverse,
            BindingSlot::RightTrackForward => &mut self.independent.right_forward,
            BindingSlot::RightTrackReverse => &mut self.independent.right_reverse,
        }
    }

    /// Assign a new key to a control
    pub fn rebind(&mut self, slot: BindingSlot, key: Key) -> Result<(), ConfigError> {
        if RESERVED_KEYS.contains(&key.name()) {
            return Err(ConfigError::ReservedKey(key.name().to_string()));
        }
        log::debug!("Rebinding {} to {}", slot.label(), key.name());
        *self.key_mut(slot) = key;
        Ok(())
    }

    /// Standard-drive intent from the currently held keys
    pub fn standard_intent(&self, held: &HashSet<Key>) -> DriveIntent {
        DriveIntent {
            forward: held.contains(&self.standard.forward),
            reverse: held.contains(&self.standard.reverse),
            turn_left: held.contains(&self.standard.turn_left),
            turn_right: held.contains(&self.standard.turn_right),
        }
    }

    /// Independent-track intent from the currently held keys
    pub fn track_intent(&self, held: &HashSet<Key>) -> TrackIntent {
        TrackIntent {
            left_forward: held.contains(&self.independent.left_forward),
            left_reverse: held.contains(&self.independent.left_reverse),
            right_forward: held.contains(&self.independent.right_forward),
            right_reverse: held.contains(&self.independent.right_reverse),
        }
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub drive_system: DriveSystem,
    pub bindings: KeyBindings,
    /// Base sound volume (0.0 - 1.0) before distance attenuation
    pub sound_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            drive_system: DriveSystem::default(),
            bindings: KeyBindings::default(),
            sound_volume: SOUND_VOLUME,
        }
    }
}

impl Settings {
    /// Parse preferences from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.set_sound_volume(settings.sound_volume);
        for key in settings.bound_keys() {
            if RESERVED_KEYS.contains(&key.name()) {
                return Err(ConfigError::ReservedKey(key.name().to_string()));
            }
        }
        Ok(settings)
    }

    fn bound_keys(&self) -> [&Key; 8] {
        let s = &self.bindings.standard;
        let i = &self.bindings.independent;
        [
            &s.forward,
            &s.reverse,
            &s.turn_left,
            &s.turn_right,
            &i.left_forward,
            &i.left_reverse,
            &i.right_forward,
            &i.right_reverse,
        ]
    }

    /// Set base volume (0.0 - 1.0)
    pub fn set_sound_volume(&mut self, vol: f32) {
        self.sound_volume = vol.clamp(0.0, 1.0);
    }

    /// Rebind a control of the active drive system
    pub fn rebind(&mut self, slot: BindingSlot, key: Key) -> Result<(), ConfigError> {
        if slot.drive_system() != self.drive_system {
            return Err(ConfigError::InactiveSlot(slot.label()));
        }
        self.bindings.rebind(slot, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(keys: &[&str]) -> HashSet<Key> {
        keys.iter().map(|k| Key::new(k)).collect()
    }

    #[test]
    fn test_default_bindings_map_intents() {
        let bindings = KeyBindings::default();
        let intent = bindings.standard_intent(&held(&["w", "a"]));
        assert!(intent.forward && intent.turn_left);
        assert!(!intent.reverse && !intent.turn_right);

        let tracks = bindings.track_intent(&held(&["Q", "R"]));
        assert!(tracks.left_forward && tracks.right_reverse);
        assert!(!tracks.left_reverse && !tracks.right_forward);
    }

    #[test]
    fn test_rebind_active_slot() {
        let mut settings = Settings::default();
        settings.drive_system = DriveSystem::Standard;
        settings.rebind(BindingSlot::Forward, Key::new("up")).unwrap();
        assert_eq!(settings.bindings.key(BindingSlot::Forward).name(), "UP");
        assert!(settings.bindings.standard_intent(&held(&["UP"])).forward);
    }

    #[test]
    fn test_rebind_rejects_reserved_key() {
        let mut settings = Settings::default();
        let err = settings
            .rebind(BindingSlot::LeftTrackForward, Key::new("escape"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ReservedKey(_)));
        assert_eq!(settings.bindings, KeyBindings::default());
    }

    #[test]
    fn test_menu_keys_are_reserved() {
        let mut settings = Settings::default();
        for key in [KEY_PAUSE, KEY_OPTIONS, "p", "o"] {
            let err = settings
                .rebind(BindingSlot::RightTrackForward, Key::new(key))
                .unwrap_err();
            assert!(matches!(err, ConfigError::ReservedKey(_)));
        }
        assert_eq!(settings.bindings, KeyBindings::default());
    }

    #[test]
    fn test_rebind_rejects_inactive_slot() {
        let mut settings = Settings::default();
        assert_eq!(settings.drive_system, DriveSystem::Independent);
        let err = settings.rebind(BindingSlot::Forward, Key::new("X")).unwrap_err();
        assert!(matches!(err, ConfigError::InactiveSlot(_)));
    }

    #[test]
    fn test_from_json_partial_and_reserved() {
        let settings = Settings::from_json(r#"{ "drive_system": "Standard", "sound_volume": 4.0 }"#).unwrap();
        assert_eq!(settings.drive_system, DriveSystem::Standard);
        assert_eq!(settings.sound_volume, 1.0);
        assert_eq!(settings.bindings, KeyBindings::default());

        let json = r#"{ "bindings": { "standard": { "forward": "ESCAPE", "reverse": "R", "turn_left": "A", "turn_right": "S" },
            "independent": { "left_forward": "Q", "left_reverse": "A", "right_forward": "W", "right_reverse": "R" } } }"#;
        let err = Settings::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::ReservedKey(_)));
    }

    #[test]
    fn test_volume_clamped() {
        let mut settings = Settings::default();
        settings.set_sound_volume(3.0);
        assert_eq!(settings.sound_volume, 1.0);
    }
}
