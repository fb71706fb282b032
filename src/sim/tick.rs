//! Fixed timestep simulation tick
//!
//! Order within a tick: menu input, player fire, player update, other tanks
//! in roster order, camera, bullets and hits, win/loss, terrain streaming.

use std::collections::HashSet;

use glam::Vec2;

use super::ai::update_ai_tank;
use super::combat::{fire, resolve_hits, update_bullets};
use super::movement::{DriveCommand, update_movement};
use super::state::{GamePhase, GameState, PLAYER_INDEX};
use super::turret::{aim_at, rotate_toward};
use crate::audio::{SoundBank, SoundContext};
use crate::error::ConfigError;
use crate::settings::{BindingSlot, DriveSystem, Key};

/// Input snapshot for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keys currently held down
    pub held: HashSet<Key>,
    /// Pointer position in screen coordinates
    pub pointer: Option<Vec2>,
    /// Fire request (mouse click)
    pub fire: bool,
    /// Pause key pressed
    pub pause: bool,
    /// Options/Escape key pressed
    pub options: bool,
    /// Start a fresh game
    pub restart: bool,
    /// Drive system chosen in the options menu
    pub select_drive: Option<DriveSystem>,
    /// Key assignment made in the options menu
    pub rebind: Option<(BindingSlot, Key)>,
}

impl TickInput {
    /// Input with the named keys held
    pub fn holding(keys: &[&str]) -> Self {
        Self {
            held: keys.iter().map(|k| Key::new(k)).collect(),
            ..Default::default()
        }
    }
}

/// Advance the game by one tick.
///
/// Only a rejected rebinding produces an error; the game state is left
/// consistent either way.
pub fn tick(state: &mut GameState, input: &TickInput, sounds: &mut SoundBank) -> Result<(), ConfigError> {
    state.sound_events.clear();

    if input.restart {
        state.reset();
        return Ok(());
    }

    handle_menu_input(state, input)?;

    if state.phase != GamePhase::Playing {
        return Ok(());
    }
    state.time_ticks += 1;

    let listener = state.player().pos;
    let GameState {
        tuning,
        settings,
        rng,
        world,
        tanks,
        bullets,
        camera,
        sound_events,
        ..
    } = &mut *state;
    let mut sound = SoundContext {
        bank: sounds,
        events: sound_events,
        listener,
        base_volume: settings.sound_volume,
        max_distance: tuning.max_sound_distance,
    };

    // Player fire request
    if input.fire
        && let Some(bullet) = fire(&mut tanks[PLAYER_INDEX], tuning, &mut sound)
    {
        bullets.push(bullet);
    }

    // Player movement and turret
    let command = match settings.drive_system {
        DriveSystem::Standard => DriveCommand::Standard(settings.bindings.standard_intent(&input.held)),
        DriveSystem::Independent => DriveCommand::Tracks(settings.bindings.track_intent(&input.held)),
    };
    let player = &mut tanks[PLAYER_INDEX];
    update_movement(player, &command, &world.features, tuning);
    player.tick_cooldown();
    if player.alive
        && let Some(pointer) = input.pointer
    {
        let target = aim_at(player.pos, camera.screen_to_world(pointer));
        player.turret_angle = rotate_toward(player.turret_angle, target, tuning.turret_rotation_speed);
    }

    // Everyone else
    for i in 0..tanks.len() {
        if i == PLAYER_INDEX {
            continue;
        }
        if let Some(bullet) = update_ai_tank(tanks, i, &world.features, tuning, rng, &mut sound) {
            bullets.push(bullet);
        }
    }

    camera.follow(listener, tuning);

    update_bullets(bullets, &world.features, tuning);
    resolve_hits(bullets, tanks, tuning, &mut sound);

    check_outcome(state);

    let reference = state.stream_reference();
    state.world.ensure_around(reference, &state.tuning, &mut state.rng);
    state.world.prune_far(reference, &state.tuning);

    Ok(())
}

/// Pause/options transitions and options-menu actions
fn handle_menu_input(state: &mut GameState, input: &TickInput) -> Result<(), ConfigError> {
    if input.pause {
        state.phase = match state.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            GamePhase::Options => GamePhase::Paused,
            other => other,
        };
    }

    if input.options {
        state.phase = match state.phase {
            GamePhase::Paused => GamePhase::Options,
            GamePhase::Options => GamePhase::Paused,
            other => other,
        };
    }

    if state.phase != GamePhase::Options {
        return Ok(());
    }

    if let Some(drive) = input.select_drive
        && drive != state.settings.drive_system
    {
        log::info!("Drive system set to {}", drive.as_str());
        state.settings.drive_system = drive;
    }

    if let Some((slot, key)) = &input.rebind
        && let Err(err) = state.settings.rebind(*slot, key.clone())
    {
        log::warn!("Rebinding {} rejected: {}", slot.label(), err);
        return Err(err);
    }

    Ok(())
}

/// Defeat takes precedence over victory
fn check_outcome(state: &mut GameState) {
    if state.player().wreck {
        state.phase = GamePhase::Defeat;
        log::info!("Defeat after {} ticks", state.time_ticks);
    } else if state.enemy_count() > 0 && state.enemies_alive() == 0 {
        state.phase = GamePhase::Victory;
        log::info!("Victory after {} ticks", state.time_ticks);
    }
}
