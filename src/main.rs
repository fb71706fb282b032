//! Tank Battle headless runner
//!
//! Plays a scripted game for a fixed number of ticks and prints a JSON
//! summary. Rendering and audio front ends drive the same `tick` function.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::Vec2;
use serde::Serialize;

use tank_battle::audio::{SoundBank, SoundKind};
use tank_battle::consts::FPS;
use tank_battle::sim::{
    Allegiance, GamePhase, GameState, PLAYER_INDEX, TickInput, find_target, tick,
};
use tank_battle::{ConfigError, DriveSystem, Settings, Tuning};

#[derive(Parser)]
#[command(name = "tank-battle", about = "Run a headless tank battle and print a JSON summary")]
struct Cli {
    /// Seed for terrain, spawns and AI
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Maximum number of ticks to simulate
    #[arg(long, default_value_t = u64::from(FPS) * 60)]
    ticks: u64,

    /// JSON file with world and physics tuning
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// JSON file with drive system, key bindings and volume
    #[arg(long)]
    settings: Option<PathBuf>,
}

struct Options {
    seed: u64,
    ticks: u64,
    tuning: Tuning,
    settings: Settings,
}

impl Cli {
    /// Read the optional config files; defaults stand in for missing ones
    fn load(self) -> Result<Options, ConfigError> {
        let tuning = match &self.tuning {
            Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
            None => Tuning::default(),
        };
        let settings = match &self.settings {
            Some(path) => Settings::from_json(&std::fs::read_to_string(path)?)?,
            None => Settings::default(),
        };
        Ok(Options {
            seed: self.seed,
            ticks: self.ticks,
            tuning,
            settings,
        })
    }
}

/// Drive forward, aim at the nearest enemy, keep the trigger held
fn autopilot(state: &GameState) -> TickInput {
    let bindings = &state.settings.bindings;
    let keys = match state.settings.drive_system {
        DriveSystem::Standard => vec![bindings.standard.forward.name()],
        DriveSystem::Independent => vec![
            bindings.independent.left_forward.name(),
            bindings.independent.right_forward.name(),
        ],
    };

    let pointer = find_target(&state.tanks, PLAYER_INDEX)
        .map(|i| state.camera.world_to_screen(state.tanks[i].pos));

    TickInput {
        pointer,
        fire: pointer.is_some(),
        ..TickInput::holding(&keys)
    }
}

#[derive(Serialize)]
struct TankSummary {
    id: u32,
    allegiance: Allegiance,
    pos: Vec2,
    health: u32,
    wreck: bool,
}

#[derive(Serialize)]
struct Summary {
    seed: u64,
    ticks: u64,
    phase: GamePhase,
    drive_system: DriveSystem,
    chunks_generated: usize,
    terrain_features: usize,
    bullets_in_flight: usize,
    shots_heard: usize,
    explosions_heard: usize,
    tanks: Vec<TankSummary>,
}

fn run(options: Options) -> Summary {
    let mut state = GameState::new(options.seed, options.tuning, options.settings);
    let mut sounds = SoundBank::silent();
    let (mut shots, mut explosions) = (0, 0);

    for _ in 0..options.ticks {
        if state.phase.is_game_over() {
            break;
        }
        let input = autopilot(&state);
        if let Err(err) = tick(&mut state, &input, &mut sounds) {
            log::warn!("Tick rejected input: {err}");
        }
        for event in &state.sound_events {
            match event.kind {
                SoundKind::Fire => shots += 1,
                SoundKind::Explosion => explosions += 1,
                SoundKind::Hit => {}
            }
        }
    }

    log::info!("Finished in phase {:?} after {} ticks", state.phase, state.time_ticks);

    Summary {
        seed: state.seed,
        ticks: state.time_ticks,
        phase: state.phase,
        drive_system: state.settings.drive_system,
        chunks_generated: state.world.generated.len(),
        terrain_features: state.world.features.len(),
        bullets_in_flight: state.bullets.len(),
        shots_heard: shots,
        explosions_heard: explosions,
        tanks: state
            .tanks
            .iter()
            .map(|t| TankSummary {
                id: t.id,
                allegiance: t.allegiance,
                pos: t.pos,
                health: t.health,
                wreck: t.wreck,
            })
            .collect(),
    }
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Tank Battle (headless) starting...");

    let options = match Cli::parse().load() {
        Ok(options) => options,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let summary = run(options);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Failed to serialize summary: {err}");
            ExitCode::FAILURE
        }
    }
}
