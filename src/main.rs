//! Kaiju Shooter headless runner
//!
//! Plays a seeded run on autopilot, checks the state rules every frame, and
//! optionally dumps the final snapshot as JSON.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kaiju_shooter::Tuning;
use kaiju_shooter::consts::TICK_RATE;
use kaiju_shooter::sim::{GameEvent, GameState, autopilot, tick};

#[derive(Parser, Debug)]
#[command(name = "kaiju-shooter")]
#[command(about = "Headless autopilot runs of the Kaiju Shooter simulation")]
struct Cli {
    /// Run seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Frame budget (the run also stops on game over or clear)
    #[arg(long, default_value_t = 60 * 60 * 5)]
    frames: u64,
    /// Balance overrides as JSON
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Write the final snapshot here as JSON
    #[arg(long)]
    dump: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Kaiju Shooter (headless) starting...");

    let cli = Cli::parse();

    let tuning = match &cli.tuning {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("failed to load tuning from {}", path.display()))?,
        None => Tuning::default(),
    };

    let mut state = GameState::with_tuning(cli.seed, tuning);
    log::info!("Game initialized with seed: {}", cli.seed);

    for _ in 0..cli.frames {
        let controls = autopilot(&state);
        tick(&mut state, &controls);

        for event in &state.events {
            match event {
                GameEvent::BossSpawned { .. } | GameEvent::BossDefeated { .. } => {
                    log::debug!("t={} {:?}", state.time_ticks, event)
                }
                _ => log::trace!("t={} {:?}", state.time_ticks, event),
            }
        }

        state.check_rules()?;
        if state.is_game_over() || state.is_cleared() {
            break;
        }
    }

    log::info!(
        "Finished after {} frames ({:.1} s): {:?}, stage {}, score {}, kills {}, hearts {}, stars {}",
        state.time_ticks,
        state.time_ticks as f32 / TICK_RATE,
        state.phase,
        state.director.stage,
        state.ledger.score,
        state.ledger.kill_count,
        state.ledger.hearts,
        state.ledger.stars
    );

    if let Some(path) = &cli.dump {
        let json = state
            .snapshot()
            .to_json()
            .context("failed to serialize snapshot")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
        log::info!("Snapshot written to {}", path.display());
    }

    Ok(())
}
