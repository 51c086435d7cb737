//! Fox Platformer - headless runner
//!
//! Runs the simulation with a scripted autopilot and logs what happens. Set
//! `RUST_LOG=info` (or `debug`) to see the event stream.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use fox_platformer::GameConfig;
use fox_platformer::Session;
use fox_platformer::consts::*;
use fox_platformer::sim::{GameEvent, GamePhase, TickInput, WorldState};

#[derive(Parser, Debug)]
#[command(name = "fox-platformer")]
#[command(about = "Headless fox platformer run with a scripted autopilot")]
struct Cli {
    /// RNG seed for the run
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    /// Simulated seconds before giving up
    #[arg(long, default_value_t = 120)]
    seconds: u32,
    /// JSON level/weapon config (built-in tables when omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the active config as JSON and exit
    #[arg(long, default_value_t = false)]
    dump_config: bool,
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config = GameConfig::from_json_str(&json)
        .with_context(|| format!("loading {}", path.display()))?;
    log::info!("Loaded {} levels from {}", config.max_level(), path.display());
    Ok(config)
}

/// Run right, hop every so often, shoot whenever armed
fn autopilot(world: &WorldState) -> TickInput {
    let t = world.time_ticks;
    TickInput {
        left: false,
        right: true,
        up: t % 45 < 12,
        attack: world.player.weapon.is_some(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();
    let config = load_config(args.config.as_deref())?;

    if args.dump_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    log::info!("Fox Platformer (headless) starting with seed {}", args.seed);
    let mut session = Session::new(config, args.seed)?;

    let frames = args.seconds * TICKS_PER_SECOND;
    for _ in 0..frames {
        let input = autopilot(&session.world);
        for event in session.update(SIM_DT, &input) {
            match event {
                GameEvent::LevelComplete { level, next_level } => {
                    log::info!("Level {} complete, on to {}", level, next_level)
                }
                GameEvent::PlayerDied { level, deaths } => {
                    log::info!("Died on level {} ({} total)", level, deaths)
                }
                GameEvent::PlayerShrunk => log::info!("Shrunk"),
                GameEvent::Victory {
                    score,
                    play_time_secs,
                    deaths,
                } => log::info!(
                    "Victory: {} points, {:.1}s, {} deaths",
                    score,
                    play_time_secs,
                    deaths
                ),
            }
        }
        if session.world.phase == GamePhase::Victory {
            break;
        }
    }

    let world = &session.world;
    println!(
        "level {} | score {} | coins {} | deaths {} | {:.1}s",
        world.level,
        world.score,
        world.coin_count,
        world.death_count,
        world.play_time_secs()
    );
    Ok(())
}
