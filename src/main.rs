//! Gravwalk - headless driver
//!
//! Runs a character through one of the built-in levels from a scripted
//! input sequence and logs what it does.
//!
//! ```text
//! gravwalk --level planet --script "forward*200,forward+jump,forward*50"
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use gravwalk_game::{EventKind, Level, PlayerInput, Simulation, SimulationConfig};

#[derive(Parser)]
#[command(name = "gravwalk")]
#[command(about = "Drive a character through a level with scripted input", long_about = None)]
struct Cli {
    /// Level to load (flat, planet, cube, pool, platform)
    #[arg(long, default_value = "flat")]
    level: String,

    /// Input script: comma-separated `keys[*ticks]` segments, keys joined by `+`
    #[arg(long, default_value = "idle*50,forward*100,forward+jump,forward*100")]
    script: String,

    /// Total ticks to run; the script is padded with idle input
    #[arg(long)]
    ticks: Option<usize>,

    /// TOML simulation config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log the character state every N ticks (defaults to once per second)
    #[arg(long)]
    report_every: Option<u64>,
}

/// One script segment: an input held for a number of ticks.
#[derive(Debug, Clone, PartialEq)]
struct Segment {
    input: PlayerInput,
    ticks: usize,
}

fn parse_script(script: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    for part in script.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (keys, ticks) = match part.split_once('*') {
            Some((keys, count)) => {
                let ticks = count
                    .trim()
                    .parse::<usize>()
                    .with_context(|| format!("bad tick count in `{part}`"))?;
                (keys, ticks)
            }
            None => (part, 1),
        };
        let input = keys.parse::<PlayerInput>()?;
        segments.push(Segment { input, ticks });
    }
    if segments.is_empty() {
        bail!("input script is empty");
    }
    Ok(segments)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let level = Level::by_name(&cli.level)?;
    let segments = parse_script(&cli.script)?;

    let mut simulation = Simulation::new(config, level);
    let report_every = cli
        .report_every
        .unwrap_or(simulation.config.tick_rate as u64)
        .max(1);

    let scripted: usize = segments.iter().map(|s| s.ticks).sum();
    let total = cli.ticks.unwrap_or(scripted);
    let idle = PlayerInput::default();
    let inputs = segments
        .iter()
        .flat_map(|s| std::iter::repeat(&s.input).take(s.ticks))
        .chain(std::iter::repeat(&idle))
        .take(total);

    for input in inputs {
        simulation.tick(input);

        for event in simulation.drain_events() {
            match event.kind {
                EventKind::ModeChanged { from, to } => {
                    log::info!("[{:>5}] {} -> {}", event.frame, from, to)
                }
                EventKind::Jumped => log::info!("[{:>5}] jump", event.frame),
                EventKind::Zone { name, event: zone } => {
                    log::info!("[{:>5}] zone `{}` {:?}", event.frame, name, zone)
                }
            }
        }

        if simulation.frame % report_every == 0 {
            let character = &simulation.character;
            let position = character.position();
            let velocity = character.velocity();
            log::info!(
                "[{:>5}] {:<15} pos ({:7.2}, {:7.2}, {:7.2}) speed {:5.2} up {:?}",
                simulation.frame,
                character.mode().to_string(),
                position.x,
                position.y,
                position.z,
                velocity.length(),
                character.controller.up_axis(),
            );
        }
    }

    let position = simulation.character.position();
    log::info!(
        "finished {} ticks in `{}`: {} at ({:.2}, {:.2}, {:.2})",
        simulation.frame,
        simulation.level.name,
        simulation.character.mode(),
        position.x,
        position.y,
        position.z
    );
    Ok(())
}
