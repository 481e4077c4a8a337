//! cultivation_sim - Headless auto-battle runner for balancing and smoke tests

mod simulation;

use clap::Parser;
use cultivation_core::character::Attributes;
use cultivation_core::{create_character, ActionError, ConfigError, ContentTables};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use simulation::{run, SimConfig};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "cultivation_sim",
    author,
    version,
    about = "Runs a character through seeded auto-battles and prints where it ended up"
)]
struct Args {
    /// Seed for the random source
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Number of clock ticks to run
    #[arg(short, long, default_value_t = 10_000)]
    ticks: u64,

    /// Milliseconds per tick
    #[arg(long, default_value_t = 400)]
    tick_ms: u64,

    /// Map to fight on
    #[arg(short, long, default_value_t = 0)]
    map: u32,

    /// Character name
    #[arg(short, long, default_value = "Wanderer")]
    name: String,

    /// Directory holding items.toml, skills.toml, maps.toml and monsters.toml;
    /// constants.toml and elements.toml are optional
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Conclude and tend the character after every encounter
    #[arg(long)]
    no_loop: bool,
}

#[derive(Debug, Error)]
enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("failed to write report: {0}")]
    Report(#[from] serde_json::Error),
}

/// `RUST_LOG` directives when given and valid, `info` otherwise
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<(), SimError> {
    let filter = log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let tables = match &args.config {
        Some(dir) => ContentTables::load_from_dir(dir)?,
        None => ContentTables::builtin(),
    };

    let character = create_character(&args.name, Attributes::uniform(4), &tables.constants)?;
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let config = SimConfig {
        ticks: args.ticks,
        tick_ms: args.tick_ms,
        map_id: args.map,
        auto_loop: !args.no_loop,
    };
    info!(seed = args.seed, ticks = args.ticks, map = args.map, "starting run");

    let report = run(character, &tables, &config, &mut rng)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
