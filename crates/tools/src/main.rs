use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dungeon_core::mapgen::runtime_seed;
use dungeon_core::{DungeonConfig, FloorSession, MazeGenerator};
use env_logger::{Builder, Env};
use log::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run seed. A time-derived seed is used when omitted.
    #[arg(short, long)]
    seed: Option<u64>,
    /// TOML file overriding the default dungeon parameters
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of consecutive floors to generate
    #[arg(short, long, default_value_t = 1)]
    floors: u32,
    /// Also print the fog-of-war view from each floor's entry
    #[arg(short, long)]
    reveal: bool,
    /// Write a JSON snapshot of the last floor's starting session
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let stdout = io::stdout();
    run(&args, &mut stdout.lock())
}

fn run(args: &Args, out: &mut impl Write) -> Result<()> {
    let config = match &args.config {
        Some(path) => DungeonConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => DungeonConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(runtime_seed);
    info!("generating {} floor(s) with seed {seed}", args.floors);

    let mut generator =
        MazeGenerator::new(config, seed).context("Dungeon configuration rejected")?;
    let light_radius = generator.config().light_radius;
    let mut last_session: Option<FloorSession> = None;

    for _ in 0..args.floors {
        let floor = generator.generate_map().context("Floor generation failed")?;
        writeln!(
            out,
            "Floor {} (seed {seed}, fingerprint {:016x})",
            floor.floor_number,
            floor.fingerprint()
        )?;
        write!(out, "{}", floor.grid.to_ascii(Some(floor.player_start)))?;

        let session = FloorSession::new(floor, light_radius);
        if args.reveal {
            writeln!(out, "Revealed from entry:")?;
            write!(out, "{}", session.revealed().to_ascii(Some(session.player())))?;
        }
        writeln!(out)?;
        last_session = Some(session);
    }

    if let (Some(path), Some(session)) = (&args.snapshot, &last_session) {
        session
            .snapshot()
            .write_atomic(path)
            .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
        info!("snapshot written to {}", path.display());
    }

    Ok(())
}
