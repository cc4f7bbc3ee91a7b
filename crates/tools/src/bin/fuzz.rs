use std::ops::Range;

use anyhow::{Context, Result, bail};
use clap::Parser;
use dungeon_core::{
    Direction, DungeonConfig, FloorSession, MazeGenerator, Pos, StepOutcome, Tile, TileGrid,
    validate_floor,
};
use env_logger::{Builder, Env};
use log::info;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of consecutive seeds to try
    #[arg(short, long, default_value_t = 200)]
    runs: u64,
    #[arg(short, long, default_value_t = 5)]
    floors: u32,
    /// Random steps taken on each floor before moving on
    #[arg(short, long, default_value_t = 300)]
    walk: u32,
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = DungeonConfig::default();
    let seeds = seed_range(args.seed, args.runs)?;

    println!(
        "Starting fuzz harness on seeds {}..{} ({} floors each)...",
        seeds.start, seeds.end, args.floors
    );

    for seed in seeds {
        let mut generator = MazeGenerator::new(config.clone(), seed)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        for _ in 0..args.floors {
            let floor = generator.generate_map()?;
            if let Err(defect) = validate_floor(&floor, config.enemy_min_distance) {
                bail!("Invariant failed on seed {seed}, floor {}: {defect}", floor.floor_number);
            }

            let mut session = FloorSession::new(floor, config.light_radius);
            for _ in 0..args.walk {
                let direction = Direction::ALL[(rng.next_u64() % 4) as usize];
                if session.step(direction) == StepOutcome::ExitReached {
                    break;
                }
                let tile = session.ground_truth().tile_at(session.player());
                if tile == Tile::Wall || tile == Tile::StartDoor {
                    bail!("Invariant failed on seed {seed}: player inside {tile:?}");
                }
                if let Some(pos) = stale_tile(session.ground_truth(), session.revealed()) {
                    bail!("Invariant failed on seed {seed}: revealed {pos:?} is stale");
                }
            }
        }
        info!("seed {seed}: {} floors ok", generator.floors_generated());
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}

fn stale_tile(ground_truth: &TileGrid, revealed: &TileGrid) -> Option<Pos> {
    revealed
        .iter()
        .find(|&(pos, tile)| tile != Tile::Hidden && tile != ground_truth.tile_at(pos))
        .map(|(pos, _)| pos)
}

fn seed_range(first: u64, runs: u64) -> Result<Range<u64>> {
    let end = first
        .checked_add(runs)
        .with_context(|| format!("{runs} runs starting at seed {first} overflow u64"))?;
    Ok(first..end)
}
