//! Procedural floor generation split into carving, loops, doors and population.

pub mod invariants;
pub mod model;

mod carve;
mod doors;
mod error;
mod generator;
mod loops;
mod populate;
mod seed;

pub use doors::DoorPlacement;
pub use error::{GenerationError, Placeable};
pub use generator::MazeGenerator;
pub use invariants::{FloorDefect, validate_floor};
pub use model::GeneratedFloor;
pub use populate::is_dead_end;
pub use seed::runtime_seed;

use crate::config::DungeonConfig;

/// First floor of a run seeded with `seed`.
pub fn generate_floor(config: DungeonConfig, seed: u64) -> Result<GeneratedFloor, GenerationError> {
    MazeGenerator::new(config, seed)?.generate_map()
}
