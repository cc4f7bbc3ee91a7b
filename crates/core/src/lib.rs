pub mod config;
pub mod grid;
pub mod mapgen;
pub mod session;
pub mod snapshot;
pub mod types;
pub mod visibility;

pub use config::{ConfigError, ConfigLoadError, DungeonConfig};
pub use grid::TileGrid;
pub use mapgen::{
    DoorPlacement, FloorDefect, GeneratedFloor, GenerationError, MazeGenerator, generate_floor,
    validate_floor,
};
pub use session::{FloorSession, Fountain, StepOutcome};
pub use snapshot::{FloorSnapshot, SnapshotError};
pub use types::*;
pub use visibility::reveal;
