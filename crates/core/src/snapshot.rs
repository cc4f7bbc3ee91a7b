//! JSON snapshots of an in-progress floor, stored as flat tile-code arrays.
//!
//! Both grids are written row-major using the stable codes from [`Tile::code`], so external
//! storage never needs to know about the Rust enum. Files are replaced atomically: the JSON is
//! written to a `.json.tmp` sibling first and then renamed over the target.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::TileGrid;
use crate::mapgen::DoorPlacement;
use crate::types::{Pos, Tile};

pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FloorSnapshot {
    pub format_version: u32,
    pub width: usize,
    pub height: usize,
    pub map: Vec<i32>,
    pub revealed_map: Vec<i32>,
    pub player: Pos,
    pub has_key: bool,
    pub start: DoorPlacement,
    pub exit: DoorPlacement,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("snapshot JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported snapshot format version {found} (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("{width}x{height} grid needs {expected} tile codes, got {actual}")]
    ShapeMismatch { width: usize, height: usize, expected: usize, actual: usize },
    #[error("unknown tile code {code} at index {index}")]
    UnknownTileCode { index: usize, code: i32 },
    #[error("ground-truth map holds a hidden tile at index {index}")]
    HiddenInGroundTruth { index: usize },
    #[error("player position {player:?} lies outside the map")]
    PlayerOutOfBounds { player: Pos },
    #[error("{expected:?} expected at {door:?}, map holds {found:?}")]
    DoorMismatch { door: Pos, expected: Tile, found: Tile },
}

pub fn grid_to_codes(grid: &TileGrid) -> Vec<i32> {
    grid.tiles().iter().map(|tile| tile.code()).collect()
}

pub fn grid_from_codes(
    width: usize,
    height: usize,
    codes: &[i32],
) -> Result<TileGrid, SnapshotError> {
    let actual = codes.len();
    let Some(expected) = width.checked_mul(height) else {
        return Err(SnapshotError::ShapeMismatch { width, height, expected: usize::MAX, actual });
    };
    if actual != expected {
        return Err(SnapshotError::ShapeMismatch { width, height, expected, actual });
    }
    let tiles = codes
        .iter()
        .enumerate()
        .map(|(index, &code)| {
            Tile::from_code(code).ok_or(SnapshotError::UnknownTileCode { index, code })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TileGrid::from_tiles(width, height, tiles))
}

impl FloorSnapshot {
    pub fn ground_truth(&self) -> Result<TileGrid, SnapshotError> {
        let grid = grid_from_codes(self.width, self.height, &self.map)?;
        if let Some(index) = grid.tiles().iter().position(|&tile| tile == Tile::Hidden) {
            return Err(SnapshotError::HiddenInGroundTruth { index });
        }
        Ok(grid)
    }

    pub fn revealed(&self) -> Result<TileGrid, SnapshotError> {
        grid_from_codes(self.width, self.height, &self.revealed_map)
    }

    /// Checks everything a session needs before it can resume from this snapshot.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.format_version,
                supported: SNAPSHOT_FORMAT_VERSION,
            });
        }
        let ground_truth = self.ground_truth()?;
        self.revealed()?;
        if !ground_truth.in_bounds(self.player) {
            return Err(SnapshotError::PlayerOutOfBounds { player: self.player });
        }
        let doors = [(self.start.door, Tile::StartDoor), (self.exit.door, Tile::ExitDoor)];
        for (door, expected) in doors {
            let found = ground_truth.tile_at(door);
            if found != expected {
                return Err(SnapshotError::DoorMismatch { door, expected, found });
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn write_atomic(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, self.to_json()?)?;
        fs::rename(&tmp_path, path)?;

        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
