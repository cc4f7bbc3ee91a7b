//! Entry and exit door selection on the map border.

use log::warn;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::grid::TileGrid;
use crate::types::{Edge, Pos, Tile};

use super::error::GenerationError;
use super::seed::random_below;

/// A door cell on the border plus the edge it sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoorPlacement {
    pub edge: Edge,
    pub door: Pos,
}

impl DoorPlacement {
    /// The cell one step into the map from the door.
    pub fn inward(self) -> Pos {
        self.door.step(self.edge.inward())
    }
}

/// Random entry on `edge`, kept at least three cells away from the perpendicular borders.
pub(super) fn place_start(grid: &mut TileGrid, edge: Edge, rng: &mut ChaCha8Rng) -> DoorPlacement {
    let along = if edge.is_horizontal() { grid.width() } else { grid.height() };
    let offset = 3 + 2 * random_below(rng, (along - 5) / 2) as i32;
    let door = door_cell(grid, edge, offset);
    grid.set_tile(door, Tile::StartDoor);
    DoorPlacement { edge, door }
}

/// The previous floor's exit, mirrored onto the opposite border as this floor's entry.
pub(super) fn entry_from_exit(grid: &mut TileGrid, previous_exit: DoorPlacement) -> DoorPlacement {
    let edge = previous_exit.edge.opposite();
    let offset = if edge.is_horizontal() { previous_exit.door.x } else { previous_exit.door.y };
    let door = door_cell(grid, edge, offset);
    grid.set_tile(door, Tile::StartDoor);
    DoorPlacement { edge, door }
}

/// Samples edge and lattice offset pairs until the cell inward of the border is floor.
///
/// After `attempts` misses every candidate is scanned in a fixed order, so a carved map with any
/// valid exit cell always gets one.
pub(super) fn place_exit(
    grid: &mut TileGrid,
    start_edge: Edge,
    attempts: usize,
    rng: &mut ChaCha8Rng,
) -> Result<DoorPlacement, GenerationError> {
    let candidate_edges: Vec<Edge> =
        Edge::ALL.into_iter().filter(|&edge| edge != start_edge).collect();

    for _ in 0..attempts {
        let edge = candidate_edges[random_below(rng, candidate_edges.len())];
        let slots = lattice_slots(grid, edge);
        let offset = 1 + 2 * random_below(rng, slots) as i32;
        let exit = DoorPlacement { edge, door: door_cell(grid, edge, offset) };
        if is_valid_exit(grid, exit) {
            grid.set_tile(exit.door, Tile::ExitDoor);
            return Ok(exit);
        }
    }

    warn!("exit sampling exhausted {attempts} attempts, scanning border for a fallback");
    for edge in candidate_edges {
        for slot in 0..lattice_slots(grid, edge) {
            let exit = DoorPlacement { edge, door: door_cell(grid, edge, 1 + 2 * slot as i32) };
            if is_valid_exit(grid, exit) {
                grid.set_tile(exit.door, Tile::ExitDoor);
                return Ok(exit);
            }
        }
    }

    Err(GenerationError::ExitUnplaceable { start_edge })
}

fn is_valid_exit(grid: &TileGrid, exit: DoorPlacement) -> bool {
    grid.tile_at(exit.door) == Tile::Wall && grid.tile_at(exit.inward()) == Tile::Floor
}

/// Odd offsets along an edge, excluding the corners.
fn lattice_slots(grid: &TileGrid, edge: Edge) -> usize {
    let along = if edge.is_horizontal() { grid.width() } else { grid.height() };
    (along - 1) / 2
}

fn door_cell(grid: &TileGrid, edge: Edge, offset: i32) -> Pos {
    let right = grid.width() as i32 - 1;
    let bottom = grid.height() as i32 - 1;
    match edge {
        Edge::Top => Pos { y: 0, x: offset },
        Edge::Bottom => Pos { y: bottom, x: offset },
        Edge::Left => Pos { y: offset, x: 0 },
        Edge::Right => Pos { y: offset, x: right },
    }
}
