//! Structural checks every generated floor must pass.
//!
//! Used by the generator's own tests, the integration suite, and the fuzz binary.

use std::collections::{BTreeSet, VecDeque};

use thiserror::Error;

use crate::grid::TileGrid;
use crate::types::{Direction, Edge, Pos, Tile};

use super::error::Placeable;
use super::model::GeneratedFloor;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FloorDefect {
    #[error("ground truth contains a hidden tile at {pos:?}")]
    HiddenTile { pos: Pos },
    #[error("expected exactly one {tile:?}, found {count}")]
    DoorCount { tile: Tile, count: usize },
    #[error("{tile:?} recorded at {recorded:?} is not on the grid there")]
    DoorMismatch { tile: Tile, recorded: Pos },
    #[error("door at {pos:?} is not on the {edge:?} border")]
    DoorOffEdge { pos: Pos, edge: Edge },
    #[error("entry and exit share the {edge:?} edge")]
    DoorsShareEdge { edge: Edge },
    #[error("cell {pos:?} inside the exit is not floor")]
    BlockedExit { pos: Pos },
    #[error("{entity} recorded at {pos:?} is missing from the grid")]
    MisplacedEntity { entity: Placeable, pos: Pos },
    #[error("{entity} at {pos:?} is not in a dead end")]
    NotDeadEnd { entity: Placeable, pos: Pos },
    #[error("enemies at {first:?} and {second:?} are closer than the minimum distance")]
    EnemiesTooClose { first: Pos, second: Pos },
    #[error("enemy at {pos:?} is too close to the entry")]
    EnemyNearEntry { pos: Pos },
    #[error("exit cannot be reached from the entry")]
    Disconnected,
}

pub fn validate_floor(floor: &GeneratedFloor, min_distance: u32) -> Result<(), FloorDefect> {
    let grid = &floor.grid;

    if let Some(pos) = grid.positions_of(Tile::Hidden).next() {
        return Err(FloorDefect::HiddenTile { pos });
    }
    check_doors(grid, floor)?;

    let approach = floor.exit.inward();
    if grid.tile_at(approach) != Tile::Floor {
        return Err(FloorDefect::BlockedExit { pos: approach });
    }

    for (entity, pos, tile) in [
        (Placeable::Key, floor.key, Tile::Key),
        (Placeable::LifeFountain, floor.life_fountain, Tile::LifeFountain),
        (Placeable::ManaFountain, floor.mana_fountain, Tile::ManaFountain),
    ] {
        if grid.tile_at(pos) != tile {
            return Err(FloorDefect::MisplacedEntity { entity, pos });
        }
        if open_neighbors(grid, pos) != 1 {
            return Err(FloorDefect::NotDeadEnd { entity, pos });
        }
    }

    for (i, &enemy) in floor.enemies.iter().enumerate() {
        if grid.tile_at(enemy) != Tile::Enemy {
            return Err(FloorDefect::MisplacedEntity { entity: Placeable::Enemy, pos: enemy });
        }
        if enemy.chebyshev(floor.start.door) <= min_distance {
            return Err(FloorDefect::EnemyNearEntry { pos: enemy });
        }
        if let Some(&other) =
            floor.enemies[i + 1..].iter().find(|other| enemy.chebyshev(**other) <= min_distance)
        {
            return Err(FloorDefect::EnemiesTooClose { first: enemy, second: other });
        }
    }

    if !reachable_through_open_tiles(grid, floor.start.door, floor.exit.door) {
        return Err(FloorDefect::Disconnected);
    }
    Ok(())
}

fn check_doors(grid: &TileGrid, floor: &GeneratedFloor) -> Result<(), FloorDefect> {
    for (tile, door) in [(Tile::StartDoor, floor.start), (Tile::ExitDoor, floor.exit)] {
        let count = grid.count(tile);
        if count != 1 {
            return Err(FloorDefect::DoorCount { tile, count });
        }
        if grid.tile_at(door.door) != tile {
            return Err(FloorDefect::DoorMismatch { tile, recorded: door.door });
        }
        if !on_edge(grid, door.door, door.edge) {
            return Err(FloorDefect::DoorOffEdge { pos: door.door, edge: door.edge });
        }
    }
    if floor.start.edge == floor.exit.edge {
        return Err(FloorDefect::DoorsShareEdge { edge: floor.start.edge });
    }
    Ok(())
}

fn on_edge(grid: &TileGrid, pos: Pos, edge: Edge) -> bool {
    let right = grid.width() as i32 - 1;
    let bottom = grid.height() as i32 - 1;
    grid.in_bounds(pos)
        && match edge {
            Edge::Top => pos.y == 0,
            Edge::Bottom => pos.y == bottom,
            Edge::Left => pos.x == 0,
            Edge::Right => pos.x == right,
        }
}

fn open_neighbors(grid: &TileGrid, pos: Pos) -> usize {
    Direction::ALL
        .into_iter()
        .filter(|&direction| grid.tile_at(pos.step(direction)) != Tile::Wall)
        .count()
}

fn reachable_through_open_tiles(grid: &TileGrid, start: Pos, goal: Pos) -> bool {
    let mut open = VecDeque::from([start]);
    let mut seen = BTreeSet::from([start]);
    while let Some(pos) = open.pop_front() {
        if pos == goal {
            return true;
        }
        for direction in Direction::ALL {
            let next = pos.step(direction);
            if grid.tile_at(next) != Tile::Wall && seen.insert(next) {
                open.push_back(next);
            }
        }
    }
    false
}
