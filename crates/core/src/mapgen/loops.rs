//! Knocks out single walls between parallel corridors so the perfect maze gains cycles.

use rand_chacha::ChaCha8Rng;

use crate::grid::TileGrid;
use crate::types::{Direction, Pos, Tile};

use super::seed::random_below;

const ATTEMPTS_PER_LOOP: usize = 10;

/// Tries up to `10 * target` random interior walls and returns how many loops were opened.
pub(super) fn add_loops(grid: &mut TileGrid, target: usize, rng: &mut ChaCha8Rng) -> usize {
    let mut added = 0;
    let mut attempts_left = target * ATTEMPTS_PER_LOOP;

    while added < target && attempts_left > 0 {
        attempts_left -= 1;
        let pos = Pos {
            x: 1 + random_below(rng, grid.width() - 2) as i32,
            y: 1 + random_below(rng, grid.height() - 2) as i32,
        };
        if grid.tile_at(pos) == Tile::Wall && separates_opposite_floors(grid, pos) {
            grid.set_tile(pos, Tile::Floor);
            added += 1;
        }
    }

    added
}

/// Exactly two floor neighbours, and they face each other across `pos`.
fn separates_opposite_floors(grid: &TileGrid, pos: Pos) -> bool {
    let is_floor = |direction: Direction| grid.tile_at(pos.step(direction)) == Tile::Floor;
    let floor_count = Direction::ALL.into_iter().filter(|&direction| is_floor(direction)).count();
    floor_count == 2
        && ((is_floor(Direction::Up) && is_floor(Direction::Down))
            || (is_floor(Direction::Left) && is_floor(Direction::Right)))
}
