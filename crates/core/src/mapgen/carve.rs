//! Randomized depth-first carving over the odd-coordinate lattice.

use rand_chacha::ChaCha8Rng;

use crate::grid::TileGrid;
use crate::types::{Direction, Pos, Tile};

use super::seed::shuffle;

/// Scratch marks for one carving pass.
pub(super) struct VisitedGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl VisitedGrid {
    pub(super) fn new(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![false; width * height] }
    }

    fn is_open(&self, pos: Pos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height
            && !self.cells[(pos.y as usize) * self.width + (pos.x as usize)]
    }

    fn mark(&mut self, pos: Pos) {
        self.cells[(pos.y as usize) * self.width + (pos.x as usize)] = true;
    }
}

struct Frame {
    pos: Pos,
    order: [Direction; 4],
    next: usize,
}

/// Moves even coordinates onto the lattice, staying inside the grid.
pub(super) fn snap_to_lattice(pos: Pos, width: usize, height: usize) -> Pos {
    Pos { y: snap_axis(pos.y, height), x: snap_axis(pos.x, width) }
}

fn snap_axis(value: i32, len: usize) -> i32 {
    let last = len as i32 - 2;
    let clamped = value.clamp(1, last);
    if clamped % 2 == 1 {
        clamped
    } else if clamped < last {
        clamped + 1
    } else {
        clamped - 1
    }
}

/// Carves a perfect maze reachable from `origin`, returning the number of lattice cells visited.
///
/// Walks the same order a recursive backtracker would: each cell shuffles its four directions on
/// entry and the stack resumes the parent where it left off.
pub(super) fn carve_maze(grid: &mut TileGrid, origin: Pos, rng: &mut ChaCha8Rng) -> usize {
    let origin = snap_to_lattice(origin, grid.width(), grid.height());
    let mut visited = VisitedGrid::new(grid.width(), grid.height());
    let mut stack = Vec::with_capacity((grid.width() * grid.height()) / 4 + 1);

    stack.push(enter_cell(grid, &mut visited, origin, rng));
    let mut carved = 1;

    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.order.len() {
            stack.pop();
            continue;
        }
        let direction = frame.order[frame.next];
        frame.next += 1;

        let offset = direction.offset();
        let neighbor = frame.pos.offset(offset.scaled(2));
        if !visited.is_open(neighbor) {
            continue;
        }
        grid.set_tile(frame.pos.offset(offset), Tile::Floor);
        stack.push(enter_cell(grid, &mut visited, neighbor, rng));
        carved += 1;
    }

    carved
}

fn enter_cell(
    grid: &mut TileGrid,
    visited: &mut VisitedGrid,
    pos: Pos,
    rng: &mut ChaCha8Rng,
) -> Frame {
    visited.mark(pos);
    grid.set_tile(pos, Tile::Floor);
    let mut order = Direction::ALL;
    shuffle(rng, &mut order);
    Frame { pos, order, next: 0 }
}
