//! Row-major tile storage shared by the ground-truth map and the fog-of-war view.

use crate::types::{Pos, Tile};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn filled(width: usize, height: usize, tile: Tile) -> Self {
        Self { width, height, tiles: vec![tile; width * height] }
    }

    /// A fresh ground-truth grid: solid rock everywhere.
    pub fn walls(width: usize, height: usize) -> Self {
        Self::filled(width, height, Tile::Wall)
    }

    /// A fresh revealed grid: nothing known yet.
    pub fn hidden(width: usize, height: usize) -> Self {
        Self::filled(width, height, Tile::Hidden)
    }

    pub(crate) fn from_tiles(width: usize, height: usize, tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(tiles.len(), width * height);
        Self { width, height, tiles }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn same_shape(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Cells outside the grid read as `Wall`.
    pub fn tile_at(&self, pos: Pos) -> Tile {
        if !self.in_bounds(pos) {
            return Tile::Wall;
        }
        self.tiles[self.index(pos)]
    }

    pub fn set_tile(&mut self, pos: Pos, tile: Tile) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.tiles[idx] = tile;
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, Tile)> + '_ {
        self.tiles.iter().enumerate().map(|(idx, &tile)| (self.pos_of(idx), tile))
    }

    /// Every position holding `kind`, in row-major order.
    pub fn positions_of(&self, kind: Tile) -> impl Iterator<Item = Pos> + '_ {
        self.iter().filter(move |&(_, tile)| tile == kind).map(|(pos, _)| pos)
    }

    pub fn count(&self, kind: Tile) -> usize {
        self.tiles.iter().filter(|&&tile| tile == kind).count()
    }

    pub fn is_border(&self, pos: Pos) -> bool {
        self.in_bounds(pos)
            && (pos.x == 0
                || pos.y == 0
                || pos.x as usize == self.width - 1
                || pos.y as usize == self.height - 1)
    }

    /// Renders the grid one row per line, drawing `@` at `player` when given.
    pub fn to_ascii(&self, player: Option<Pos>) -> String {
        let mut text = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Pos { y: y as i32, x: x as i32 };
                if Some(pos) == player {
                    text.push('@');
                } else {
                    text.push(self.tile_at(pos).glyph());
                }
            }
            text.push('\n');
        }
        text
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }

    fn pos_of(&self, idx: usize) -> Pos {
        Pos { y: (idx / self.width) as i32, x: (idx % self.width) as i32 }
    }
}
