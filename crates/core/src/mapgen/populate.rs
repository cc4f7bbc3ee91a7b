//! Key, enemy and fountain placement on a carved floor.

use rand_chacha::ChaCha8Rng;

use crate::grid::TileGrid;
use crate::types::{Direction, Pos, Tile};

use super::error::{GenerationError, Placeable};
use super::seed::random_below;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct Population {
    pub(super) key: Pos,
    pub(super) enemies: Vec<Pos>,
    pub(super) life_fountain: Pos,
    pub(super) mana_fountain: Pos,
}

pub(super) struct PopulateContext<'a> {
    pub(super) rng: &'a mut ChaCha8Rng,
    pub(super) start_door: Pos,
    /// Floor cell just inside the exit; enemies never stand on it.
    pub(super) exit_approach: Pos,
    pub(super) enemy_count: usize,
    pub(super) enemy_min_distance: u32,
    pub(super) attempts: usize,
}

pub(super) fn populate(
    grid: &mut TileGrid,
    context: &mut PopulateContext<'_>,
) -> Result<Population, GenerationError> {
    let key = place_key(grid, context)?;
    let enemies = place_enemies(grid, context)?;
    let (life_fountain, mana_fountain) = place_fountains(grid, context)?;
    Ok(Population { key, enemies, life_fountain, mana_fountain })
}

/// Floor with exactly one open cardinal neighbour.
pub fn is_dead_end(grid: &TileGrid, pos: Pos) -> bool {
    grid.tile_at(pos) == Tile::Floor
        && Direction::ALL
            .into_iter()
            .filter(|&direction| grid.tile_at(pos.step(direction)) != Tile::Wall)
            .count()
            == 1
}

pub(super) fn place_key(
    grid: &mut TileGrid,
    context: &mut PopulateContext<'_>,
) -> Result<Pos, GenerationError> {
    place_in_dead_end(grid, context, Placeable::Key, Tile::Key)
}

pub(super) fn place_enemies(
    grid: &mut TileGrid,
    context: &mut PopulateContext<'_>,
) -> Result<Vec<Pos>, GenerationError> {
    let mut enemies: Vec<Pos> = Vec::with_capacity(context.enemy_count);
    for _ in 0..context.enemy_count {
        let start_door = context.start_door;
        let exit_approach = context.exit_approach;
        let min_distance = context.enemy_min_distance;
        let pos = sample_interior(grid, context, Placeable::Enemy, |grid, pos| {
            grid.tile_at(pos) == Tile::Floor
                && pos != exit_approach
                && pos.chebyshev(start_door) > min_distance
                && enemies.iter().all(|&enemy| pos.chebyshev(enemy) > min_distance)
        })?;
        grid.set_tile(pos, Tile::Enemy);
        enemies.push(pos);
    }
    Ok(enemies)
}

pub(super) fn place_fountains(
    grid: &mut TileGrid,
    context: &mut PopulateContext<'_>,
) -> Result<(Pos, Pos), GenerationError> {
    let life = place_in_dead_end(grid, context, Placeable::LifeFountain, Tile::LifeFountain)?;
    let mana = place_in_dead_end(grid, context, Placeable::ManaFountain, Tile::ManaFountain)?;
    Ok((life, mana))
}

// Claimed cells are no longer `Floor`, so the dead-end test already skips them.
fn place_in_dead_end(
    grid: &mut TileGrid,
    context: &mut PopulateContext<'_>,
    entity: Placeable,
    tile: Tile,
) -> Result<Pos, GenerationError> {
    let pos = sample_interior(grid, context, entity, is_dead_end)?;
    grid.set_tile(pos, tile);
    Ok(pos)
}

fn sample_interior(
    grid: &TileGrid,
    context: &mut PopulateContext<'_>,
    entity: Placeable,
    accept: impl Fn(&TileGrid, Pos) -> bool,
) -> Result<Pos, GenerationError> {
    for _ in 0..context.attempts {
        let pos = Pos {
            x: 1 + random_below(context.rng, grid.width() - 2) as i32,
            y: 1 + random_below(context.rng, grid.height() - 2) as i32,
        };
        if accept(grid, pos) {
            return Ok(pos);
        }
    }
    Err(GenerationError::PlacementExhausted { entity, attempts: context.attempts })
}
