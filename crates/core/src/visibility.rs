//! Fog-of-war reveal around the player.
//!
//! Four cardinal sweeps each cover one quadrant of a diamond of the given radius. A sweep walks
//! rows parallel to its direction, starting on the player's axis and shifting one tile sideways
//! per row. Walls stop a row, and two probes next to each target keep light from slipping
//! diagonally past wall corners. Tiles are only ever copied from the ground truth into the
//! revealed grid, never hidden again.

use log::warn;

use crate::grid::TileGrid;
use crate::types::{Direction, Offset, OcclusionProbes, Pos, Tile};

/// Reveals everything the player can see from `player` and returns how many tiles were newly
/// uncovered.
///
/// A non-positive `radius` does nothing. Mismatched grids or a player outside the map are logged
/// and ignored.
pub fn reveal(ground_truth: &TileGrid, revealed: &mut TileGrid, player: Pos, radius: i32) -> usize {
    if radius <= 0 {
        return 0;
    }
    if !ground_truth.same_shape(revealed) {
        warn!(
            "reveal skipped: ground truth is {}x{} but revealed grid is {}x{}",
            ground_truth.width(),
            ground_truth.height(),
            revealed.width(),
            revealed.height()
        );
        return 0;
    }
    if !ground_truth.in_bounds(player) {
        warn!("reveal skipped: player {player:?} is outside the map");
        return 0;
    }

    Direction::ALL
        .into_iter()
        .map(|direction| {
            let mut sweep = Sweep { ground_truth, revealed: &mut *revealed, direction, radius };
            sweep.run(player)
        })
        .sum()
}

struct Sweep<'a> {
    ground_truth: &'a TileGrid,
    revealed: &'a mut TileGrid,
    direction: Direction,
    radius: i32,
}

impl Sweep<'_> {
    fn run(&mut self, player: Pos) -> usize {
        let step = self.direction.offset();
        let sideways = Offset { dy: -step.dx, dx: step.dy };
        let probes = self.direction.occlusion_probes();
        // Where row 0 stopped on a wall, measured along the sweep axis.
        let mut axis_wall: Option<i32> = None;
        let mut uncovered = 0;

        for row in 0..=self.radius {
            let origin = player.offset(sideways.scaled(row));
            if !self.ground_truth.in_bounds(origin) {
                break;
            }
            uncovered += self.walk_row(origin, row, step, probes, &mut axis_wall);
        }
        uncovered
    }

    fn walk_row(
        &mut self,
        origin: Pos,
        row: i32,
        step: Offset,
        probes: OcclusionProbes,
        axis_wall: &mut Option<i32>,
    ) -> usize {
        let mut uncovered = 0;
        for k in 1..=self.radius - row {
            let target = origin.offset(step.scaled(k));
            if !self.ground_truth.in_bounds(target) {
                break;
            }
            let depth = if self.direction.is_vertical() { target.y } else { target.x };

            match self.revealed.tile_at(target) {
                Tile::Hidden => {
                    if row > 1 && self.occluded(target, probes) {
                        break;
                    }
                    let tile = self.ground_truth.tile_at(target);
                    self.revealed.set_tile(target, tile);
                    uncovered += 1;
                    if tile == Tile::Wall && wall_stops_row(row, depth, axis_wall) {
                        break;
                    }
                }
                Tile::Wall => {
                    if wall_stops_row(row, depth, axis_wall) {
                        break;
                    }
                }
                _ => {}
            }
        }
        uncovered
    }

    fn occluded(&self, target: Pos, probes: OcclusionProbes) -> bool {
        self.ground_truth.tile_at(target.offset(probes.diagonal)) == Tile::Wall
            && self.ground_truth.tile_at(target.offset(probes.reverse)) == Tile::Wall
    }
}

/// Row 0 always stops at its first wall and records how deep it was. Later rows only stop at a
/// wall lying at that same depth.
fn wall_stops_row(row: i32, depth: i32, axis_wall: &mut Option<i32>) -> bool {
    if row == 0 {
        *axis_wall = Some(depth);
        return true;
    }
    *axis_wall == Some(depth)
}

#[cfg(test)]
mod tests {
    use proptest::collection::vec;
    use proptest::prelude::*;

    use super::*;
    use crate::config::DungeonConfig;
    use crate::mapgen::MazeGenerator;

    fn open_room() -> TileGrid {
        TileGrid::filled(10, 10, Tile::Floor)
    }

    fn with_walls(mut grid: TileGrid, walls: impl IntoIterator<Item = Pos>) -> TileGrid {
        for pos in walls {
            grid.set_tile(pos, Tile::Wall);
        }
        grid
    }

    fn revealed_positions(revealed: &TileGrid) -> Vec<Pos> {
        revealed.iter().filter(|&(_, tile)| tile != Tile::Hidden).map(|(pos, _)| pos).collect()
    }

    const PLAYER: Pos = Pos { y: 5, x: 5 };

    #[test]
    fn open_room_reveals_a_diamond_around_the_player() {
        let ground_truth = open_room();
        let mut revealed = TileGrid::hidden(10, 10);
        let uncovered = reveal(&ground_truth, &mut revealed, PLAYER, 3);

        for (pos, tile) in revealed.iter() {
            let distance = pos.manhattan(PLAYER);
            if pos == PLAYER || distance > 3 {
                assert_eq!(tile, Tile::Hidden, "{pos:?} should stay hidden");
            } else {
                assert_eq!(tile, Tile::Floor, "{pos:?} should be lit");
            }
        }
        // 25 tiles in a radius-3 diamond, minus the player's own.
        assert_eq!(uncovered, 24);
        assert_eq!(revealed.tile_at(Pos { y: 5, x: 2 }), Tile::Floor);
        assert_eq!(revealed.tile_at(Pos { y: 4, x: 2 }), Tile::Hidden);
        assert_eq!(revealed.tile_at(Pos { y: 6, x: 2 }), Tile::Hidden);
    }

    fn ring() -> Vec<Pos> {
        let mut walls = Vec::new();
        for y in 4..=6 {
            for x in 4..=6 {
                if (y, x) != (5, 5) {
                    walls.push(Pos { y, x });
                }
            }
        }
        walls
    }

    #[test]
    fn enclosed_player_sees_only_the_ring() {
        let ground_truth = with_walls(open_room(), ring());
        let mut revealed = TileGrid::hidden(10, 10);

        assert_eq!(reveal(&ground_truth, &mut revealed, PLAYER, 3), 8);
        let mut expected = ring();
        expected.sort();
        assert_eq!(revealed_positions(&revealed), expected);

        let before = revealed.clone();
        assert_eq!(reveal(&ground_truth, &mut revealed, PLAYER, 3), 0);
        assert_eq!(revealed, before);
    }

    #[test]
    fn corner_shadow_only_stops_its_own_row() {
        let ground_truth = with_walls(open_room(), [Pos { y: 5, x: 4 }, Pos { y: 4, x: 4 }]);
        let mut revealed = TileGrid::hidden(10, 10);

        assert_eq!(reveal(&ground_truth, &mut revealed, PLAYER, 4), 35);
        // Row two of the upward sweep is shadowed by the wall corner. Row three is not.
        assert_eq!(revealed.tile_at(Pos { y: 3, x: 3 }), Tile::Hidden);
        assert_eq!(revealed.tile_at(Pos { y: 4, x: 3 }), Tile::Hidden);
        assert_eq!(revealed.tile_at(Pos { y: 4, x: 2 }), Tile::Floor);
        assert_eq!(revealed.tile_at(Pos { y: 5, x: 3 }), Tile::Hidden);

        let before = revealed.clone();
        assert_eq!(reveal(&ground_truth, &mut revealed, PLAYER, 4), 0);
        assert_eq!(revealed, before);
    }

    fn horizontal_corridor() -> TileGrid {
        let walls = (0..10).flat_map(|x| [Pos { y: 4, x }, Pos { y: 6, x }]);
        with_walls(open_room(), walls)
    }

    #[test]
    fn corridor_reveals_its_floor_and_bounding_walls_only() {
        let ground_truth = horizontal_corridor();
        let mut revealed = TileGrid::hidden(10, 10);
        reveal(&ground_truth, &mut revealed, PLAYER, 3);

        for x in 2..=8 {
            let expected = if x == 5 { Tile::Hidden } else { Tile::Floor };
            assert_eq!(revealed.tile_at(Pos { y: 5, x }), expected, "corridor x={x}");
        }
        for x in 3..=7 {
            assert_eq!(revealed.tile_at(Pos { y: 4, x }), Tile::Wall);
            assert_eq!(revealed.tile_at(Pos { y: 6, x }), Tile::Wall);
        }
        for x in 0..10 {
            assert_eq!(revealed.tile_at(Pos { y: 3, x }), Tile::Hidden, "beyond wall x={x}");
            assert_eq!(revealed.tile_at(Pos { y: 7, x }), Tile::Hidden, "beyond wall x={x}");
        }
    }

    #[test]
    fn vertical_corridor_mirrors_the_horizontal_one() {
        let walls = (0..10).flat_map(|y| [Pos { y, x: 4 }, Pos { y, x: 6 }]);
        let ground_truth = with_walls(open_room(), walls);
        let mut revealed = TileGrid::hidden(10, 10);
        reveal(&ground_truth, &mut revealed, PLAYER, 3);

        for y in 2..=8 {
            let expected = if y == 5 { Tile::Hidden } else { Tile::Floor };
            assert_eq!(revealed.tile_at(Pos { y, x: 5 }), expected, "corridor y={y}");
        }
        for y in 3..=7 {
            assert_eq!(revealed.tile_at(Pos { y, x: 4 }), Tile::Wall);
            assert_eq!(revealed.tile_at(Pos { y, x: 6 }), Tile::Wall);
        }
        for y in 0..10 {
            assert_eq!(revealed.tile_at(Pos { y, x: 3 }), Tile::Hidden);
            assert_eq!(revealed.tile_at(Pos { y, x: 7 }), Tile::Hidden);
        }
    }

    #[test]
    fn long_corridor_light_stays_between_the_walls() {
        let ground_truth = horizontal_corridor();
        let mut revealed = TileGrid::hidden(10, 10);
        reveal(&ground_truth, &mut revealed, PLAYER, 5);

        for x in 0..10 {
            let expected = if x == 5 { Tile::Hidden } else { Tile::Floor };
            assert_eq!(revealed.tile_at(Pos { y: 5, x }), expected);
            assert_eq!(revealed.tile_at(Pos { y: 3, x }), Tile::Hidden);
            assert_eq!(revealed.tile_at(Pos { y: 7, x }), Tile::Hidden);
        }
        for x in 1..=9 {
            assert_eq!(revealed.tile_at(Pos { y: 4, x }), Tile::Wall);
            assert_eq!(revealed.tile_at(Pos { y: 6, x }), Tile::Wall);
        }
        assert_eq!(revealed.tile_at(Pos { y: 4, x: 0 }), Tile::Hidden);
        assert_eq!(revealed.tile_at(Pos { y: 6, x: 0 }), Tile::Hidden);
    }

    #[test]
    fn degenerate_inputs_are_no_ops() {
        let ground_truth = open_room();
        let mut revealed = TileGrid::hidden(10, 10);
        assert_eq!(reveal(&ground_truth, &mut revealed, PLAYER, 0), 0);
        assert_eq!(reveal(&ground_truth, &mut revealed, PLAYER, -2), 0);
        assert_eq!(reveal(&ground_truth, &mut revealed, Pos { y: 10, x: 3 }, 3), 0);
        assert_eq!(revealed.count(Tile::Hidden), 100);

        let mut wrong_shape = TileGrid::hidden(9, 10);
        assert_eq!(reveal(&ground_truth, &mut wrong_shape, PLAYER, 3), 0);
        assert_eq!(wrong_shape.count(Tile::Hidden), 90);
    }

    #[test]
    fn player_in_a_corner_clips_at_the_border() {
        let ground_truth = open_room();
        let mut revealed = TileGrid::hidden(10, 10);
        let corner = Pos { y: 0, x: 0 };
        reveal(&ground_truth, &mut revealed, corner, 2);
        for pos in revealed_positions(&revealed) {
            assert!(pos.manhattan(corner) <= 2);
        }
        assert_eq!(revealed.tile_at(Pos { y: 0, x: 2 }), Tile::Floor);
        assert_eq!(revealed.tile_at(Pos { y: 2, x: 0 }), Tile::Floor);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]
        #[test]
        fn reveal_is_bounded_and_idempotent_on_generated_floors(
            seed in any::<u64>(),
            radius in 1_i32..=8,
            walk in vec(0_usize..4, 0..24),
        ) {
            let config =
                DungeonConfig { width: 21, height: 11, enemy_count: 2, ..Default::default() };
            let floor = MazeGenerator::new(config, seed).unwrap().generate_map().unwrap();
            let ground_truth = &floor.grid;
            let mut revealed = TileGrid::hidden(ground_truth.width(), ground_truth.height());

            let mut player = floor.player_start;
            for choice in walk {
                let next = player.step(Direction::ALL[choice]);
                if ground_truth.tile_at(next) != Tile::Wall && ground_truth.in_bounds(next) {
                    player = next;
                }
                reveal(ground_truth, &mut revealed, player, radius);
            }

            let mut fresh = TileGrid::hidden(ground_truth.width(), ground_truth.height());
            reveal(ground_truth, &mut fresh, player, radius);
            for (pos, tile) in fresh.iter() {
                if tile != Tile::Hidden {
                    prop_assert!(pos.manhattan(player) <= radius as u32);
                    prop_assert_eq!(tile, ground_truth.tile_at(pos));
                }
            }

            reveal(ground_truth, &mut revealed, player, radius);
            let settled = revealed.clone();
            prop_assert_eq!(reveal(ground_truth, &mut revealed, player, radius), 0);
            prop_assert_eq!(revealed, settled);
        }
    }
}
