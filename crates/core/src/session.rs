//! Player movement over one generated floor, with the fog of war updated after every step.

use log::debug;

use crate::grid::TileGrid;
use crate::mapgen::{DoorPlacement, GeneratedFloor, GenerationError, MazeGenerator};
use crate::snapshot::{FloorSnapshot, SNAPSHOT_FORMAT_VERSION, SnapshotError, grid_to_codes};
use crate::types::{Direction, Pos, Tile};
use crate::visibility::reveal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fountain {
    Life,
    Mana,
}

/// What a single step resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Wall, entry door or map edge; the player did not move.
    Blocked,
    Moved,
    KeyCollected,
    /// The exit needs the key; the player did not move.
    ExitLocked,
    /// The player walked through the exit holding the key. The floor is over.
    ExitReached,
    /// The player stepped onto an enemy, which is removed from the map.
    EnemyEncountered { at: Pos },
    FountainReached(Fountain),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloorSession {
    ground_truth: TileGrid,
    revealed: TileGrid,
    start: DoorPlacement,
    exit: DoorPlacement,
    player: Pos,
    has_key: bool,
    light_radius: i32,
}

impl FloorSession {
    /// Puts the player just inside the entry of a fully hidden map and lights their surroundings.
    pub fn new(floor: GeneratedFloor, light_radius: i32) -> Self {
        let mut revealed = TileGrid::hidden(floor.grid.width(), floor.grid.height());
        revealed.set_tile(floor.player_start, Tile::Floor);

        let mut session = Self {
            ground_truth: floor.grid,
            revealed,
            start: floor.start,
            exit: floor.exit,
            player: floor.player_start,
            has_key: false,
            light_radius,
        };
        session.refresh_light();
        session
    }

    pub fn ground_truth(&self) -> &TileGrid {
        &self.ground_truth
    }

    pub fn revealed(&self) -> &TileGrid {
        &self.revealed
    }

    pub fn player(&self) -> Pos {
        self.player
    }

    pub fn has_key(&self) -> bool {
        self.has_key
    }

    pub fn start(&self) -> DoorPlacement {
        self.start
    }

    pub fn exit(&self) -> DoorPlacement {
        self.exit
    }

    pub fn light_radius(&self) -> i32 {
        self.light_radius
    }

    pub fn step(&mut self, direction: Direction) -> StepOutcome {
        let outcome = self.resolve_step(self.player.step(direction));
        self.refresh_light();
        outcome
    }

    fn resolve_step(&mut self, target: Pos) -> StepOutcome {
        if !self.ground_truth.in_bounds(target) {
            return StepOutcome::Blocked;
        }
        match self.ground_truth.tile_at(target) {
            Tile::Wall | Tile::StartDoor | Tile::Hidden => StepOutcome::Blocked,
            Tile::Key => {
                self.has_key = true;
                self.player = target;
                self.clear_tile(target);
                debug!("key collected at {target:?}");
                StepOutcome::KeyCollected
            }
            Tile::ExitDoor if !self.has_key => StepOutcome::ExitLocked,
            Tile::ExitDoor => {
                self.has_key = false;
                self.player = target;
                StepOutcome::ExitReached
            }
            Tile::Enemy => {
                self.player = target;
                self.clear_tile(target);
                StepOutcome::EnemyEncountered { at: target }
            }
            Tile::LifeFountain => {
                self.player = target;
                StepOutcome::FountainReached(Fountain::Life)
            }
            Tile::ManaFountain => {
                self.player = target;
                StepOutcome::FountainReached(Fountain::Mana)
            }
            Tile::Floor => {
                self.player = target;
                StepOutcome::Moved
            }
        }
    }

    fn clear_tile(&mut self, pos: Pos) {
        self.ground_truth.set_tile(pos, Tile::Floor);
        self.revealed.set_tile(pos, Tile::Floor);
    }

    fn refresh_light(&mut self) {
        reveal(&self.ground_truth, &mut self.revealed, self.player, self.light_radius);
    }

    pub fn snapshot(&self) -> FloorSnapshot {
        FloorSnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            width: self.ground_truth.width(),
            height: self.ground_truth.height(),
            map: grid_to_codes(&self.ground_truth),
            revealed_map: grid_to_codes(&self.revealed),
            player: self.player,
            has_key: self.has_key,
            start: self.start,
            exit: self.exit,
        }
    }

    /// Resumes a saved floor. The revealed grid is restored as saved, without a fresh reveal.
    pub fn from_snapshot(
        snapshot: &FloorSnapshot,
        light_radius: i32,
    ) -> Result<Self, SnapshotError> {
        snapshot.validate()?;
        Ok(Self {
            ground_truth: snapshot.ground_truth()?,
            revealed: snapshot.revealed()?,
            start: snapshot.start,
            exit: snapshot.exit,
            player: snapshot.player,
            has_key: snapshot.has_key,
            light_radius,
        })
    }
}

impl MazeGenerator {
    /// Generates the next floor and drops the player at its entry.
    pub fn next_floor(&mut self) -> Result<FloorSession, GenerationError> {
        let floor = self.generate_map()?;
        Ok(FloorSession::new(floor, self.config().light_radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DungeonConfig;
    use crate::types::Edge;

    const LAYOUT: [&str; 5] = [
        "###<#####",
        "#.$.!.~.#",
        "#+#####.#",
        "#.......#",
        "#######>#",
    ];

    fn hand_built_floor() -> GeneratedFloor {
        let mut grid = TileGrid::walls(9, 5);
        for (y, row) in LAYOUT.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                let tile = match glyph {
                    '.' => Tile::Floor,
                    '<' => Tile::StartDoor,
                    '>' => Tile::ExitDoor,
                    '$' => Tile::Key,
                    '!' => Tile::Enemy,
                    '+' => Tile::LifeFountain,
                    '~' => Tile::ManaFountain,
                    _ => Tile::Wall,
                };
                grid.set_tile(Pos { y: y as i32, x: x as i32 }, tile);
            }
        }
        GeneratedFloor {
            grid,
            start: DoorPlacement { edge: Edge::Top, door: Pos { y: 0, x: 3 } },
            exit: DoorPlacement { edge: Edge::Bottom, door: Pos { y: 4, x: 7 } },
            player_start: Pos { y: 1, x: 3 },
            key: Pos { y: 1, x: 2 },
            enemies: vec![Pos { y: 1, x: 4 }],
            life_fountain: Pos { y: 2, x: 1 },
            mana_fountain: Pos { y: 1, x: 6 },
            loops_added: 0,
            floor_number: 1,
        }
    }

    fn walk(session: &mut FloorSession, direction: Direction, steps: usize) {
        for _ in 0..steps {
            assert_eq!(session.step(direction), StepOutcome::Moved);
        }
    }

    #[test]
    fn arrival_reveals_the_start_tile_and_its_surroundings() {
        let session = FloorSession::new(hand_built_floor(), 3);
        assert_eq!(session.player(), Pos { y: 1, x: 3 });
        assert_eq!(session.revealed().tile_at(Pos { y: 1, x: 3 }), Tile::Floor);
        assert_eq!(session.revealed().tile_at(Pos { y: 1, x: 2 }), Tile::Key);
        assert_eq!(session.revealed().tile_at(Pos { y: 0, x: 3 }), Tile::StartDoor);
        assert_eq!(session.revealed().tile_at(Pos { y: 3, x: 1 }), Tile::Hidden);
    }

    #[test]
    fn walls_and_the_entry_block_movement() {
        let mut session = FloorSession::new(hand_built_floor(), 3);
        assert_eq!(session.step(Direction::Up), StepOutcome::Blocked);
        assert_eq!(session.step(Direction::Down), StepOutcome::Blocked);
        assert_eq!(session.player(), Pos { y: 1, x: 3 });
    }

    #[test]
    fn enemy_tiles_clear_when_the_player_steps_on_them() {
        let mut session = FloorSession::new(hand_built_floor(), 3);
        let at = Pos { y: 1, x: 4 };
        assert_eq!(session.step(Direction::Right), StepOutcome::EnemyEncountered { at });
        assert_eq!(session.player(), at);
        assert_eq!(session.ground_truth().tile_at(at), Tile::Floor);
        assert_eq!(session.revealed().tile_at(at), Tile::Floor);
    }

    #[test]
    fn exit_stays_locked_until_the_key_is_carried_there() {
        let mut session = FloorSession::new(hand_built_floor(), 3);

        session.step(Direction::Right);
        walk(&mut session, Direction::Right, 1);
        assert_eq!(session.step(Direction::Right), StepOutcome::FountainReached(Fountain::Mana));
        walk(&mut session, Direction::Right, 1);
        walk(&mut session, Direction::Down, 2);
        assert_eq!(session.step(Direction::Down), StepOutcome::ExitLocked);
        assert_eq!(session.player(), Pos { y: 3, x: 7 });

        walk(&mut session, Direction::Left, 6);
        assert_eq!(session.step(Direction::Up), StepOutcome::FountainReached(Fountain::Life));
        walk(&mut session, Direction::Up, 1);
        assert_eq!(session.step(Direction::Right), StepOutcome::KeyCollected);
        assert!(session.has_key());
        assert_eq!(session.ground_truth().tile_at(Pos { y: 1, x: 2 }), Tile::Floor);

        walk(&mut session, Direction::Left, 1);
        assert_eq!(session.step(Direction::Down), StepOutcome::FountainReached(Fountain::Life));
        walk(&mut session, Direction::Down, 1);
        walk(&mut session, Direction::Right, 6);
        assert_eq!(session.step(Direction::Down), StepOutcome::ExitReached);
        assert_eq!(session.player(), Pos { y: 4, x: 7 });
        assert!(!session.has_key());
    }

    #[test]
    fn revealed_area_only_grows_while_walking() {
        let mut session = FloorSession::new(hand_built_floor(), 2);
        let mut known = session.revealed().count(Tile::Hidden);
        for direction in [Direction::Right, Direction::Right, Direction::Right, Direction::Right] {
            session.step(direction);
            let hidden = session.revealed().count(Tile::Hidden);
            assert!(hidden <= known);
            known = hidden;
        }
    }

    #[test]
    fn snapshot_restores_the_same_session() {
        let mut session = FloorSession::new(hand_built_floor(), 3);
        session.step(Direction::Left);
        let restored = FloorSession::from_snapshot(&session.snapshot(), 3).unwrap();
        assert_eq!(restored, session);
        assert!(restored.has_key());
    }

    #[test]
    fn generator_hands_out_playable_sessions() {
        let config = DungeonConfig { width: 15, height: 9, enemy_count: 2, ..Default::default() };
        let mut generator = MazeGenerator::new(config, 8).unwrap();
        let session = generator.next_floor().unwrap();
        assert_eq!(session.light_radius(), 3);
        assert_eq!(session.player(), session.start().inward());
        assert_eq!(session.revealed().tile_at(session.player()), Tile::Floor);
        assert_eq!(generator.previous_exit(), Some(session.exit()));
    }
}
