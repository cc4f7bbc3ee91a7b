//! Floor orchestration: carve, add loops, place doors, populate, retry on budget exhaustion.

use log::{debug, warn};
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::config::DungeonConfig;
use crate::grid::TileGrid;
use crate::types::Edge;

use super::carve::carve_maze;
use super::doors::{DoorPlacement, entry_from_exit, place_exit, place_start};
use super::error::GenerationError;
use super::loops::add_loops;
use super::model::GeneratedFloor;
use super::populate::{PopulateContext, populate};
use super::seed::{random_below, runtime_seed};

/// Produces consecutive floors of one run from a single seeded stream.
///
/// The generator remembers the last exit it handed out so the next floor's entry lines up with
/// it on the opposite border.
pub struct MazeGenerator {
    config: DungeonConfig,
    seed: u64,
    rng: ChaCha8Rng,
    previous_exit: Option<DoorPlacement>,
    floors_generated: u32,
}

impl MazeGenerator {
    pub fn new(config: DungeonConfig, seed: u64) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self {
            config,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            previous_exit: None,
            floors_generated: 0,
        })
    }

    pub fn from_entropy(config: DungeonConfig) -> Result<Self, GenerationError> {
        Self::new(config, runtime_seed())
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn previous_exit(&self) -> Option<DoorPlacement> {
        self.previous_exit
    }

    pub fn floors_generated(&self) -> u32 {
        self.floors_generated
    }

    /// Builds the next floor, regenerating from scratch when door or entity budgets run out.
    ///
    /// Door bookkeeping only advances when a floor is returned.
    pub fn generate_map(&mut self) -> Result<GeneratedFloor, GenerationError> {
        let attempts = self.config.max_regenerations + 1;
        let mut attempt = 1;
        loop {
            match self.try_generate() {
                Ok(floor) => {
                    debug!(
                        "floor {} (seed {}): entry {:?} exit {:?}, {} loops",
                        floor.floor_number,
                        self.seed,
                        floor.start,
                        floor.exit,
                        floor.loops_added
                    );
                    self.previous_exit = Some(floor.exit);
                    self.floors_generated = floor.floor_number;
                    return Ok(floor);
                }
                Err(err) if attempt < attempts => {
                    warn!("floor attempt {attempt}/{attempts} failed, regenerating: {err}");
                    attempt += 1;
                }
                Err(err) => {
                    return Err(GenerationError::AttemptsExhausted {
                        attempts,
                        last: Box::new(err),
                    });
                }
            }
        }
    }

    fn try_generate(&mut self) -> Result<GeneratedFloor, GenerationError> {
        let config = &self.config;
        let mut grid = TileGrid::walls(config.width, config.height);

        let start = match self.previous_exit {
            Some(exit) => entry_from_exit(&mut grid, exit),
            None => {
                let edge = Edge::ALL[random_below(&mut self.rng, Edge::ALL.len())];
                place_start(&mut grid, edge, &mut self.rng)
            }
        };
        let player_start = start.inward();

        carve_maze(&mut grid, player_start, &mut self.rng);
        let loops_added = add_loops(&mut grid, config.loop_count(), &mut self.rng);
        let exit = place_exit(&mut grid, start.edge, config.door_attempts, &mut self.rng)?;

        let population = populate(
            &mut grid,
            &mut PopulateContext {
                rng: &mut self.rng,
                start_door: start.door,
                exit_approach: exit.inward(),
                enemy_count: config.enemy_count,
                enemy_min_distance: config.enemy_min_distance,
                attempts: config.placement_attempts,
            },
        )?;

        Ok(GeneratedFloor {
            grid,
            start,
            exit,
            player_start,
            key: population.key,
            enemies: population.enemies,
            life_fountain: population.life_fountain,
            mana_fountain: population.mana_fountain,
            loops_added,
            floor_number: self.floors_generated + 1,
        })
    }
}
