use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;
use crate::types::Edge;

/// Entity kinds the populator places by generate-and-test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placeable {
    Key,
    Enemy,
    LifeFountain,
    ManaFountain,
}

impl fmt::Display for Placeable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Key => "key",
            Self::Enemy => "enemy",
            Self::LifeFountain => "life fountain",
            Self::ManaFountain => "mana fountain",
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("invalid dungeon configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("no border cell next to carved floor is free for the exit (entry on {start_edge:?})")]
    ExitUnplaceable { start_edge: Edge },
    #[error("could not place {entity} within {attempts} attempts")]
    PlacementExhausted { entity: Placeable, attempts: usize },
    #[error("floor generation failed after {attempts} attempts: {last}")]
    AttemptsExhausted { attempts: usize, last: Box<GenerationError> },
}
