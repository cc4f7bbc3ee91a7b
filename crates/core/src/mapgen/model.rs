//! Public data model for one generated floor.

use xxhash_rust::xxh3::xxh3_64;

use crate::grid::TileGrid;
use crate::types::{Edge, Pos};

use super::doors::DoorPlacement;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedFloor {
    pub grid: TileGrid,
    pub start: DoorPlacement,
    pub exit: DoorPlacement,
    /// Where the player stands on arrival: the carve origin just inside the start door.
    pub player_start: Pos,
    pub key: Pos,
    pub enemies: Vec<Pos>,
    pub life_fountain: Pos,
    pub mana_fountain: Pos,
    pub loops_added: usize,
    /// 1 for the first floor a generator produces.
    pub floor_number: u32,
}

impl GeneratedFloor {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.grid.tiles().len() + 128);
        bytes.extend((self.grid.width() as u32).to_le_bytes());
        bytes.extend((self.grid.height() as u32).to_le_bytes());
        for tile in self.grid.tiles() {
            bytes.push(tile.code() as u8);
        }

        for door in [self.start, self.exit] {
            bytes.push(edge_code(door.edge));
            push_pos(&mut bytes, door.door);
        }
        push_pos(&mut bytes, self.player_start);
        push_pos(&mut bytes, self.key);
        push_pos(&mut bytes, self.life_fountain);
        push_pos(&mut bytes, self.mana_fountain);

        bytes.extend((self.enemies.len() as u32).to_le_bytes());
        for &enemy in &self.enemies {
            push_pos(&mut bytes, enemy);
        }
        bytes.extend((self.loops_added as u32).to_le_bytes());
        bytes.extend(self.floor_number.to_le_bytes());

        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

fn push_pos(bytes: &mut Vec<u8>, pos: Pos) {
    bytes.extend(pos.y.to_le_bytes());
    bytes.extend(pos.x.to_le_bytes());
}

fn edge_code(edge: Edge) -> u8 {
    match edge {
        Edge::Top => 0,
        Edge::Bottom => 1,
        Edge::Left => 2,
        Edge::Right => 3,
    }
}
