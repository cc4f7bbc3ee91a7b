use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn offset(self, offset: Offset) -> Self {
        Self { y: self.y + offset.dy, x: self.x + offset.dx }
    }

    pub fn step(self, direction: Direction) -> Self {
        self.offset(direction.offset())
    }

    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn chebyshev(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Offset {
    pub dy: i32,
    pub dx: i32,
}

impl Offset {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dy, dx }
    }

    pub const fn scaled(self, factor: i32) -> Self {
        Self { dy: self.dy * factor, dx: self.dx * factor }
    }
}

/// Cell kinds shared by the ground-truth and revealed grids.
///
/// `Hidden` only ever appears in a revealed grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tile {
    Wall,
    Floor,
    StartDoor,
    ExitDoor,
    Key,
    Enemy,
    LifeFountain,
    ManaFountain,
    Hidden,
}

impl Tile {
    pub const fn code(self) -> i32 {
        match self {
            Self::Wall => 0,
            Self::Floor => 1,
            Self::StartDoor => 2,
            Self::ExitDoor => 3,
            Self::Key => 4,
            Self::Enemy => 5,
            Self::LifeFountain => 6,
            Self::ManaFountain => 7,
            Self::Hidden => 99,
        }
    }

    pub const fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::Wall,
            1 => Self::Floor,
            2 => Self::StartDoor,
            3 => Self::ExitDoor,
            4 => Self::Key,
            5 => Self::Enemy,
            6 => Self::LifeFountain,
            7 => Self::ManaFountain,
            99 => Self::Hidden,
            _ => return None,
        })
    }

    pub fn glyph(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Floor => '.',
            Self::StartDoor => '<',
            Self::ExitDoor => '>',
            Self::Key => '$',
            Self::Enemy => '!',
            Self::LifeFountain => '+',
            Self::ManaFountain => '~',
            Self::Hidden => ' ',
        }
    }
}

/// The four cardinal directions, in carving and sweep order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Ground-truth cells a visibility sweep inspects before revealing a target.
/// Both offsets are relative to the target tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OcclusionProbes {
    pub diagonal: Offset,
    pub reverse: Offset,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub const fn offset(self) -> Offset {
        match self {
            Self::Up => Offset::new(0, -1),
            Self::Down => Offset::new(0, 1),
            Self::Left => Offset::new(-1, 0),
            Self::Right => Offset::new(1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    pub const fn occlusion_probes(self) -> OcclusionProbes {
        match self {
            Self::Up => {
                OcclusionProbes { diagonal: Offset::new(1, 1), reverse: Offset::new(1, 0) }
            }
            Self::Down => {
                OcclusionProbes { diagonal: Offset::new(-1, -1), reverse: Offset::new(-1, 0) }
            }
            Self::Left => {
                OcclusionProbes { diagonal: Offset::new(1, -1), reverse: Offset::new(0, -1) }
            }
            Self::Right => {
                OcclusionProbes { diagonal: Offset::new(-1, 1), reverse: Offset::new(0, 1) }
            }
        }
    }
}

/// A border of the map on which a door can sit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Direction pointing from a door on this edge into the map.
    pub const fn inward(self) -> Direction {
        match self {
            Self::Top => Direction::Down,
            Self::Bottom => Direction::Up,
            Self::Left => Direction::Right,
            Self::Right => Direction::Left,
        }
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}
