//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Game frame counter (one per fixed update)
pub type Tick = u64;

/// Absolute game time in milliseconds
pub type Millis = u64;

/// Faction identity. `None` marks unclaimed rigs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Faction {
    #[default]
    None,
    Blue,
    Red,
}

impl Faction {
    /// The opposing faction. Unclaimed has no opponent.
    pub fn opponent(&self) -> Faction {
        match self {
            Faction::Blue => Faction::Red,
            Faction::Red => Faction::Blue,
            Faction::None => Faction::None,
        }
    }

    /// Can this faction own rigs and run an AI?
    pub fn is_player(&self) -> bool {
        !matches!(self, Faction::None)
    }
}

/// Integer grid coordinate (tile address and rig location)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: &Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Straight-line distance, used to pick the neighbour closest to a target
    pub fn distance(&self, other: &Self) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Four-directional neighbours (no bounds check)
    pub fn neighbors4(&self) -> [Position; 4] {
        [
            Position::new(self.x - 1, self.y),
            Position::new(self.x, self.y + 1),
            Position::new(self.x + 1, self.y),
            Position::new(self.x, self.y - 1),
        ]
    }

    /// Eight-directional neighbours (no bounds check)
    pub fn neighbors8(&self) -> [Position; 8] {
        [
            Position::new(self.x - 1, self.y - 1),
            Position::new(self.x - 1, self.y),
            Position::new(self.x - 1, self.y + 1),
            Position::new(self.x, self.y + 1),
            Position::new(self.x + 1, self.y + 1),
            Position::new(self.x + 1, self.y),
            Position::new(self.x + 1, self.y - 1),
            Position::new(self.x, self.y - 1),
        ]
    }
}
