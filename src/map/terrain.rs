//! Tile terrain and the construction markers that can sit on a tile

use serde::{Deserialize, Serialize};

/// Base terrain of a map tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TerrainKind {
    #[default]
    Water,  // Needs a bridge before workers can cross
    Ground, // Walkable, buildable
}

impl TerrainKind {
    /// Can workers walk across this terrain?
    pub fn is_traversable(&self) -> bool {
        matches!(self, TerrainKind::Ground)
    }

    pub fn symbol(&self) -> char {
        match self {
            TerrainKind::Water => '~',
            TerrainKind::Ground => '.',
        }
    }
}

/// Snapshot of a single tile as seen by the AI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: TerrainKind,
    /// A rig or building stands here
    pub occupied: bool,
}

impl Tile {
    pub fn new(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            occupied: false,
        }
    }

    pub fn is_water(&self) -> bool {
        self.terrain == TerrainKind::Water
    }

    pub fn is_ground(&self) -> bool {
        self.terrain == TerrainKind::Ground
    }
}

/// Construction orders placed on tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapMarker {
    Bridge,  // Water queued for conversion to ground
    Forbid,  // Workers keep off
    Guard,   // Workers hold this tile
    Destroy, // Ground queued for conversion back to water
}
