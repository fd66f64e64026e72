//! World collaborator seams
//!
//! The AI never owns the map. It reads terrain and rig ownership through
//! `GameMap` and issues construction/influence commands through
//! `WorldCommands`. `GridWorld` is an in-memory implementation of both,
//! used by tests, benches and the skirmish demo.

pub mod grid;
pub mod pathfinding;
pub mod terrain;

pub use grid::{Attractor, GridWorld, PlacedMarker};
pub use pathfinding::Reach;
pub use terrain::{MapMarker, TerrainKind, Tile};

use serde::{Deserialize, Serialize};

use crate::core::types::{Faction, Position};

/// A capturable rig as reported by the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rig {
    pub position: Position,
    pub owner: Faction,
}

/// Read access to the map
pub trait GameMap {
    /// Tile at a position, `None` outside the map
    fn tile_at(&self, pos: Position) -> Option<Tile>;

    /// In-bounds four-directional neighbours
    fn neighbors(&self, pos: Position) -> Vec<Position>;

    /// Rigs owned by a faction (`Faction::None` = unclaimed), in map enumeration order
    fn rigs_of_faction(&self, faction: Faction) -> Vec<Rig>;

    /// Walking distance over traversable tiles, `None` when no path fits in `bound`
    fn shortest_path_distance(&self, from: Position, to: Position, bound: u32) -> Option<u32> {
        pathfinding::nearest_reachable(self, from, to, bound).distance
    }

    /// Walking distance plus the reachable tile closest to `to`
    fn nearest_reachable(&self, from: Position, to: Position, bound: u32) -> Reach {
        pathfinding::nearest_reachable(self, from, to, bound)
    }
}

/// Commands the AI issues to the world
pub trait WorldCommands {
    /// Steer this faction's workers toward a position
    fn set_attractor(&mut self, pos: Position, faction: Faction, strength: f32);

    /// Remove every attractor this faction placed
    fn clear_attractors(&mut self, faction: Faction);

    /// Queue a water tile for bridge construction
    fn mark_for_bridge(&mut self, pos: Position, faction: Faction);

    fn is_bridge_marked(&self, pos: Position) -> bool;
}
