//! In-memory rectangular world
//!
//! Holds terrain, rig ownership, construction markers and attractors.
//! Implements both `GameMap` and `WorldCommands`, so it can stand in for
//! the real game model anywhere the AI runs.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::ai::events::{ChangeKind, RigEvent};
use crate::core::error::{AiError, Result};
use crate::core::types::{Faction, Position};
use crate::map::terrain::{MapMarker, TerrainKind, Tile};
use crate::map::{GameMap, Rig, WorldCommands};

/// Worker influence point placed by a faction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attractor {
    pub position: Position,
    pub faction: Faction,
    pub strength: f32,
}

/// Marker together with the faction that placed it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedMarker {
    pub kind: MapMarker,
    pub faction: Faction,
}

/// The full world
#[derive(Debug, Clone)]
pub struct GridWorld {
    pub width: u32,
    pub height: u32,
    tiles: Vec<Tile>,
    rigs: Vec<Rig>,
    markers: AHashMap<Position, PlacedMarker>,
    attractors: Vec<Attractor>,
}

impl GridWorld {
    /// Create a world filled with one terrain kind
    pub fn new(width: u32, height: u32, terrain: TerrainKind) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::new(terrain); (width * height) as usize],
            rigs: Vec::new(),
            markers: AHashMap::new(),
            attractors: Vec::new(),
        }
    }

    /// Parse a world from text, one row per line.
    ///
    /// `.` ground, `~` water, `B`/`R`/`U` a blue/red/unclaimed rig on ground.
    /// Short rows are padded with water.
    pub fn from_ascii(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;

        let mut world = GridWorld::new(width, height, TerrainKind::Water);
        for (row, line) in rows.iter().enumerate() {
            for (column, symbol) in line.chars().enumerate() {
                let pos = Position::new(column as i32, row as i32);
                match symbol {
                    '~' => {}
                    '.' => world.set_terrain(pos, TerrainKind::Ground),
                    'B' | 'R' | 'U' => {
                        let owner = match symbol {
                            'B' => Faction::Blue,
                            'R' => Faction::Red,
                            _ => Faction::None,
                        };
                        world.set_terrain(pos, TerrainKind::Ground);
                        world.add_rig(pos, owner)?;
                    }
                    _ => {
                        return Err(AiError::MapParse {
                            row,
                            column,
                            symbol,
                        })
                    }
                }
            }
        }

        Ok(world)
    }

    /// Render the world back to text (markers and attractors are not shown)
    pub fn to_ascii(&self) -> String {
        let mut out = String::new();
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let pos = Position::new(x, y);
                let symbol = match self.rig_at(pos) {
                    Some(rig) => match rig.owner {
                        Faction::Blue => 'B',
                        Faction::Red => 'R',
                        Faction::None => 'U',
                    },
                    None => self
                        .tile(pos)
                        .map(|t| t.terrain.symbol())
                        .unwrap_or('~'),
                };
                out.push(symbol);
            }
            out.push('\n');
        }
        out
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).map(|i| &self.tiles[i])
    }

    fn tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        self.index(pos).map(|i| &mut self.tiles[i])
    }

    /// Set terrain at a position (ignored outside the map)
    pub fn set_terrain(&mut self, pos: Position, terrain: TerrainKind) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.terrain = terrain;
        }
    }

    /// Place a rig; its tile becomes occupied
    pub fn add_rig(&mut self, pos: Position, owner: Faction) -> Result<()> {
        let tile = self.tile_mut(pos).ok_or(AiError::OutOfBounds(pos))?;
        tile.occupied = true;
        self.rigs.push(Rig {
            position: pos,
            owner,
        });
        Ok(())
    }

    pub fn rigs(&self) -> &[Rig] {
        &self.rigs
    }

    pub fn rig_at(&self, pos: Position) -> Option<&Rig> {
        self.rigs.iter().find(|r| r.position == pos)
    }

    /// Hand a rig to `faction` and describe the change.
    ///
    /// Returns `None` when there is no rig at `pos` or it already belongs
    /// to `faction`.
    pub fn capture_rig(&mut self, pos: Position, faction: Faction) -> Option<RigEvent> {
        let rig = self.rigs.iter_mut().find(|r| r.position == pos)?;
        if rig.owner == faction {
            return None;
        }

        let change = if rig.owner == Faction::None {
            ChangeKind::UnclaimedCaptured
        } else {
            ChangeKind::EnemyCaptured
        };
        rig.owner = faction;

        trace!("Rig at {:?} captured by {:?} ({:?})", pos, faction, change);
        Some(RigEvent::ownership_changed(pos, faction, change))
    }

    pub fn marker_at(&self, pos: Position) -> Option<&PlacedMarker> {
        self.markers.get(&pos)
    }

    /// Can a marker of this kind go on this tile?
    ///
    /// Bridges need unmarked water next to something walkable (or next to
    /// another bridge mark, so chains can grow into open water). Every
    /// other marker needs free, unmarked ground.
    pub fn is_free_for(&self, kind: MapMarker, pos: Position) -> bool {
        let Some(tile) = self.tile(pos) else {
            return false;
        };
        if self.markers.contains_key(&pos) {
            return false;
        }

        match kind {
            MapMarker::Bridge => {
                tile.is_water()
                    && pos.neighbors8().iter().any(|n| match self.tile(*n) {
                        Some(t) => !t.is_water() || self.contains_marker(*n, MapMarker::Bridge),
                        None => false,
                    })
            }
            MapMarker::Forbid | MapMarker::Guard | MapMarker::Destroy => {
                tile.is_ground() && !tile.occupied
            }
        }
    }

    pub fn contains_marker(&self, pos: Position, kind: MapMarker) -> bool {
        self.markers.get(&pos).is_some_and(|m| m.kind == kind)
    }

    /// Place a marker if the tile allows it. Returns whether it was placed.
    pub fn place_marker(&mut self, pos: Position, kind: MapMarker, faction: Faction) -> bool {
        if !self.is_free_for(kind, pos) {
            return false;
        }
        self.markers.insert(pos, PlacedMarker { kind, faction });
        true
    }

    pub fn remove_marker(&mut self, pos: Position) -> Option<PlacedMarker> {
        self.markers.remove(&pos)
    }

    /// Bridge marks placed by a faction, in scan order
    pub fn bridge_marks(&self, faction: Faction) -> Vec<Position> {
        let mut marks: Vec<Position> = self
            .markers
            .iter()
            .filter(|(_, m)| m.kind == MapMarker::Bridge && m.faction == faction)
            .map(|(pos, _)| *pos)
            .collect();
        marks.sort_by_key(|p| (p.y, p.x));
        marks
    }

    /// Finish construction on a bridge mark: the water becomes ground.
    pub fn complete_bridge(&mut self, pos: Position) -> bool {
        if !self.contains_marker(pos, MapMarker::Bridge) {
            return false;
        }
        self.markers.remove(&pos);
        self.set_terrain(pos, TerrainKind::Ground);
        true
    }

    pub fn attractors(&self, faction: Faction) -> Vec<Attractor> {
        self.attractors
            .iter()
            .filter(|a| a.faction == faction)
            .copied()
            .collect()
    }
}

impl GameMap for GridWorld {
    fn tile_at(&self, pos: Position) -> Option<Tile> {
        self.tile(pos).copied()
    }

    fn neighbors(&self, pos: Position) -> Vec<Position> {
        pos.neighbors4()
            .into_iter()
            .filter(|n| self.in_bounds(*n))
            .collect()
    }

    fn rigs_of_faction(&self, faction: Faction) -> Vec<Rig> {
        self.rigs
            .iter()
            .filter(|r| r.owner == faction)
            .copied()
            .collect()
    }
}

impl WorldCommands for GridWorld {
    fn set_attractor(&mut self, pos: Position, faction: Faction, strength: f32) {
        self.attractors.push(Attractor {
            position: pos,
            faction,
            strength,
        });
    }

    fn clear_attractors(&mut self, faction: Faction) {
        self.attractors.retain(|a| a.faction != faction);
    }

    /// Same rules as `place_marker`: a tile keeps the first mark it
    /// receives, and open water needs a shore or an adjacent bridge mark.
    fn mark_for_bridge(&mut self, pos: Position, faction: Faction) {
        if !self.place_marker(pos, MapMarker::Bridge, faction) {
            trace!("Bridge mark at {:?} refused for {:?}", pos, faction);
        }
    }

    fn is_bridge_marked(&self, pos: Position) -> bool {
        self.contains_marker(pos, MapMarker::Bridge)
    }
}
