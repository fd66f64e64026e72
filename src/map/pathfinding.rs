//! Bounded A* over walkable tiles
//!
//! Unit step cost, four-directional moves, Manhattan heuristic. Nodes whose
//! `g + h` exceeds the bound are never opened, so a failed search costs at
//! most the diamond of radius `bound` around the start.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::Position;
use crate::map::GameMap;

/// Result of a bounded reachability search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reach {
    /// Path length, `None` when the goal was not reached within the bound
    pub distance: Option<u32>,
    /// Goal itself when reached, otherwise the explored tile closest to it
    pub nearest: Position,
}

/// Node in the A* open set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PathNode {
    pos: Position,
    g: u32,
    h: u32,
}

impl PathNode {
    fn f(&self) -> u32 {
        self.g + self.h
    }
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; ties prefer nodes closer to the goal,
        // then a fixed scan order so results are reproducible
        other
            .f()
            .cmp(&self.f())
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| (other.pos.y, other.pos.x).cmp(&(self.pos.y, self.pos.x)))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Search from `start` toward `goal` without exceeding `bound` steps.
///
/// The start tile is always usable; the goal may be entered even when it
/// is not walkable itself (rigs sit on their own tile).
pub fn nearest_reachable<M: GameMap + ?Sized>(
    map: &M,
    start: Position,
    goal: Position,
    bound: u32,
) -> Reach {
    if start == goal {
        return Reach {
            distance: Some(0),
            nearest: goal,
        };
    }

    let mut nearest = start;
    let mut nearest_key = (start.manhattan(&goal), 0u32);

    if map.tile_at(start).is_none() {
        return Reach {
            distance: None,
            nearest,
        };
    }

    let mut open_set = BinaryHeap::new();
    let mut g_scores: AHashMap<Position, u32> = AHashMap::new();

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        pos: start,
        g: 0,
        h: start.manhattan(&goal),
    });

    while let Some(current) = open_set.pop() {
        // Stale entry
        if current.g > *g_scores.get(&current.pos).unwrap_or(&u32::MAX) {
            continue;
        }

        if current.pos == goal {
            return Reach {
                distance: Some(current.g),
                nearest: goal,
            };
        }

        if (current.h, current.g) < nearest_key {
            nearest_key = (current.h, current.g);
            nearest = current.pos;
        }

        for neighbor in map.neighbors(current.pos) {
            let Some(tile) = map.tile_at(neighbor) else {
                continue;
            };
            if neighbor != goal && !tile.terrain.is_traversable() {
                continue;
            }

            let g = current.g + 1;
            let h = neighbor.manhattan(&goal);
            if g + h > bound {
                continue;
            }

            if g < *g_scores.get(&neighbor).unwrap_or(&u32::MAX) {
                g_scores.insert(neighbor, g);
                open_set.push(PathNode { pos: neighbor, g, h });
            }
        }
    }

    Reach {
        distance: None,
        nearest,
    }
}
