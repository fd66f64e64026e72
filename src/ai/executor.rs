//! Turns a chosen action into world commands

use tracing::trace;

use crate::ai::distance::RigCandidate;
use crate::ai::state::ActionKind;
use crate::ai::task::Task;
use crate::core::config::ExecutorConfig;
use crate::core::types::{Faction, Millis, Position};
use crate::map::{GameMap, WorldCommands};

/// Issues attractors for captures and overland Gotos, bridge marks for
/// Gotos across water
#[derive(Debug, Clone)]
pub struct TaskExecutor {
    config: ExecutorConfig,
}

impl TaskExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Execute `kind` against `candidate` and describe the resulting task.
    ///
    /// A reachable Goto target gets an attractor on the rig like a capture
    /// and yields an overland task. An unreachable one gets bridge marks.
    /// Returns `None` when a bridge walk found nothing new to build; the
    /// caller keeps whatever task it had.
    pub fn execute<W: GameMap + WorldCommands + ?Sized>(
        &self,
        world: &mut W,
        faction: Faction,
        kind: ActionKind,
        candidate: &RigCandidate,
        now: Millis,
    ) -> Option<Task> {
        if kind.is_capture() || candidate.reachable {
            self.attract(world, faction, kind, candidate);
            let task = Task::new(kind.into(), vec![candidate.nearest], candidate.position, now);
            return Some(if kind.is_capture() { task } else { task.overland() });
        }

        let positions = self.build_toward(world, faction, candidate);

        if positions.is_empty() {
            trace!(
                "{:?}: {:?} toward {:?} queued nothing",
                faction,
                kind,
                candidate.position
            );
            return None;
        }

        Some(Task::new(kind.into(), positions, candidate.position, now))
    }

    fn attract<W: WorldCommands + ?Sized>(
        &self,
        world: &mut W,
        faction: Faction,
        kind: ActionKind,
        candidate: &RigCandidate,
    ) {
        let strength = if kind.targets_enemy() {
            world.clear_attractors(faction);
            self.config.enemy_attractor_strength
        } else {
            self.config.unclaimed_attractor_strength
        };
        world.set_attractor(candidate.nearest, faction, strength);
    }

    /// Walk from the approach tile toward the target over water, marking
    /// each step for bridge construction.
    ///
    /// Each step takes the water neighbour closest to the target (first
    /// one wins ties). Tiles that already carry a bridge mark are walked
    /// through but not queued again, and a mark the world refuses is not
    /// queued either.
    fn build_toward<W: GameMap + WorldCommands + ?Sized>(
        &self,
        world: &mut W,
        faction: Faction,
        candidate: &RigCandidate,
    ) -> Vec<Position> {
        let mut queued = Vec::new();
        let mut current = candidate.nearest;

        for _ in 0..=self.config.bridge_depth {
            let Some(next) = closest_water_neighbor(&*world, current, candidate.position) else {
                break;
            };

            if !world.is_bridge_marked(next) {
                world.mark_for_bridge(next, faction);
                if world.is_bridge_marked(next) {
                    queued.push(next);
                }
            }
            current = next;
        }

        queued
    }
}

fn closest_water_neighbor<M: GameMap + ?Sized>(
    map: &M,
    from: Position,
    target: Position,
) -> Option<Position> {
    let mut best: Option<(Position, f32)> = None;
    for neighbor in map.neighbors(from) {
        if !map.tile_at(neighbor).is_some_and(|t| t.is_water()) {
            continue;
        }
        let d = neighbor.distance(&target);
        if best.map_or(true, |(_, closest)| d < closest) {
            best = Some((neighbor, d));
        }
    }
    best.map(|(pos, _)| pos)
}
