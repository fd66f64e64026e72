//! Rig-to-rig distance vectors
//!
//! For every target rig the closest source rig (by Manhattan distance) is
//! picked as representative, then the real walking distance between the
//! two is searched in both directions with a cutoff of
//! `bound_factor × Manhattan`. Candidate order follows the map's rig
//! enumeration order; `AiAction::index` points into these vectors.

use serde::{Deserialize, Serialize};

use crate::core::config::DistanceConfig;
use crate::core::types::{Faction, Position};
use crate::map::GameMap;

/// One target rig as seen from the nearest rig of a source faction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RigCandidate {
    /// Target rig position
    pub position: Position,
    /// Reachable tile closest to the target (the target itself when reached)
    pub nearest: Position,
    /// Walking distance, or the search bound when unreachable
    pub distance: u32,
    pub reachable: bool,
}

/// Distance vectors for both factions, recomputed every decision cycle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistanceField {
    pub blue_to_red: Vec<RigCandidate>,
    pub red_to_blue: Vec<RigCandidate>,
    pub blue_to_unclaimed: Vec<RigCandidate>,
    pub red_to_unclaimed: Vec<RigCandidate>,
}

/// The four vectors arranged from one faction's point of view
#[derive(Debug, Clone, Copy)]
pub struct FactionView<'a> {
    pub to_enemy: &'a [RigCandidate],
    pub enemy_to_own: &'a [RigCandidate],
    pub to_unclaimed: &'a [RigCandidate],
    pub enemy_to_unclaimed: &'a [RigCandidate],
}

impl FactionView<'_> {
    /// Nothing this faction could act on
    pub fn has_no_targets(&self) -> bool {
        self.to_enemy.is_empty() && self.to_unclaimed.is_empty()
    }
}

impl DistanceField {
    pub fn compute<M: GameMap + ?Sized>(map: &M, config: &DistanceConfig) -> Self {
        let blue = rig_positions(map, Faction::Blue);
        let red = rig_positions(map, Faction::Red);
        let unclaimed = rig_positions(map, Faction::None);

        let factor = config.bound_factor;
        Self {
            blue_to_red: candidates(map, &blue, &red, factor),
            red_to_blue: candidates(map, &red, &blue, factor),
            blue_to_unclaimed: candidates(map, &blue, &unclaimed, factor),
            red_to_unclaimed: candidates(map, &red, &unclaimed, factor),
        }
    }

    /// The four vectors from `faction`'s side. Unclaimed gets empty slices.
    pub fn view(&self, faction: Faction) -> FactionView<'_> {
        let enemy = faction.opponent();
        FactionView {
            to_enemy: self.between(faction, enemy),
            enemy_to_own: self.between(enemy, faction),
            to_unclaimed: self.to_unclaimed(faction),
            enemy_to_unclaimed: self.to_unclaimed(enemy),
        }
    }

    fn between(&self, from: Faction, to: Faction) -> &[RigCandidate] {
        match (from, to) {
            (Faction::Blue, Faction::Red) => &self.blue_to_red,
            (Faction::Red, Faction::Blue) => &self.red_to_blue,
            _ => &[],
        }
    }

    fn to_unclaimed(&self, from: Faction) -> &[RigCandidate] {
        match from {
            Faction::Blue => &self.blue_to_unclaimed,
            Faction::Red => &self.red_to_unclaimed,
            Faction::None => &[],
        }
    }
}

fn rig_positions<M: GameMap + ?Sized>(map: &M, faction: Faction) -> Vec<Position> {
    map.rigs_of_faction(faction)
        .into_iter()
        .map(|r| r.position)
        .collect()
}

fn candidates<M: GameMap + ?Sized>(
    map: &M,
    sources: &[Position],
    targets: &[Position],
    bound_factor: u32,
) -> Vec<RigCandidate> {
    if sources.is_empty() {
        return Vec::new();
    }
    targets
        .iter()
        .filter_map(|t| rig_candidate(map, sources, *t, bound_factor))
        .collect()
}

/// Distance from the closest source rig to `target`
pub fn rig_candidate<M: GameMap + ?Sized>(
    map: &M,
    sources: &[Position],
    target: Position,
    bound_factor: u32,
) -> Option<RigCandidate> {
    // Manhattan only picks the representative source
    let mut source = *sources.first()?;
    let mut closest = source.manhattan(&target);
    for candidate in &sources[1..] {
        let d = candidate.manhattan(&target);
        if d < closest {
            closest = d;
            source = *candidate;
        }
    }

    let bound = closest.saturating_mul(bound_factor);

    // Construction can make traversal asymmetric, so search both ways
    let forward = map.nearest_reachable(source, target, bound);
    let backward = map.nearest_reachable(target, source, bound);

    let distance = match (forward.distance, backward.distance) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };

    Some(RigCandidate {
        position: target,
        nearest: forward.nearest,
        distance: distance.unwrap_or(bound),
        reachable: distance.is_some(),
    })
}
