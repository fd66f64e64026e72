//! Compact numeric snapshot the search plans over

use serde::{Deserialize, Serialize};

use crate::ai::distance::{FactionView, RigCandidate};
use crate::core::types::Faction;

/// Opponent distance to an unclaimed rig when the opponent owns no rigs
pub const UNCONTESTED: u32 = u32::MAX;

/// What the deciding faction does with a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    CaptureUnclaimed,
    CaptureEnemy,
    GotoUnclaimed,
    GotoEnemy,
}

impl ActionKind {
    pub fn is_capture(&self) -> bool {
        matches!(self, ActionKind::CaptureUnclaimed | ActionKind::CaptureEnemy)
    }

    pub fn is_goto(&self) -> bool {
        !self.is_capture()
    }

    pub fn targets_enemy(&self) -> bool {
        matches!(self, ActionKind::CaptureEnemy | ActionKind::GotoEnemy)
    }
}

/// Action kind plus index into the matching distance vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AiAction {
    pub kind: ActionKind,
    pub index: usize,
}

impl AiAction {
    pub fn new(kind: ActionKind, index: usize) -> Self {
        Self { kind, index }
    }
}

/// Distances from the deciding faction's point of view.
///
/// `own_to_unclaimed` and `enemy_to_unclaimed` are index-aligned (same rig
/// at the same index). The enemy vectors need not match each other in
/// length: one is indexed by enemy rigs, the other by own rigs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AiState {
    pub faction: Faction,
    pub own_to_enemy: Vec<u32>,
    pub enemy_to_own: Vec<u32>,
    pub own_to_unclaimed: Vec<u32>,
    pub enemy_to_unclaimed: Vec<u32>,
}

impl AiState {
    /// Build the planning state from this cycle's candidates.
    ///
    /// Unreachable candidates are lifted just above `capture_threshold`,
    /// which keeps them out of Capture but open to Goto.
    pub fn from_view(faction: Faction, view: &FactionView, capture_threshold: u32) -> Self {
        let modelled = |candidates: &[RigCandidate]| -> Vec<u32> {
            candidates
                .iter()
                .map(|c| {
                    if c.reachable {
                        c.distance
                    } else {
                        c.distance.max(capture_threshold.saturating_add(1))
                    }
                })
                .collect()
        };

        let own_to_unclaimed = modelled(view.to_unclaimed);
        let enemy_to_unclaimed = if own_to_unclaimed.is_empty() {
            Vec::new()
        } else if view.enemy_to_unclaimed.len() == own_to_unclaimed.len() {
            modelled(view.enemy_to_unclaimed)
        } else {
            vec![UNCONTESTED; own_to_unclaimed.len()]
        };

        Self {
            faction,
            own_to_enemy: modelled(view.to_enemy),
            enemy_to_own: modelled(view.enemy_to_own),
            own_to_unclaimed,
            enemy_to_unclaimed,
        }
    }

    /// Structural invariants every simulated state must keep
    pub fn is_well_formed(&self) -> bool {
        self.faction.is_player() && self.own_to_unclaimed.len() == self.enemy_to_unclaimed.len()
    }

    /// Number of rigs the deciding faction could still act on
    pub fn target_count(&self) -> usize {
        self.own_to_enemy.len() + self.own_to_unclaimed.len()
    }

    /// Distance behind an action's index, if the index is valid
    pub fn distance_for(&self, action: &AiAction) -> Option<u32> {
        let sequence = if action.kind.targets_enemy() {
            &self.own_to_enemy
        } else {
            &self.own_to_unclaimed
        };
        sequence.get(action.index).copied()
    }
}
