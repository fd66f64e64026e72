//! Game-state notifications consumed by the AI

use serde::{Deserialize, Serialize};

use crate::core::types::{Faction, Position};

/// How a rig changed hands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    UnclaimedCaptured,
    EnemyCaptured,
}

/// Inbound game-state event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RigEvent {
    OwnershipChanged {
        position: Position,
        new_owner: Faction,
        change: ChangeKind,
    },
}

impl RigEvent {
    pub fn ownership_changed(position: Position, new_owner: Faction, change: ChangeKind) -> Self {
        RigEvent::OwnershipChanged {
            position,
            new_owner,
            change,
        }
    }

    /// Faction that took the rig
    pub fn new_owner(&self) -> Faction {
        match self {
            RigEvent::OwnershipChanged { new_owner, .. } => *new_owner,
        }
    }
}
