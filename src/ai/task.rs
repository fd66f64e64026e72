//! The controller's single active intent

use serde::{Deserialize, Serialize};

use crate::ai::state::ActionKind;
use crate::core::types::{Millis, Position};
use crate::map::GameMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskKind {
    #[default]
    None,
    CaptureUnclaimed,
    CaptureEnemy,
    GotoUnclaimed,
    GotoEnemy,
}

impl From<ActionKind> for TaskKind {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::CaptureUnclaimed => TaskKind::CaptureUnclaimed,
            ActionKind::CaptureEnemy => TaskKind::CaptureEnemy,
            ActionKind::GotoUnclaimed => TaskKind::GotoUnclaimed,
            ActionKind::GotoEnemy => TaskKind::GotoEnemy,
        }
    }
}

/// Why an active task was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaleReason {
    /// A bridge-building Goto position is no longer water
    TerrainChanged,
    /// A capture or overland Goto ran longer than the timeout
    Expired,
}

/// Active task. Replaced wholesale, never edited in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Task {
    pub kind: TaskKind,
    /// Attractor point for captures and overland Gotos, queued bridge
    /// tiles otherwise
    pub positions: Vec<Position>,
    /// Rig the task is heading for
    pub target: Option<Position>,
    pub created: Millis,
    /// Positions are bridge marks rather than an attractor
    #[serde(default)]
    pub builds_bridges: bool,
}

impl Task {
    pub fn new(kind: TaskKind, positions: Vec<Position>, target: Position, created: Millis) -> Self {
        Self {
            kind,
            positions,
            target: Some(target),
            created,
            builds_bridges: matches!(kind, TaskKind::GotoUnclaimed | TaskKind::GotoEnemy),
        }
    }

    /// A Goto that walks to its target over land instead of bridging
    pub fn overland(mut self) -> Self {
        self.builds_bridges = false;
        self
    }

    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.kind == TaskKind::None
    }

    pub fn is_goto(&self) -> bool {
        matches!(self.kind, TaskKind::GotoUnclaimed | TaskKind::GotoEnemy)
    }

    /// Check whether the task should be dropped at time `now`.
    ///
    /// Bridge-building Gotos end once any queued tile stops being water.
    /// Everything else ends when its age exceeds `timeout`.
    pub fn stale_reason<M: GameMap + ?Sized>(
        &self,
        map: &M,
        now: Millis,
        timeout: Millis,
    ) -> Option<StaleReason> {
        if self.is_idle() {
            return None;
        }

        if self.builds_bridges {
            let built_over = self
                .positions
                .iter()
                .any(|pos| !map.tile_at(*pos).is_some_and(|t| t.is_water()));
            return built_over.then_some(StaleReason::TerrainChanged);
        }

        (now.saturating_sub(self.created) > timeout).then_some(StaleReason::Expired)
    }
}
