//! Per-faction AI controller
//!
//! Owns the faction's single task and runs the decision cycle on a fixed
//! tick cadence: refresh distances, drop the task if it went stale, and
//! only when idle search for a new action and hand it to the executor.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::ai::distance::{DistanceField, RigCandidate};
use crate::ai::events::RigEvent;
use crate::ai::executor::TaskExecutor;
use crate::ai::simulator::HydSimulator;
use crate::ai::state::{AiAction, AiState};
use crate::ai::task::{StaleReason, Task, TaskKind};
use crate::core::config::AiConfig;
use crate::core::types::{Faction, Millis, Tick};
use crate::map::{GameMap, WorldCommands};
use crate::search::{SearchReport, UctAgent};

/// Why a cycle ended without a new task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdleReason {
    /// Nothing to capture or approach
    NoTargets,
    /// The search had no action to offer
    SearchNoop,
}

/// What one call to `process_tick` did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CycleOutcome {
    /// Not a decision tick
    Skipped,
    /// The active task is still valid
    Kept(TaskKind),
    Idle(IdleReason),
    /// A new task replaced the idle one
    Dispatched { action: AiAction, task: Task },
    /// The executor produced nothing; the faction stays idle
    Discarded { action: AiAction },
}

impl CycleOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, CycleOutcome::Dispatched { .. })
    }
}

/// Decision maker for one faction
pub struct AiController {
    faction: Faction,
    config: AiConfig,
    agent: UctAgent,
    executor: TaskExecutor,
    task: Task,
    distances: DistanceField,
    last_search: Option<SearchReport<AiAction>>,
}

impl AiController {
    pub fn new(faction: Faction, config: AiConfig) -> Self {
        let agent = UctAgent::new(format!("{:?}", faction), config.search.clone());
        let executor = TaskExecutor::new(config.executor.clone());
        Self {
            faction,
            config,
            agent,
            executor,
            task: Task::idle(),
            distances: DistanceField::default(),
            last_search: None,
        }
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    /// Distances computed in the last decision cycle
    pub fn distances(&self) -> &DistanceField {
        &self.distances
    }

    /// Root statistics of the last search, if one ran
    pub fn last_search(&self) -> Option<&SearchReport<AiAction>> {
        self.last_search.as_ref()
    }

    /// Is `tick` a decision tick?
    pub fn should_evaluate(&self, tick: Tick) -> bool {
        tick % self.config.decision.interval_ticks == 0
    }

    /// Advance the controller by one game tick.
    ///
    /// `now` is the simulated time in milliseconds used for task ages.
    pub fn process_tick<W>(&mut self, world: &mut W, tick: Tick, now: Millis) -> CycleOutcome
    where
        W: GameMap + WorldCommands + ?Sized,
    {
        if !self.should_evaluate(tick) {
            return CycleOutcome::Skipped;
        }

        self.distances = DistanceField::compute(&*world, &self.config.distance);

        if !self.task.is_idle() {
            match self
                .task
                .stale_reason(&*world, now, self.config.decision.task_timeout_ms)
            {
                Some(reason) => self.drop_task(reason),
                None => return CycleOutcome::Kept(self.task.kind),
            }
        }

        self.decide(world, now)
    }

    /// React to a rig changing hands.
    ///
    /// Any capture voids the current plan: the task goes idle and this
    /// faction's attractors are removed. Bridge marks stay.
    pub fn handle_event<W: WorldCommands + ?Sized>(&mut self, world: &mut W, event: &RigEvent) {
        match event {
            RigEvent::OwnershipChanged {
                position,
                new_owner,
                change,
            } => {
                debug!(
                    "{:?}: rig at {:?} went to {:?} ({:?}), resetting {:?}",
                    self.faction, position, new_owner, change, self.task.kind
                );
                self.task = Task::idle();
                world.clear_attractors(self.faction);
            }
        }
    }

    fn drop_task(&mut self, reason: StaleReason) {
        debug!(
            "{:?}: dropping {:?} task toward {:?} ({:?})",
            self.faction, self.task.kind, self.task.target, reason
        );
        self.task = Task::idle();
    }

    fn decide<W>(&mut self, world: &mut W, now: Millis) -> CycleOutcome
    where
        W: GameMap + WorldCommands + ?Sized,
    {
        if !self.faction.is_player() {
            return CycleOutcome::Idle(IdleReason::NoTargets);
        }

        let view = self.distances.view(self.faction);
        let state = AiState::from_view(
            self.faction,
            &view,
            self.config.simulator.capture_threshold,
        );
        if state.target_count() == 0 {
            trace!("{:?}: no targets, idling", self.faction);
            return CycleOutcome::Idle(IdleReason::NoTargets);
        }

        let simulator = HydSimulator::new(self.config.simulator.clone(), state);
        let report = self.agent.search(&simulator);
        let best = report.best_action;
        self.last_search = Some(report);

        let Some(action) = best else {
            trace!("{:?}: search returned no action", self.faction);
            return CycleOutcome::Idle(IdleReason::SearchNoop);
        };

        let Some(candidate) = self.candidate_for(&action) else {
            return CycleOutcome::Idle(IdleReason::SearchNoop);
        };

        match self
            .executor
            .execute(world, self.faction, action.kind, &candidate, now)
        {
            Some(task) => {
                debug!(
                    "{:?}: {:?} toward {:?} via {} position(s)",
                    self.faction,
                    task.kind,
                    candidate.position,
                    task.positions.len()
                );
                self.task = task.clone();
                CycleOutcome::Dispatched { action, task }
            }
            None => {
                debug!(
                    "{:?}: {:?} toward {:?} discarded",
                    self.faction, action.kind, candidate.position
                );
                CycleOutcome::Discarded { action }
            }
        }
    }

    fn candidate_for(&self, action: &AiAction) -> Option<RigCandidate> {
        let view = self.distances.view(self.faction);
        let candidates = if action.kind.targets_enemy() {
            view.to_enemy
        } else {
            view.to_unclaimed
        };
        candidates.get(action.index).copied()
    }
}
