//! Pure reward model the search plays out
//!
//! Nothing here touches the world. Captures flip a rig in the model and
//! pay a fixed reward; Gotos shave `goto_progress` off a distance and pay
//! a fraction of `approach_reward`. Enemy actions are discounted by how
//! cheaply the opponent could strike back, read from `enemy_to_own`.

use crate::ai::state::{ActionKind, AiAction, AiState, UNCONTESTED};
use crate::core::config::SimulatorConfig;
use crate::search::Simulator;

/// Game model for one faction's decision
#[derive(Debug, Clone)]
pub struct HydSimulator {
    config: SimulatorConfig,
    initial: AiState,
}

impl HydSimulator {
    pub fn new(config: SimulatorConfig, initial: AiState) -> Self {
        Self { config, initial }
    }

    pub fn set_initial_state(&mut self, state: AiState) {
        self.initial = state;
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Opponent's pressure on our rigs in `[0, 1]`.
    ///
    /// 1.0 when the opponent could capture one of our rigs right away,
    /// falling off with the distance of its cheapest option.
    pub fn threat(&self, state: &AiState) -> f64 {
        let Some(&closest) = state.enemy_to_own.iter().min() else {
            return 0.0;
        };
        let threshold = self.config.capture_threshold;
        if closest <= threshold {
            1.0
        } else {
            f64::from(threshold) / f64::from(closest)
        }
    }

    fn gate(&self, distance: u32, capture: ActionKind, goto: ActionKind) -> ActionKind {
        if distance <= self.config.capture_threshold {
            capture
        } else {
            goto
        }
    }
}

impl Simulator for HydSimulator {
    type State = AiState;
    type Action = AiAction;

    fn initial_state(&self) -> &AiState {
        &self.initial
    }

    fn legal_actions(&self, state: &AiState) -> Vec<AiAction> {
        let unclaimed = state.own_to_unclaimed.iter().enumerate().map(|(i, &d)| {
            AiAction::new(
                self.gate(d, ActionKind::CaptureUnclaimed, ActionKind::GotoUnclaimed),
                i,
            )
        });
        let enemy = state.own_to_enemy.iter().enumerate().map(|(i, &d)| {
            AiAction::new(
                self.gate(d, ActionKind::CaptureEnemy, ActionKind::GotoEnemy),
                i,
            )
        });
        unclaimed.chain(enemy).collect()
    }

    fn apply_action(&self, state: &AiState, action: &AiAction) -> (AiState, f64) {
        let Some(distance) = state.distance_for(action) else {
            return (state.clone(), 0.0);
        };

        let cfg = &self.config;
        let threat = self.threat(state);
        let mut next = state.clone();

        let reward = match action.kind {
            ActionKind::CaptureUnclaimed => {
                next.own_to_unclaimed.remove(action.index);
                let enemy = next.enemy_to_unclaimed.remove(action.index);
                // The opponent now eyes the rig from where it eyed the unclaimed one
                if enemy != UNCONTESTED {
                    next.enemy_to_own.push(enemy);
                }
                cfg.capture_unclaimed_reward
            }
            ActionKind::CaptureEnemy => {
                next.own_to_enemy.remove(action.index);
                // The loser's units are still next to the rig
                next.enemy_to_own.push(cfg.capture_threshold);
                cfg.capture_enemy_reward - cfg.response_weight * threat
            }
            ActionKind::GotoUnclaimed | ActionKind::GotoEnemy => {
                let remaining = distance.saturating_sub(cfg.goto_progress);
                let progress = f64::from(distance - remaining) / f64::from(distance.max(1));
                if action.kind.targets_enemy() {
                    next.own_to_enemy[action.index] = remaining;
                    cfg.approach_reward * progress
                        - cfg.response_weight * cfg.approach_reward * threat
                } else {
                    next.own_to_unclaimed[action.index] = remaining;
                    cfg.approach_reward * progress
                }
            }
        };

        (next, reward)
    }

    fn is_terminal(&self, state: &AiState) -> bool {
        state.own_to_unclaimed.is_empty() && state.own_to_enemy.is_empty()
    }
}
