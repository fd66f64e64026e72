//! AI profile configuration loaded from TOML
//!
//! A profile bundles every tunable of the faction AI: search budget,
//! decision cadence, the simulator's reward model, task execution
//! strengths and the distance-search cutoff. All sections default, so a
//! profile file only needs to mention what it changes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::core::error::{AiError, Result};
use crate::core::types::{Millis, Tick};

/// UCT search parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Select/expand/simulate/backpropagate iterations per decision
    pub iterations: u32,
    /// Weight of the exploration term in the UCT score
    pub exploration: f64,
    /// Maximum random actions per rollout
    pub rollout_depth: u32,
    /// Per-step reward discount inside a rollout (1.0 = undiscounted)
    pub discount: f64,
    /// Seed for the rollout RNG
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: 20,
            exploration: std::f64::consts::SQRT_2,
            rollout_depth: 5,
            discount: 0.95,
            seed: 42,
        }
    }
}

/// Decision cycle cadence and task lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// A decision cycle runs on every tick divisible by this interval
    pub interval_ticks: Tick,
    /// Capture tasks older than this are dropped
    pub task_timeout_ms: Millis,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            interval_ticks: 100,
            task_timeout_ms: 10_000,
        }
    }
}

/// Reward model used by the search simulator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Capture is legal when the modelled distance is at most this
    pub capture_threshold: u32,
    pub capture_unclaimed_reward: f64,
    pub capture_enemy_reward: f64,
    /// Upper bound of the reward for one Goto step
    pub approach_reward: f64,
    /// How strongly the opponent's cheapest capture discounts enemy actions
    pub response_weight: f64,
    /// Distance removed from a target by one modelled Goto
    pub goto_progress: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            capture_threshold: 6,
            capture_unclaimed_reward: 1.0,
            capture_enemy_reward: 1.5,
            approach_reward: 0.25,
            response_weight: 0.5,
            goto_progress: 6,
        }
    }
}

/// Task execution parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    pub unclaimed_attractor_strength: f32,
    pub enemy_attractor_strength: f32,
    /// Extra steps taken by the bridge walk after the first tile
    pub bridge_depth: u32,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            unclaimed_attractor_strength: 0.3,
            enemy_attractor_strength: 0.8,
            bridge_depth: 5,
        }
    }
}

/// Distance field parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceConfig {
    /// Path search cutoff as a multiple of the Manhattan distance
    pub bound_factor: u32,
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self { bound_factor: 2 }
    }
}

/// Complete AI profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiConfig {
    /// Name of this profile (set from filename)
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub decision: DecisionConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub distance: DistanceConfig,
}

impl AiConfig {
    /// Parse a profile from a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AiConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.search.iterations == 0 {
            return Err(AiError::InvalidConfig(
                "search.iterations must be positive".into(),
            ));
        }

        if self.search.exploration < 0.0 {
            return Err(AiError::InvalidConfig(format!(
                "search.exploration ({}) must not be negative",
                self.search.exploration
            )));
        }

        if !(self.search.discount > 0.0 && self.search.discount <= 1.0) {
            return Err(AiError::InvalidConfig(format!(
                "search.discount ({}) must be in (0, 1]",
                self.search.discount
            )));
        }

        if self.decision.interval_ticks == 0 {
            return Err(AiError::InvalidConfig(
                "decision.interval_ticks must be positive".into(),
            ));
        }

        let sim = &self.simulator;
        if sim.capture_unclaimed_reward <= sim.approach_reward
            || sim.capture_enemy_reward <= sim.approach_reward
        {
            return Err(AiError::InvalidConfig(format!(
                "capture rewards ({}, {}) must exceed approach_reward ({})",
                sim.capture_unclaimed_reward, sim.capture_enemy_reward, sim.approach_reward
            )));
        }

        if sim.capture_enemy_reward - sim.response_weight <= sim.approach_reward {
            return Err(AiError::InvalidConfig(format!(
                "capture_enemy_reward ({}) minus response_weight ({}) must exceed approach_reward ({})",
                sim.capture_enemy_reward, sim.response_weight, sim.approach_reward
            )));
        }

        if sim.goto_progress == 0 {
            return Err(AiError::InvalidConfig(
                "simulator.goto_progress must be positive".into(),
            ));
        }

        for strength in [
            self.executor.unclaimed_attractor_strength,
            self.executor.enemy_attractor_strength,
        ] {
            if !(0.0..=1.0).contains(&strength) {
                return Err(AiError::InvalidConfig(format!(
                    "attractor strength ({}) must be in [0, 1]",
                    strength
                )));
            }
        }

        if self.distance.bound_factor == 0 {
            return Err(AiError::InvalidConfig(
                "distance.bound_factor must be positive".into(),
            ));
        }

        Ok(())
    }
}

/// Load a profile from TOML
///
/// Loads from `data/ai_profiles/{name}.toml`
pub fn load_profile(name: &str) -> Result<AiConfig> {
    let path = profile_path(name);
    let contents = fs::read_to_string(&path)?;

    let mut config = AiConfig::from_toml_str(&contents)?;
    config.name = name.to_string();
    Ok(config)
}

fn profile_path(name: &str) -> PathBuf {
    PathBuf::from("data/ai_profiles").join(format!("{}.toml", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AiConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let config = AiConfig::default();
        assert_eq!(config.search.iterations, 20);
        assert_eq!(config.search.rollout_depth, 5);
        assert_eq!(config.decision.interval_ticks, 100);
        assert_eq!(config.decision.task_timeout_ms, 10_000);
        assert_eq!(config.executor.bridge_depth, 5);
        assert_eq!(config.distance.bound_factor, 2);
    }

    #[test]
    fn test_load_default_profile() {
        let config = load_profile("default").expect("Should load default profile");
        assert_eq!(config.name, "default");
        assert!(config.search.iterations > 0);
    }

    #[test]
    fn test_load_aggressive_profile() {
        let config = load_profile("aggressive").expect("Should load aggressive profile");
        let defaults = AiConfig::default();
        assert!(
            config.executor.enemy_attractor_strength >= defaults.executor.enemy_attractor_strength
        );
        assert!(config.simulator.capture_enemy_reward > defaults.simulator.capture_enemy_reward);
    }

    #[test]
    fn test_missing_profile_is_io_error() {
        let result = load_profile("does_not_exist");
        assert!(matches!(result, Err(AiError::IoError(_))));
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = AiConfig::from_toml_str("[search]\niterations = 200\n").unwrap();
        assert_eq!(config.search.iterations, 200);
        assert_eq!(config.search.rollout_depth, 5);
        assert_eq!(config.executor.bridge_depth, 5);
    }

    #[test]
    fn test_rejects_zero_iterations() {
        let result = AiConfig::from_toml_str("[search]\niterations = 0\n");
        assert!(matches!(result, Err(AiError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_cheap_capture() {
        let mut config = AiConfig::default();
        config.simulator.capture_unclaimed_reward = 0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_strength() {
        let mut config = AiConfig::default();
        config.executor.enemy_attractor_strength = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let result = AiConfig::from_toml_str("[search\niterations = 1");
        assert!(matches!(result, Err(AiError::ConfigParse(_))));
    }
}
