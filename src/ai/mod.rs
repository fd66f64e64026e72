//! Faction AI for the rig-capture game
//!
//! Architecture: one controller per faction
//! - `DistanceField` turns the map into per-rig walking distances
//! - `AiState` + `HydSimulator` give the search a pure model to play out
//! - `AiController` runs the decision cycle and owns the active `Task`
//! - `TaskExecutor` turns the chosen action into attractors and bridge marks

pub mod controller;
pub mod distance;
pub mod events;
pub mod executor;
pub mod simulator;
pub mod state;
pub mod task;

pub use controller::{AiController, CycleOutcome, IdleReason};
pub use distance::{DistanceField, FactionView, RigCandidate};
pub use events::{ChangeKind, RigEvent};
pub use executor::TaskExecutor;
pub use simulator::HydSimulator;
pub use state::{ActionKind, AiAction, AiState, UNCONTESTED};
pub use task::{StaleReason, Task, TaskKind};
