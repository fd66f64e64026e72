pub mod config;
pub mod error;
pub mod types;

pub use config::{load_profile, AiConfig};
pub use error::{AiError, Result};
pub use types::{Faction, Millis, Position, Tick};
