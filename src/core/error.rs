use thiserror::Error;

use crate::core::types::Position;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse profile TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown map symbol {symbol:?} at row {row}, column {column}")]
    MapParse {
        row: usize,
        column: usize,
        symbol: char,
    },

    #[error("Position out of bounds: {0:?}")]
    OutOfBounds(Position),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AiError>;
