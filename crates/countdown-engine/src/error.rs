//! Error types for countdown-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Unparseable date: {0}")]
    Unparseable(String),

    #[error("No event matches selector: {0}")]
    NoMatch(String),

    #[error("No eligible events")]
    EmptySet,

    #[error("Invalid row: {0}")]
    InvalidRow(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
