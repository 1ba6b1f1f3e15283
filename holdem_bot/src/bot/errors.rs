//! Bot error types.

use crate::game::entities::CardParseError;
use thiserror::Error;

/// Bot engine errors
#[derive(Debug, Error)]
pub enum BotError {
    /// Configuration value out of range
    #[error("Invalid bot configuration: {0}")]
    InvalidConfig(String),

    /// Configuration document could not be parsed
    #[error("Failed to parse bot configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Card code could not be read
    #[error("Invalid card: {0}")]
    Card(#[from] CardParseError),

    /// Scheduler actor has stopped and no longer accepts actions
    #[error("Bot action scheduler is closed")]
    SchedulerClosed,
}

/// Result type for bot operations
pub type BotResult<T> = Result<T, BotError>;
