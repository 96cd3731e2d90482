//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Busy source '{source_name}' failed: {message}")]
    Source {
        source_name: String,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, SlotError>;
