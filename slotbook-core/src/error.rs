//! Error types for slotbook.

use thiserror::Error;

use crate::validate::Violation;

/// Errors that can occur in slotbook operations.
#[derive(Error, Debug)]
pub enum SlotbookError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid time '{0}'. Expected HH:MM or HH:MM:SS")]
    InvalidTime(String),

    #[error("Invalid weekday '{0}'")]
    InvalidWeekday(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid month {month}/{year}")]
    InvalidMonth { month: u32, year: i32 },

    #[error("Schedule has {} validation error(s)", .0.len())]
    Validation(Vec<Violation>),

    #[error("A save is already in progress")]
    SaveInFlight,

    #[error("No schedule loaded")]
    NotLoaded,

    /// The last save succeeded but the schedule has not been fetched again
    /// yet, so local drafts may already exist on the server.
    #[error("Schedule was saved but not reloaded; reload before saving again")]
    ReloadRequired,

    #[error("Request failed: {0}")]
    Transport(String),

    /// The server refused the request. The message is passed through verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SlotbookError {
    fn from(err: reqwest::Error) -> Self {
        SlotbookError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for SlotbookError {
    fn from(err: serde_json::Error) -> Self {
        SlotbookError::Serialization(err.to_string())
    }
}

/// Result type alias for slotbook operations.
pub type SlotbookResult<T> = Result<T, SlotbookError>;
