//! Error types for remindcal.

use thiserror::Error;

/// Errors that can occur in calendar, event and reminder operations.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Invalid title: expected 3-50 letters, digits, spaces, commas or periods")]
    InvalidTitle,

    #[error("Invalid date/time: expected format YYYY-MM-DD HH:MM:SS")]
    InvalidDate,

    #[error("Invalid priority '{0}': expected low, medium or high")]
    InvalidPriority(String),

    #[error("Event not found: id=\"{0}\"")]
    EventNotFound(String),

    #[error("Event has no reminder: id=\"{0}\"")]
    ReminderNotFound(String),

    #[error("Reminder time cannot be empty")]
    EmptyReminderTime,

    #[error("Reminder duration must be greater than zero")]
    ZeroDuration,

    #[error("Reminder message cannot be empty")]
    EmptyMessage,

    #[error("Reminder message is too long (max {max} characters)")]
    MessageTooLong { max: usize },

    #[error("Reminder time cannot be zero")]
    ZeroTime,

    #[error("Reminder time must be in the future")]
    PastTime,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for remindcal operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
