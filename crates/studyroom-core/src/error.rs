//! Core error types for studyroom-core.
//!
//! Each concern gets its own thiserror enum; [`CoreError`] unifies them for
//! callers that don't care which layer failed.

use std::path::PathBuf;
use thiserror::Error;

use crate::quiz::QuestionType;

/// Core error type for studyroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An operation that is not legal in the current timer or quiz state
    #[error(transparent)]
    IllegalTransition(#[from] TransitionError),

    /// Question generation errors
    #[error("Question generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raised by a timer or quiz state when the requested operation is not
/// permitted from that state. The messages are part of the public contract.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    // ── Pomodoro timer ───────────────────────────────────────────────
    #[error("Cannot pause when idle")]
    PauseWhenIdle,
    #[error("Cannot resume when idle")]
    ResumeWhenIdle,
    #[error("Cannot skip when idle")]
    SkipWhenIdle,
    #[error("Timer already running")]
    TimerAlreadyRunning,
    #[error("Timer already started")]
    TimerAlreadyStarted,

    // ── Quiz ─────────────────────────────────────────────────────────
    #[error("Cannot answer questions before starting quiz")]
    AnswerBeforeStart,
    #[error("Cannot complete quiz before starting")]
    CompleteBeforeStart,
    #[error("Cannot review quiz before starting")]
    ReviewBeforeStart,
    #[error("Quiz already started")]
    QuizAlreadyStarted,
    #[error("Cannot complete quiz with unanswered questions")]
    UnansweredQuestions,
    #[error("Cannot review quiz while in progress")]
    ReviewWhileInProgress,
    #[error("Cannot restart completed quiz")]
    RestartCompletedQuiz,
    #[error("Cannot answer completed quiz")]
    AnswerCompletedQuiz,
    #[error("Quiz already completed")]
    QuizAlreadyCompleted,
    #[error("Cannot start while reviewing")]
    StartWhileReviewing,
    #[error("Cannot change answers while reviewing")]
    AnswerWhileReviewing,
}

/// Question generation errors.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// No registered strategy supports the requested type
    #[error("No strategy found for question type: {question_type}")]
    UnknownStrategy { question_type: QuestionType },

    /// Every supporting strategy was unavailable, failed or returned nothing
    #[error("No strategy produced questions of type: {question_type}")]
    StrategiesExhausted { question_type: QuestionType },

    /// The AI client has no credentials or transport configured
    #[error("AI client not configured")]
    AiUnavailable,

    /// The AI request failed at the transport level or returned a bad status
    #[error("AI request failed: {0}")]
    AiRequest(String),

    /// The AI response could not be interpreted
    #[error("Unexpected AI response: {0}")]
    AiResponse(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A field that must be strictly positive was zero
    #[error("'{field}' must be a positive integer")]
    NotPositive { field: &'static str },

    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },

    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::AiRequest(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_messages_are_exact() {
        assert_eq!(TransitionError::PauseWhenIdle.to_string(), "Cannot pause when idle");
        assert_eq!(TransitionError::TimerAlreadyStarted.to_string(), "Timer already started");
        assert_eq!(
            TransitionError::AnswerBeforeStart.to_string(),
            "Cannot answer questions before starting quiz"
        );
    }

    #[test]
    fn core_error_is_transparent_for_transitions() {
        let err: CoreError = TransitionError::SkipWhenIdle.into();
        assert_eq!(err.to_string(), "Cannot skip when idle");
    }

    #[test]
    fn unknown_strategy_names_the_type() {
        let err = GenerationError::UnknownStrategy {
            question_type: QuestionType::FillInTheBlank,
        };
        assert_eq!(
            err.to_string(),
            "No strategy found for question type: FILL_IN_THE_BLANK"
        );
    }
}
