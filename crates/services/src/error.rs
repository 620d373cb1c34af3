//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuizValidationError, TakeSessionError};
use storage::repository::StorageError;

/// Errors from talking to the backend API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("authentication required")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// The backend rejected a submission because this quiz was already
    /// completed. Callers treat it like a success that happened earlier.
    #[error("{message}")]
    AlreadyCompleted { message: String },

    #[error("backend returned {status}: {message}")]
    Backend {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Errors emitted by `TakeQuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TakeQuizError {
    /// The fetched payload cannot back a session. Fatal: the caller leaves
    /// the take screen instead of retrying.
    #[error("invalid quiz payload: {0}")]
    InvalidQuiz(#[from] QuizValidationError),

    #[error("not every question has an answer")]
    NotAllAnswered,

    #[error(transparent)]
    Session(#[from] TakeSessionError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl TakeQuizError {
    /// True for failures that end the session rather than invite a retry.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TakeQuizError::InvalidQuiz(_) | TakeQuizError::Api(ApiError::NotFound)
        )
    }
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
