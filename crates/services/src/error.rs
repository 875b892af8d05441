//! Shared error types for the services crate.

use thiserror::Error;

use interview_core::model::{CategoryFilter, EvaluationError, SummaryError};

use crate::sessions::SessionStage;

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The operation is not allowed in the session's current stage.
    #[error("cannot {operation} while the session is {stage}")]
    InvalidState {
        operation: &'static str,
        stage: SessionStage,
    },

    #[error("no questions available for category filter `{filter}`")]
    EmptyQuestionPool { filter: CategoryFilter },

    #[error("question count must be at least 1")]
    InvalidQuestionCount,

    /// Rejected score input; the session is unchanged and the caller may resubmit.
    #[error(transparent)]
    InvalidScore(#[from] EvaluationError),

    #[error(transparent)]
    Summary(#[from] SummaryError),
}

impl SessionError {
    /// True for errors the caller can fix by resubmitting different input.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SessionError::InvalidScore(_))
    }
}
