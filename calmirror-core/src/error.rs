//! Error types for calmirror.

use thiserror::Error;

/// Errors that can occur while mirroring a calendar.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalMirrorError {
    #[error("Missing or invalid configuration: {0}")]
    Config(String),

    #[error("Calendar not found: {0}")]
    CalendarNotFound(String),

    #[error("Remote call failed: {0}")]
    Remote(String),

    #[error("{failed} of {attempted} calendar mutations failed, first error: {first}")]
    MutationsFailed {
        failed: usize,
        attempted: usize,
        first: String,
    },
}

impl CalMirrorError {
    /// Whether a whole-run retry has any chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        !self.is_caller_error()
    }

    /// Errors caused by the trigger parameters rather than the remote side.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            CalMirrorError::Config(_) | CalMirrorError::CalendarNotFound(_)
        )
    }
}

/// Result type alias for calmirror operations.
pub type CalMirrorResult<T> = Result<T, CalMirrorError>;
