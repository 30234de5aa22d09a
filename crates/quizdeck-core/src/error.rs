//! Client error types.
//!
//! These error types represent failures when talking to the quiz service or
//! when a response cannot be turned into something a view can show.
//! Defined in `quizdeck-core` so the state machines and the CLI can classify
//! failures without string matching.

use thiserror::Error;

/// Errors that can occur when fetching or submitting quiz content.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The request never reached the server (connection refused, DNS, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// The response was valid but contained nothing to show.
    #[error("no {0} available")]
    EmptyResult(&'static str),

    /// The response body did not match the expected schema.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A request was rejected before it was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl QuizError {
    /// Returns `true` if the view should render an empty state rather than an error.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, QuizError::EmptyResult(_))
    }

    /// Returns `true` if repeating the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            QuizError::Network(_) => true,
            QuizError::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The user-facing inline message a view shows for this failure.
    pub fn user_message(&self, what: &str) -> String {
        match self {
            QuizError::EmptyResult(item) => format!("No {item} available"),
            QuizError::InvalidRequest(reason) => format!("Cannot {what}: {reason}"),
            _ if self.is_transient() => format!("Failed to {what}. Please try again."),
            _ => format!("Failed to {what}"),
        }
    }
}
