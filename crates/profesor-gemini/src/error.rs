//! Errors raised while talking to the Gemini API.

use profesor_core::{GenerationErrorKind, ProfesorError};
use reqwest::StatusCode;
use thiserror::Error;

/// A specialized `Result` type for Gemini client operations.
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Errors emitted by [`crate::GeminiClient`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GeminiError {
    /// The request could not be sent or the response body could not be read.
    #[error("request to Gemini failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Gemini answered with a non-success status.
    #[error("Gemini returned status {status}: {body}")]
    HttpStatus {
        /// The HTTP status.
        status: StatusCode,
        /// Response body, truncated for logging.
        body: String,
    },

    /// The response carried no candidate text.
    #[error("Gemini returned an empty response: {0}")]
    EmptyResponse(&'static str),

    /// The candidate text is not a course-shaped JSON document.
    #[error("Gemini response is not a valid course: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// The input or the parsed course was rejected by the core crate.
    #[error(transparent)]
    Course(#[from] ProfesorError),
}

impl GeminiError {
    /// Classifies this error for the core error model.
    ///
    /// Returns `None` for errors that already belong to the core crate.
    #[must_use]
    pub fn kind(&self) -> Option<GenerationErrorKind> {
        match self {
            Self::Transport(e) if e.is_decode() => Some(GenerationErrorKind::Parse),
            Self::Transport(_) => Some(GenerationErrorKind::Network),
            Self::HttpStatus { status, .. } => Some(kind_for_status(*status)),
            Self::EmptyResponse(_) => Some(GenerationErrorKind::EmptyResponse),
            Self::InvalidPayload(_) => Some(GenerationErrorKind::Parse),
            Self::Course(_) => None,
        }
    }
}

/// Maps a non-success HTTP status to a generation error kind.
#[must_use]
pub fn kind_for_status(status: StatusCode) -> GenerationErrorKind {
    match status.as_u16() {
        401 | 403 => GenerationErrorKind::Authentication,
        429 => GenerationErrorKind::RateLimit,
        500..=599 => GenerationErrorKind::Server,
        _ => GenerationErrorKind::Other,
    }
}

impl From<GeminiError> for ProfesorError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::Course(inner) => inner,
            other => Self::generation(
                other.kind().unwrap_or(GenerationErrorKind::Other),
                other.to_string(),
            ),
        }
    }
}
