//! Error types for ProfesorIA.
//!
//! This module defines the error hierarchy shared by every crate in the
//! workspace: configuration loading, learner input validation, course
//! generation, payload validation, and the navigation/quiz state machines.

use std::path::PathBuf;

/// A specialized `Result` type for ProfesorIA operations.
pub type Result<T> = std::result::Result<T, ProfesorError>;

/// The one message shown to the learner when a course cannot be generated.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Hubo un error al conectar con el ProfesorIA. Por favor, intenta de nuevo.";

/// Errors that can occur while building or browsing a course.
///
/// Error variants are organized by subsystem and include actionable suggestions
/// where possible to help users resolve issues.
#[derive(Debug, thiserror::Error)]
pub enum ProfesorError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your profesor.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    /// The environment variable holding the API key is unset or blank.
    #[error("API key not found in environment variable '{env_var}'\n\nSuggestion: Export {env_var}=<your key> or change 'apiKeyEnv' in profesor.json")]
    MissingApiKey {
        /// Name of the environment variable that was consulted.
        env_var: String,
    },

    // ========================================================================
    // Learner Input Errors
    // ========================================================================
    /// A required free-text field of the course request is blank.
    #[error("Missing required field '{field}'\n\nSuggestion: Fill in every field of the course form")]
    MissingField {
        /// Name of the blank field.
        field: &'static str,
    },

    // ========================================================================
    // Generation Errors
    // ========================================================================
    /// The generation request failed (transport, status, empty body, parse).
    #[error("Course generation failed ({kind}): {message}\n\nSuggestion: {suggestion}")]
    Generation {
        /// The kind of failure.
        kind: GenerationErrorKind,
        /// Detailed error message.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    /// The generated payload parsed but violates a course invariant.
    #[error("Malformed course at {location}: {message}")]
    MalformedCourse {
        /// Where in the course the problem was found (e.g. `units[2].lessons[0]`).
        location: String,
        /// Description of the violation.
        message: String,
    },

    /// A generation request is already pending for this session.
    #[error("A course is already being generated\n\nSuggestion: Wait for the current request to finish")]
    RequestInFlight,

    // ========================================================================
    // Session / Navigation Errors
    // ========================================================================
    /// The operation needs a loaded course but the session is at home.
    #[error("No course loaded\n\nSuggestion: Create a course first")]
    NoCourseLoaded,

    /// Invalid state transition attempted.
    #[error("Invalid state transition: cannot go from {from} to {to}")]
    InvalidStateTransition {
        /// The current state.
        from: String,
        /// The attempted target state.
        to: String,
    },

    /// A lesson address does not exist in the loaded course.
    #[error("Lesson {unit}.{lesson} does not exist in this course")]
    LessonOutOfRange {
        /// Zero-based unit index.
        unit: usize,
        /// Zero-based lesson index.
        lesson: usize,
    },

    // ========================================================================
    // Quiz Errors
    // ========================================================================
    /// Selection refers to a question or option that does not exist.
    #[error("Quiz selection out of range: question {question}, option {option}")]
    QuizSelectionOutOfRange {
        /// Zero-based question index.
        question: usize,
        /// Zero-based option index.
        option: usize,
    },

    /// Results were already revealed; answers can no longer change.
    #[error("Quiz answers are locked after revealing the results")]
    QuizLocked,

    /// Reveal requested before every question has an answer.
    #[error("Quiz incomplete: {answered} of {total} questions answered")]
    QuizIncomplete {
        /// Number of questions with a selection.
        answered: usize,
        /// Number of questions in the quiz.
        total: usize,
    },

    /// The quiz id does not belong to the loaded course.
    #[error("Unknown quiz: {0}")]
    UnknownQuiz(String),

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Categories of generation failures for structured error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorKind {
    /// Authentication failure (invalid API key, expired credentials).
    Authentication,
    /// Rate limit exceeded.
    RateLimit,
    /// Server error (5xx responses).
    Server,
    /// Network connectivity issues.
    Network,
    /// The response carried no usable text.
    EmptyResponse,
    /// The response text was not a course-shaped JSON document.
    Parse,
    /// Other unclassified errors.
    Other,
}

impl std::fmt::Display for GenerationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::RateLimit => write!(f, "rate_limit"),
            Self::Server => write!(f, "server"),
            Self::Network => write!(f, "network"),
            Self::EmptyResponse => write!(f, "empty_response"),
            Self::Parse => write!(f, "parse"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl GenerationErrorKind {
    /// Returns a suggestion message for this error kind.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::Authentication => "Check your API key or credentials",
            Self::RateLimit => "Wait a moment before creating another course",
            Self::Server => "Try again later; the generation service may be experiencing issues",
            Self::Network => "Check your network connection",
            Self::EmptyResponse | Self::Parse => {
                "Try again; the model returned an unusable course"
            }
            Self::Other => "Check the generation provider's status page",
        }
    }
}

impl ProfesorError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `Generation` error with automatic suggestion based on kind.
    #[must_use]
    pub fn generation(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        let suggestion = kind.suggestion().to_string();
        Self::Generation {
            kind,
            message: message.into(),
            suggestion,
        }
    }

    /// Creates a new `MalformedCourse` error.
    #[must_use]
    pub fn malformed(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedCourse {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Creates a new `InvalidStateTransition` error.
    #[must_use]
    pub fn invalid_transition(from: impl std::fmt::Display, to: impl std::fmt::Display) -> Self {
        Self::InvalidStateTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Returns `true` if this error means a course could not be produced.
    ///
    /// These failures are all surfaced to the learner with the same generic
    /// message; see [`ProfesorError::user_message`].
    #[must_use]
    pub const fn is_generation_failure(&self) -> bool {
        matches!(self, Self::Generation { .. } | Self::MalformedCourse { .. })
    }

    /// Returns `true` if this error is fatal and requires immediate termination.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigParseError { .. }
                | Self::ConfigValidationError { .. }
                | Self::MissingApiKey { .. }
        )
    }

    /// Returns the text to show the learner for this error.
    ///
    /// Generation failures collapse into one generic message; everything
    /// else uses its display form.
    #[must_use]
    pub fn user_message(&self) -> String {
        if self.is_generation_failure() {
            GENERATION_FAILED_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}
