//! Error types for slide aggregation and presentation building.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Prefix shared by every [`ContextError`] message.
pub const CONTEXT_PREFIX: &str = "Cannot create object within existing object context";

/// Usage errors raised by the slide aggregator's scope bookkeeping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// A presentation is already open on this session lock.
    #[error("Cannot create object within existing object context\n\n\tPresentation object already exists")]
    SessionAlreadyOpen,

    /// A slide operation ran without an open presentation.
    #[error("Cannot create object within existing object context\n\n\tNo presentation is open")]
    NoActiveSession,

    /// Nested slide scopes went deeper than the allowed maximum.
    #[error("Cannot create object within existing object context\n\n\tMaximum allowable slide depth exceeded (depth {depth}). Slide will be ignored.")]
    DepthExceeded { depth: u32 },
}

/// Errors that can occur while building or capturing notebook output.
#[derive(Error, Debug)]
pub enum Error {
    /// Scope bookkeeping was used incorrectly.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document template could not render the deck.
    #[error("Template error: {0}")]
    Template(String),

    /// The figure renderer failed to produce HTML.
    #[error("Figure rendering error: {0}")]
    Figure(String),

    /// Writing slide text failed.
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Invalid JSON configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown output destination name.
    #[error("Choose one of the following streams:\n\t\"console\"\n\t\"file\"\n\t\"buffer\" (got \"{0}\")")]
    InvalidDestination(String),
}

impl Error {
    /// Short label for the error kind, used when reporting contained failures.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Context(_) => "ContextError",
            Error::Io(_) => "IoError",
            Error::Template(_) => "TemplateError",
            Error::Figure(_) => "FigureError",
            Error::Format(_) => "FormatError",
            Error::Json(_) => "JsonError",
            Error::InvalidDestination(_) => "DestinationError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_error_message_has_prefix() {
        let err = ContextError::DepthExceeded { depth: 3 };
        let msg = err.to_string();
        assert!(msg.starts_with(CONTEXT_PREFIX));
        assert!(msg.contains("Maximum allowable slide depth exceeded"));
    }

    #[test]
    fn test_error_kind() {
        let err: Error = ContextError::SessionAlreadyOpen.into();
        assert_eq!(err.kind(), "ContextError");
        assert_eq!(Error::Template("x".into()).kind(), "TemplateError");
        assert_eq!(
            Error::InvalidDestination("ipynb".into()).kind(),
            "DestinationError"
        );
    }
}
