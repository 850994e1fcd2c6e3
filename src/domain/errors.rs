//! Domain error types
//!
//! Error hierarchy for the redaction engine. Errors are domain-specific and
//! don't expose third-party types.

use thiserror::Error;

/// Main error type
///
/// Configuration errors happen only at startup. Everything raised while a
/// request is in flight is absorbed by the engine and reported as a degraded
/// [`RedactionResult`](crate::detection::RedactionResult).
#[derive(Debug, Error)]
pub enum RedactorError {
    /// Configuration-related errors (bad pattern, bad table, bad file)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Redaction pass errors
    #[error("Redaction error: {0}")]
    Redaction(#[from] RedactionError),

    /// Broken invariant inside the detection pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

/// Entity recognizer errors
///
/// Every variant is recoverable: the NER adapter logs it and the request
/// continues with pattern candidates only.
#[derive(Debug, Error)]
pub enum RecognizerError {
    /// Recognizer is disabled or not reachable
    #[error("Recognizer unavailable: {0}")]
    Unavailable(String),

    /// Network/connection failure
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Non-success HTTP status
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// Response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Attempt or call exceeded its deadline
    #[error("Recognizer timed out after {0} ms")]
    Timeout(u64),

    /// Caller cancelled the request
    #[error("Recognizer call cancelled")]
    Cancelled,

    /// Recognizer implementation panicked (payload discarded, it may quote input)
    #[error("Recognizer panicked")]
    Panicked,
}

impl RecognizerError {
    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout(_) => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            Self::Unavailable(_)
            | Self::InvalidResponse(_)
            | Self::Cancelled
            | Self::Panicked => false,
        }
    }
}

/// Errors raised while splicing placeholders into text
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RedactionError {
    /// Span extends past the end of the text
    #[error("span {start}..{end} is out of bounds for text of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    /// Span does not fall on character boundaries
    #[error("span {start}..{end} does not fall on character boundaries")]
    NotCharBoundary { start: usize, end: usize },

    /// Span is empty or reversed
    #[error("span {start}..{end} is empty")]
    Empty { start: usize, end: usize },

    /// Two accepted spans overlap
    #[error("span {start}..{end} overlaps span starting at {next_start}")]
    Overlap {
        start: usize,
        end: usize,
        next_start: usize,
    },
}
