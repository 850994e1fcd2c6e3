//! Neural entity recognizer collaborator
//!
//! The engine never runs a model itself. It talks to an external recognizer
//! through [`EntityRecognizer`], which returns spans in the recognizer's own
//! label taxonomy, and the [`NerAdapter`] maps those onto [`EntityKind`].
//! Recognizer offsets count chars by default ([`OffsetUnit`]) and are
//! converted to byte offsets before any slicing.
//!
//! Implementations:
//! - [`HttpRecognizer`] - remote NER service over HTTP
//! - [`DisabledRecognizer`] - always unavailable (pattern-only deployments)

pub mod adapter;
pub mod http;
pub mod retry;

pub use adapter::NerAdapter;
pub use http::HttpRecognizer;
pub use retry::RetryPolicy;

use crate::domain::{EntityKind, RecognizerError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Confidence assigned to recognizer spans that carry no score
pub const DEFAULT_NER_CONFIDENCE: f32 = 0.85;

/// Unit of the offsets a recognizer reports
///
/// spaCy-style services count Unicode scalar values (`char`); services that
/// index the UTF-8 bytes of the request body use `byte`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetUnit {
    /// Unicode scalar values
    #[default]
    Char,
    /// UTF-8 bytes
    Byte,
}

impl std::str::FromStr for OffsetUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "char" => Ok(Self::Char),
            "byte" => Ok(Self::Byte),
            other => Err(format!("unknown offset unit '{other}', expected char or byte")),
        }
    }
}

impl OffsetUnit {
    /// Convert a `start..end` range in this unit to UTF-8 byte offsets
    ///
    /// Returns `None` when the range runs past the end of `text`.
    pub fn to_byte_range(self, text: &str, start: usize, end: usize) -> Option<(usize, usize)> {
        match self {
            Self::Byte => Some((start, end)),
            Self::Char => {
                let boundary = |index: usize| {
                    text.char_indices()
                        .map(|(offset, _)| offset)
                        .chain(std::iter::once(text.len()))
                        .nth(index)
                };
                Some((boundary(start)?, boundary(end)?))
            }
        }
    }
}

/// Span as reported by an external recognizer
///
/// Offsets are in the unit configured by `ner.offset_unit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntity {
    /// Start offset
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// Label in the recognizer's taxonomy (e.g. "GPE")
    pub label: String,
    /// Optional score (0.0 - 1.0)
    #[serde(default, alias = "confidence")]
    pub score: Option<f32>,
}

impl RawEntity {
    /// Create a raw entity without a score
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
            score: None,
        }
    }

    /// Attach a score
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }
}

/// External entity recognizer
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    /// Human-readable backend identifier (e.g. "http", "disabled")
    fn backend_id(&self) -> &str;

    /// Recognize entities in `text`
    async fn recognize(&self, text: &str) -> Result<Vec<RawEntity>, RecognizerError>;
}

/// Recognizer that is never available
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledRecognizer;

#[async_trait]
impl EntityRecognizer for DisabledRecognizer {
    fn backend_id(&self) -> &str {
        "disabled"
    }

    async fn recognize(&self, _text: &str) -> Result<Vec<RawEntity>, RecognizerError> {
        Err(RecognizerError::Unavailable(
            "neural recognizer is disabled".to_string(),
        ))
    }
}

/// Map an external label onto the closed entity taxonomy
///
/// Labels outside the table return `None` and are dropped by the adapter.
pub fn map_label(label: &str) -> Option<EntityKind> {
    match label.trim().to_uppercase().as_str() {
        "PERSON" => Some(EntityKind::Person),
        "GPE" | "LOC" => Some(EntityKind::Location),
        "ORG" => Some(EntityKind::Organization),
        "DATE" | "TIME" => Some(EntityKind::DateTime),
        "MONEY" => Some(EntityKind::Money),
        "CARDINAL" => Some(EntityKind::Number),
        _ => None,
    }
}
