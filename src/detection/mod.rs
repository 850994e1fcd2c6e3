//! Sensitive-entity detection and redaction
//!
//! Leaf-first:
//! - [`patterns`] / [`generator`] - pattern table and pattern candidates
//! - [`validation`] - structural filters applied to pattern matches
//! - [`ner`] - external recognizer adapter
//! - [`resolver`] - deterministic overlap resolution
//! - [`redactor`] - placeholder substitution
//! - [`summary`] / [`report`] - per-kind counts and the request result
//! - [`engine`] - the pipeline tying everything together
//!
//! # Example
//!
//! ```no_run
//! use pii_redactor::detection::DetectionEngine;
//!
//! # async fn example() -> pii_redactor::domain::Result<()> {
//! let engine = DetectionEngine::pattern_only()?;
//! let result = engine.detect("Call me at 555-123-4567").await;
//! assert_eq!(result.redacted_text, "Call me at <PHONE_NUMBER>");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod generator;
pub mod ner;
pub mod patterns;
pub mod redactor;
pub mod report;
pub mod resolver;
pub mod source;
pub mod summary;
pub mod validation;

pub use config::{DetectionConfig, NerConfig, RetryConfig};
pub use engine::{DetectOptions, DetectionEngine};
pub use generator::PatternGenerator;
pub use ner::{
    DisabledRecognizer, EntityRecognizer, HttpRecognizer, NerAdapter, OffsetUnit, RawEntity,
};
pub use patterns::PatternRegistry;
pub use redactor::Redactor;
pub use report::RedactionResult;
pub use resolver::{AcceptedSet, ConflictResolver, PriorityTable};
pub use source::{CandidateSource, SourceContext};
pub use summary::summarize;
pub use validation::{ValidationRule, ValidationRules};
