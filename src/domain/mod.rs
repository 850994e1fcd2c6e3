//! Domain models and types.
//!
//! The domain layer provides:
//! - **Entity taxonomy** ([`EntityKind`], [`SourceKind`])
//! - **Candidate spans** ([`CandidateSpan`])
//! - **Error types** ([`RedactorError`], [`RecognizerError`], [`RedactionError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! ```rust
//! use pii_redactor::domain::{EntityKind, Result};
//!
//! fn parse_kind(name: &str) -> Result<EntityKind> {
//!     name.parse()
//! }
//!
//! assert_eq!(parse_kind("US_SSN").unwrap(), EntityKind::UsSsn);
//! assert!(parse_kind("NOT_A_KIND").is_err());
//! ```

pub mod entity;
pub mod errors;
pub mod result;

pub use entity::{CandidateSpan, EntityKind, SourceKind};
pub use errors::{RecognizerError, RedactionError, RedactorError};
pub use result::Result;
