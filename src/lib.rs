// PII Redactor - Sensitive-entity detection and redaction engine
// Copyright (c) 2025 PII Redactor Contributors
// Licensed under the MIT License

//! # PII Redactor
//!
//! Detects spans of sensitive personal information in free text and produces
//! a redacted copy plus a structured report.
//!
//! ## Overview
//!
//! Candidate spans come from two sources that run concurrently:
//! - **Patterns**: a TOML pattern library compiled once, filtered by
//!   structural validation rules
//! - **Named-entity recognizer**: an optional external service; any failure
//!   degrades to pattern-only detection
//!
//! Overlapping candidates are resolved deterministically (pattern over
//! recognizer, then priority, then confidence) and the accepted spans are
//! replaced with `<KIND>` placeholders.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`detection`] - Candidate sources, resolver, redactor and the engine
//! - [`domain`] - Entity taxonomy, spans and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pii_redactor::config::load_config_or_default;
//! use pii_redactor::detection::DetectionEngine;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("pii-redactor.toml")?;
//!     let engine = DetectionEngine::from_config(&config.detection, &config.ner)?;
//!
//!     let result = engine.detect("SSN: 123-45-6789").await;
//!     println!("{}", result.redacted_text);
//!     println!("{}", result.format_json()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Construction errors use [`domain::RedactorError`]. Detection itself never
//! returns an error: an unexpected failure yields a
//! [`detection::RedactionResult`] with `success = false` and the original
//! text unchanged.
//!
//! ## Logging
//!
//! Log records carry lengths, counts, kinds and offsets. The text being
//! processed is never logged.

pub mod cli;
pub mod config;
pub mod detection;
pub mod domain;
pub mod logging;
