//! Configuration management
//!
//! TOML configuration with:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PII_REDACTOR_<SECTION>_<KEY>` environment overrides
//! - Defaults for every setting, so an empty file is valid
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pii_redactor::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("pii-redactor.toml")?;
//! println!("NER enabled: {}", config.ner.enabled);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`DetectionConfig`] - pattern library, priority and validation tables
//! - [`NerConfig`] - external recognizer endpoint, timeout and retries
//! - [`LoggingConfig`] - file output and JSON console output
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [detection.priority]
//! US_PASSPORT = 3
//! US_DRIVER_LICENSE = 2
//!
//! [ner]
//! enabled = true
//! endpoint = "http://localhost:8000/ner"
//! api_key = "${PII_REDACTOR_NER_API_KEY}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use crate::detection::{DetectionConfig, NerConfig, RetryConfig};
pub use loader::{load_config, load_config_or_default, parse_config};
pub use schema::{ApplicationConfig, LoggingConfig, RedactorConfig};
pub use secret::{secret_string, SecretString, SecretValue};
