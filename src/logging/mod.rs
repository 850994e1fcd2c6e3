//! Logging and observability
//!
//! Structured logging with:
//! - Plain or JSON console output
//! - Configurable log levels
//! - Local file logging with rotation
//!
//! Log records carry lengths, counts, kinds and offsets. The text being
//! processed is never a log field.
//!
//! # Example
//!
//! ```no_run
//! use pii_redactor::config::LoggingConfig;
//! use pii_redactor::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of a scan
///
/// # Example
///
/// ```no_run
/// use pii_redactor::log_scan_start;
///
/// log_scan_start!("stdin", 1024);
/// ```
#[macro_export]
macro_rules! log_scan_start {
    ($input:expr, $length:expr) => {
        tracing::info!(input = $input, text_length = $length, "Starting scan");
    };
}

/// Log the completion of a scan
///
/// # Example
///
/// ```no_run
/// use pii_redactor::log_scan_complete;
/// use std::time::Duration;
///
/// log_scan_complete!(3, true, Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_scan_complete {
    ($entities:expr, $success:expr, $duration:expr) => {
        tracing::info!(
            entities = $entities,
            success = $success,
            duration_ms = $duration.as_millis() as u64,
            "Scan completed"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use pii_redactor::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, "Connection reset");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = %$reason,
            "Retrying operation"
        );
    };
}
