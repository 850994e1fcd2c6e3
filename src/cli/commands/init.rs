//! Init command implementation
//!
//! Writes a commented sample configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = crate::cli::DEFAULT_CONFIG_PATH)]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

/// Sample configuration; every value shown is the built-in default
pub const SAMPLE_CONFIG: &str = r#"# PII Redactor Configuration File
#
# Every setting has a default, so any section may be omitted.
# Values may reference environment variables with ${VAR_NAME}, and any
# key can be overridden with PII_REDACTOR_<SECTION>_<KEY>.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Detection
# ============================================================================
[detection]
# Confidence for patterns that declare none (0.0 - 1.0)
default_confidence = 0.95

# Custom pattern library (built-in library when unset)
# pattern_library = "patterns/custom.toml"

# Tie-break priority per entity kind; higher wins, absent kinds rank 0
[detection.priority]
US_PASSPORT = 3
US_DRIVER_LICENSE = 2

# Structural rules applied to pattern matches, on top of the built-in ones
# [detection.validation]
# CREDIT_CARD = { min_digits = 13 }
# PHONE_NUMBER = { digit_count_in = [10, 11] }
# US_DRIVER_LICENSE = { min_length = 4 }

# ============================================================================
# External Named-Entity Recognizer
# ============================================================================
[ner]
# Pattern-only detection when disabled
enabled = false

# HTTP endpoint receiving POST {"text": "..."}
# endpoint = "http://localhost:8000/ner"

# Bearer token (use an environment variable)
# api_key = "${PII_REDACTOR_NER_API_KEY}"

# Deadline for one recognize call, retries included; each attempt gets an
# equal share
timeout_ms = 2000

# Confidence for recognizer spans without a score
default_confidence = 0.85

# Unit of the recognizer's span offsets: "char" (spaCy-style) or "byte"
offset_unit = "char"

[ner.retry]
max_attempts = 3
initial_delay_ms = 100
max_delay_ms = 1000
backoff_multiplier = 2.0
jitter = true

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON console output (stderr)
json = false

# Rolling JSON log files
local_enabled = false
local_path = "./logs"

# Rotation (daily, hourly, never)
local_rotation = "daily"
"#;

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing PII Redactor configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, SAMPLE_CONFIG) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. To use a recognizer, set ner.enabled and ner.endpoint");
                println!("  3. Put the recognizer token in PII_REDACTOR_NER_API_KEY");
                println!("  4. Validate configuration: pii-redactor validate-config");
                println!("  5. Scan text: echo 'call 555-123-4567' | pii-redactor scan");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }
}
