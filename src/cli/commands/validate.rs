//! Validate config command implementation
//!
//! Loads the configuration, compiles the pattern library it points at and
//! prints a summary. Secrets are reported as configured or not, never shown.

use crate::config::{load_config, RedactorConfig};
use crate::detection::PatternRegistry;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config runs validation after env overrides
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let registry = match compile_patterns(&config) {
            Ok(r) => {
                println!("✅ Pattern library compiled");
                r
            }
            Err(e) => {
                println!("❌ Pattern library failed to compile");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        print_summary(&config, &registry);
        Ok(0)
    }
}

fn compile_patterns(config: &RedactorConfig) -> crate::domain::Result<PatternRegistry> {
    let detection = &config.detection;
    match detection.pattern_library {
        Some(ref path) => PatternRegistry::from_file(path, detection.default_confidence),
        None => PatternRegistry::default_patterns_with_confidence(detection.default_confidence),
    }
}

fn print_summary(config: &RedactorConfig, registry: &PatternRegistry) {
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);

    match config.detection.pattern_library {
        Some(ref path) => println!("  Pattern Library: {}", path.display()),
        None => println!("  Pattern Library: built-in"),
    }
    println!(
        "  Patterns: {} across {} entity kinds",
        registry.pattern_count(),
        registry.kind_count()
    );
    println!(
        "  Default Confidence: {:.2}",
        config.detection.default_confidence
    );

    if config.detection.priority.is_empty() {
        println!("  Priorities: none");
    } else {
        println!("  Priorities:");
        for (kind, priority) in &config.detection.priority {
            println!("    {kind}: {priority}");
        }
    }

    if !config.detection.validation.is_empty() {
        println!("  Validation Overrides:");
        for (kind, rule) in &config.detection.validation {
            println!("    {kind}: {rule:?}");
        }
    }

    let ner = &config.ner;
    println!("  NER Enabled: {}", ner.enabled);
    if ner.enabled {
        println!(
            "  NER Endpoint: {}",
            ner.endpoint.as_deref().unwrap_or("<unset>")
        );
        println!("  NER Timeout: {}ms", ner.timeout_ms);
        println!("  NER Offset Unit: {:?}", ner.offset_unit);
        println!("  NER Retry Attempts: {}", ner.retry.max_attempts);
        println!(
            "  NER API Key: {}",
            if ner.api_key.is_some() {
                "configured"
            } else {
                "not set"
            }
        );
    }

    let logging = &config.logging;
    println!("  JSON Logs: {}", logging.json);
    if logging.local_enabled {
        println!(
            "  Log Files: {} ({})",
            logging.local_path, logging.local_rotation
        );
    }
    println!();
}
