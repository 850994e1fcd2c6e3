//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables hold ENV_MUTEX to avoid
//! interference between tests.

use pii_redactor::config::{load_config, load_config_or_default, parse_config};
use pii_redactor::detection::{DetectionEngine, OffsetUnit, ValidationRule};
use pii_redactor::domain::EntityKind;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("PII_REDACTOR_APPLICATION_LOG_LEVEL");
    std::env::remove_var("PII_REDACTOR_DETECTION_DEFAULT_CONFIDENCE");
    std::env::remove_var("PII_REDACTOR_NER_ENABLED");
    std::env::remove_var("PII_REDACTOR_NER_ENDPOINT");
    std::env::remove_var("PII_REDACTOR_NER_API_KEY");
    std::env::remove_var("PII_REDACTOR_NER_TIMEOUT_MS");
    std::env::remove_var("PII_REDACTOR_NER_OFFSET_UNIT");
    std::env::remove_var("PII_REDACTOR_LOGGING_JSON");
    std::env::remove_var("TEST_NER_TOKEN");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_NER_TOKEN", "token-from-env");

    let file = write_config(
        r#"
[application]
log_level = "debug"

[detection]
default_confidence = 0.9

[detection.priority]
US_PASSPORT = 5
US_DRIVER_LICENSE = 1

[detection.validation]
CREDIT_CARD = { min_digits = 15 }

[ner]
enabled = true
endpoint = "https://ner.internal.example.com/v1/entities"
api_key = "${TEST_NER_TOKEN}"
timeout_ms = 750
default_confidence = 0.8

[ner.retry]
max_attempts = 2
initial_delay_ms = 50
max_delay_ms = 200
backoff_multiplier = 1.5
jitter = false

[logging]
json = true
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.detection.default_confidence, 0.9);
    assert_eq!(config.detection.priority.get("US_PASSPORT"), Some(&5));
    assert_eq!(
        config.detection.validation.get("CREDIT_CARD"),
        Some(&ValidationRule::MinDigits(15))
    );
    assert!(config.ner.enabled);
    assert_eq!(config.ner.timeout_ms, 750);
    assert_eq!(config.ner.retry.max_attempts, 2);
    assert!(!config.ner.retry.jitter);
    assert_eq!(
        config.ner.api_key.as_ref().unwrap().expose_secret().to_string(),
        "token-from-env"
    );
    assert!(config.logging.json);
    assert_eq!(config.logging.local_rotation, "hourly");

    // Building the engine also builds the HTTP recognizer
    assert!(DetectionEngine::from_config(&config.detection, &config.ner).is_ok());

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable_fails() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let result = parse_config("[ner]\napi_key = \"${TEST_NER_TOKEN}\"\n");
    let err = result.unwrap_err().to_string();
    assert!(err.contains("TEST_NER_TOKEN"));
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    std::env::set_var("PII_REDACTOR_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("PII_REDACTOR_DETECTION_DEFAULT_CONFIDENCE", "0.7");
    std::env::set_var("PII_REDACTOR_NER_ENABLED", "true");
    std::env::set_var("PII_REDACTOR_NER_ENDPOINT", "http://localhost:9000/ner");
    std::env::set_var("PII_REDACTOR_NER_API_KEY", "override-token");
    std::env::set_var("PII_REDACTOR_NER_TIMEOUT_MS", "300");
    std::env::set_var("PII_REDACTOR_NER_OFFSET_UNIT", "byte");
    std::env::set_var("PII_REDACTOR_LOGGING_JSON", "true");

    let file = write_config("[application]\nlog_level = \"info\"\n");
    let result = load_config(file.path());
    cleanup_env_vars();

    let config = result.unwrap();
    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.detection.default_confidence, 0.7);
    assert!(config.ner.enabled);
    assert_eq!(
        config.ner.endpoint.as_deref(),
        Some("http://localhost:9000/ner")
    );
    assert_eq!(
        config.ner.api_key.as_ref().unwrap().expose_secret().to_string(),
        "override-token"
    );
    assert_eq!(config.ner.timeout_ms, 300);
    assert_eq!(config.ner.offset_unit, OffsetUnit::Byte);
    assert!(config.logging.json);
}

#[test]
fn test_empty_file_yields_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.detection.priority.get("US_PASSPORT"), Some(&3));
    assert_eq!(config.detection.priority.get("US_DRIVER_LICENSE"), Some(&2));
    assert!(!config.ner.enabled);
    assert_eq!(config.ner.timeout_ms, 2000);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    assert!(load_config("no-such-config.toml").is_err());
    let config = load_config_or_default("no-such-config.toml").unwrap();
    assert!(!config.ner.enabled);
}

#[test]
fn test_invalid_configs_are_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let cases = [
        "[ner]\nenabled = true\n",
        "[ner]\nenabled = true\nendpoint = \"ftp://example.com/ner\"\n",
        "[ner.retry]\nmax_attempts = 0\n",
        "[ner]\noffset_unit = \"utf16\"\n",
        "[detection]\ndefault_confidence = 1.5\n",
        "[detection.priority]\nSOCIAL_HANDLE = 1\n",
        "[detection.validation]\nPHONE_NUMBER = { digit_count_in = [] }\n",
        "[logging]\nlocal_rotation = \"weekly\"\n",
        "[application]\nlog_level = \"verbose\"\n",
        "not valid toml [",
    ];

    for contents in cases {
        let file = write_config(contents);
        assert!(
            load_config(file.path()).is_err(),
            "accepted invalid config: {contents}"
        );
    }
}

#[test]
fn test_custom_pattern_library() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let mut library = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    library
        .write_all(
            br#"
[[entity]]
kind = "ACCOUNT_NUMBER"
confidence = 0.9
patterns = ['\bEMP-(\d{6})\b']
"#,
        )
        .unwrap();
    library.flush().unwrap();

    let contents = format!(
        "[detection]\npattern_library = {:?}\n",
        library.path().to_string_lossy()
    );
    let config = parse_config(&contents).unwrap();
    assert!(config.detection.pattern_library.is_some());

    let engine = DetectionEngine::from_config(&config.detection, &config.ner).unwrap();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let result = runtime.block_on(engine.detect("badge EMP-004512, call 555-123-4567"));

    assert!(result.success);
    assert_eq!(
        result.redacted_text,
        "badge EMP-<ACCOUNT_NUMBER>, call 555-123-4567"
    );
    assert_eq!(result.entity_summary[&EntityKind::AccountNumber], 1);
}
