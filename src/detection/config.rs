//! Detection and recognizer configuration

use super::ner::OffsetUnit;
use super::validation::{ValidationRule, ValidationRules};
use crate::config::SecretString;
use crate::domain::EntityKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Pattern, priority and validation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Confidence for patterns that declare none
    #[serde(default = "default_pattern_confidence")]
    pub default_confidence: f32,

    /// Path to a pattern library TOML file (embedded library when unset)
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,

    /// Kind name to tie-break priority (absent kinds rank 0)
    #[serde(default = "default_priority")]
    pub priority: BTreeMap<String, i32>,

    /// Kind name to validation rule, applied over the built-in rules
    #[serde(default)]
    pub validation: BTreeMap<String, ValidationRule>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            default_confidence: default_pattern_confidence(),
            pattern_library: None,
            priority: default_priority(),
            validation: BTreeMap::new(),
        }
    }
}

impl DetectionConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.default_confidence) {
            anyhow::bail!(
                "detection.default_confidence must be between 0.0 and 1.0, got {}",
                self.default_confidence
            );
        }

        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                anyhow::bail!("Pattern library file not found: {}", path.display());
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                anyhow::bail!("Pattern library must be a TOML file: {}", path.display());
            }
        }

        for name in self.priority.keys() {
            name.parse::<EntityKind>()
                .with_context(|| format!("Invalid detection.priority entry '{name}'"))?;
        }

        ValidationRules::with_overrides(&self.validation)
            .context("Invalid detection.validation table")?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("PII_REDACTOR_DETECTION_DEFAULT_CONFIDENCE") {
            self.default_confidence = val
                .parse()
                .context("Invalid PII_REDACTOR_DETECTION_DEFAULT_CONFIDENCE value")?;
        }

        if let Ok(val) = std::env::var("PII_REDACTOR_DETECTION_PATTERN_LIBRARY") {
            self.pattern_library = Some(PathBuf::from(val));
        }

        Ok(())
    }
}

/// External recognizer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NerConfig {
    /// Call the external recognizer at all
    #[serde(default)]
    pub enabled: bool,

    /// Recognizer endpoint URL (required when enabled)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bearer token for the recognizer
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Deadline for one recognize call including retries
    #[serde(default = "default_ner_timeout_ms")]
    pub timeout_ms: u64,

    /// Confidence for recognizer spans without a score
    #[serde(default = "default_ner_confidence")]
    pub default_confidence: f32,

    /// Unit of the recognizer's span offsets (`char` or `byte`)
    #[serde(default)]
    pub offset_unit: OffsetUnit,

    /// Retry schedule
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key: None,
            timeout_ms: default_ner_timeout_ms(),
            default_confidence: default_ner_confidence(),
            offset_unit: OffsetUnit::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl NerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled {
            let endpoint = self
                .endpoint
                .as_deref()
                .context("ner.endpoint is required when ner.enabled = true")?;
            let url = url::Url::parse(endpoint)
                .with_context(|| format!("Invalid ner.endpoint '{endpoint}'"))?;
            if !matches!(url.scheme(), "http" | "https") {
                anyhow::bail!("ner.endpoint must use http or https, got '{}'", url.scheme());
            }
        }

        if self.timeout_ms == 0 {
            anyhow::bail!("ner.timeout_ms must be > 0");
        }

        if !(0.0..=1.0).contains(&self.default_confidence) {
            anyhow::bail!(
                "ner.default_confidence must be between 0.0 and 1.0, got {}",
                self.default_confidence
            );
        }

        self.retry.validate().context("Invalid ner.retry configuration")?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("PII_REDACTOR_NER_ENABLED") {
            self.enabled = val
                .parse()
                .context("Invalid PII_REDACTOR_NER_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("PII_REDACTOR_NER_ENDPOINT") {
            self.endpoint = Some(val);
        }

        if let Ok(val) = std::env::var("PII_REDACTOR_NER_API_KEY") {
            self.api_key = Some(crate::config::secret_string(val));
        }

        if let Ok(val) = std::env::var("PII_REDACTOR_NER_TIMEOUT_MS") {
            self.timeout_ms = val
                .parse()
                .context("Invalid PII_REDACTOR_NER_TIMEOUT_MS value")?;
        }

        if let Ok(val) = std::env::var("PII_REDACTOR_NER_OFFSET_UNIT") {
            self.offset_unit = val
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("Invalid PII_REDACTOR_NER_OFFSET_UNIT value")?;
        }

        Ok(())
    }
}

/// Retry configuration for recognizer calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first call
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Randomize delays
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

impl RetryConfig {
    fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 || self.max_attempts > 10 {
            anyhow::bail!("max_attempts must be between 1 and 10");
        }
        if self.initial_delay_ms > self.max_delay_ms {
            anyhow::bail!("initial_delay_ms must not exceed max_delay_ms");
        }
        if !(self.backoff_multiplier.is_finite() && self.backoff_multiplier >= 1.0) {
            anyhow::bail!("backoff_multiplier must be >= 1.0");
        }
        Ok(())
    }
}

// Default value functions
fn default_pattern_confidence() -> f32 {
    super::patterns::DEFAULT_PATTERN_CONFIDENCE
}

fn default_priority() -> BTreeMap<String, i32> {
    BTreeMap::from([
        (EntityKind::UsPassport.as_str().to_string(), 3),
        (EntityKind::UsDriverLicense.as_str().to_string(), 2),
    ])
}

fn default_ner_timeout_ms() -> u64 {
    2000
}

fn default_ner_confidence() -> f32 {
    super::ner::DEFAULT_NER_CONFIDENCE
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    100
}

fn default_max_delay_ms() -> u64 {
    1000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}
