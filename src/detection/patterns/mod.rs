//! Pattern library for candidate generation
//!
//! Patterns are declared in TOML, grouped per entity kind, and compiled once
//! at startup. A pattern that fails to compile aborts construction.

use crate::domain::{EntityKind, RedactorError, Result};
use fancy_regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Confidence used when neither the pattern nor its block sets one
pub const DEFAULT_PATTERN_CONFIDENCE: f32 = 0.95;

/// Single pattern entry from TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PatternDefinition {
    /// Bare regex string
    Plain(String),
    /// Regex with its own confidence
    Detailed {
        regex: String,
        #[serde(default)]
        confidence: Option<f32>,
    },
}

impl PatternDefinition {
    fn regex(&self) -> &str {
        match self {
            Self::Plain(regex) => regex,
            Self::Detailed { regex, .. } => regex,
        }
    }

    fn confidence(&self) -> Option<f32> {
        match self {
            Self::Plain(_) => None,
            Self::Detailed { confidence, .. } => *confidence,
        }
    }
}

/// Ordered patterns for one entity kind
#[derive(Debug, Clone, Deserialize)]
pub struct EntityPatterns {
    /// Entity kind name (e.g. "US_SSN")
    pub kind: String,
    /// Block-level confidence
    #[serde(default)]
    pub confidence: Option<f32>,
    /// Patterns in evaluation order
    pub patterns: Vec<PatternDefinition>,
}

#[derive(Debug, Deserialize)]
struct PatternLibrary {
    #[serde(default)]
    entity: Vec<EntityPatterns>,
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Compiled case-insensitive regex
    pub regex: Regex,
    /// Entity kind emitted on match
    pub kind: EntityKind,
    /// Fixed confidence for every match of this pattern
    pub confidence: f32,
    /// Whether the span comes from capture group 1
    pub uses_group: bool,
}

/// Immutable kind → ordered pattern table
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    table: Vec<(EntityKind, Vec<CompiledPattern>)>,
}

impl PatternRegistry {
    /// Load a pattern library from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P, default_confidence: f32) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RedactorError::Configuration(format!(
                "Failed to read pattern library {}: {e}",
                path.as_ref().display()
            ))
        })?;

        Self::from_toml(&content, default_confidence)
    }

    /// Build a registry from TOML content
    pub fn from_toml(content: &str, default_confidence: f32) -> Result<Self> {
        let library: PatternLibrary = toml::from_str(content).map_err(|e| {
            RedactorError::Configuration(format!("Failed to parse pattern library TOML: {e}"))
        })?;

        check_confidence(default_confidence, "default pattern confidence")?;

        let mut table: Vec<(EntityKind, Vec<CompiledPattern>)> = Vec::new();

        for block in library.entity {
            let kind: EntityKind = block.kind.parse()?;
            if let Some(confidence) = block.confidence {
                check_confidence(confidence, &format!("confidence for {kind}"))?;
            }

            let mut compiled = Vec::with_capacity(block.patterns.len());
            for definition in &block.patterns {
                let confidence = definition
                    .confidence()
                    .or(block.confidence)
                    .unwrap_or(default_confidence);
                check_confidence(confidence, &format!("confidence for {kind} pattern"))?;
                compiled.push(compile(kind, definition.regex(), confidence)?);
            }

            // Repeated blocks for the same kind extend its list in file order
            match table.iter_mut().find(|(existing, _)| *existing == kind) {
                Some((_, patterns)) => patterns.extend(compiled),
                None => table.push((kind, compiled)),
            }
        }

        Ok(Self { table })
    }

    /// Registry built from the embedded default library
    pub fn default_patterns() -> Result<Self> {
        Self::default_patterns_with_confidence(DEFAULT_PATTERN_CONFIDENCE)
    }

    /// Embedded default library with an explicit fallback confidence
    pub fn default_patterns_with_confidence(default_confidence: f32) -> Result<Self> {
        let default_toml = include_str!("../../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml, default_confidence)
    }

    /// Kinds with their ordered patterns, in table order
    pub fn entries(&self) -> impl Iterator<Item = (EntityKind, &[CompiledPattern])> {
        self.table
            .iter()
            .map(|(kind, patterns)| (*kind, patterns.as_slice()))
    }

    /// Patterns for a specific kind
    pub fn patterns_for_kind(&self, kind: EntityKind) -> Option<&[CompiledPattern]> {
        self.table
            .iter()
            .find(|(existing, _)| *existing == kind)
            .map(|(_, patterns)| patterns.as_slice())
    }

    /// Total number of compiled patterns
    pub fn pattern_count(&self) -> usize {
        self.table.iter().map(|(_, patterns)| patterns.len()).sum()
    }

    /// Number of kinds with at least one pattern
    pub fn kind_count(&self) -> usize {
        self.table.len()
    }
}

fn compile(kind: EntityKind, pattern: &str, confidence: f32) -> Result<CompiledPattern> {
    let regex = Regex::new(&format!("(?i){pattern}")).map_err(|e| {
        RedactorError::Configuration(format!("Invalid regex for {kind}: {pattern}: {e}"))
    })?;
    let uses_group = regex.captures_len() > 1;

    Ok(CompiledPattern {
        regex,
        kind,
        confidence,
        uses_group,
    })
}

fn check_confidence(value: f32, what: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(RedactorError::Configuration(format!(
            "Invalid {what}: {value} (must be between 0.0 and 1.0)"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_match(registry: &PatternRegistry, kind: EntityKind, text: &str) -> bool {
        registry
            .patterns_for_kind(kind)
            .unwrap()
            .iter()
            .any(|p| p.regex.is_match(text).unwrap())
    }

    #[test]
    fn test_load_default_patterns() {
        let registry = PatternRegistry::default_patterns().unwrap();
        assert!(registry.pattern_count() > 20);
        assert_eq!(registry.kind_count(), 11);
    }

    #[test]
    fn test_email_pattern() {
        let registry = PatternRegistry::default_patterns().unwrap();
        assert!(first_match(&registry, EntityKind::EmailAddress, "test@example.com"));
        assert!(!first_match(&registry, EntityKind::EmailAddress, "not-an-email"));
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        let registry = PatternRegistry::default_patterns().unwrap();
        assert!(first_match(&registry, EntityKind::HealthInsuranceId, "hcn 123-456-789"));
        assert!(first_match(&registry, EntityKind::UsPassport, "a12345678"));
    }

    #[test]
    fn test_lookaround_patterns_compile() {
        let registry = PatternRegistry::default_patterns().unwrap();
        assert!(first_match(&registry, EntityKind::ZipCode, "zip 55401"));
        assert!(!first_match(&registry, EntityKind::ZipCode, "1234567"));
    }

    #[test]
    fn test_group_detection() {
        let registry = PatternRegistry::default_patterns().unwrap();
        let ssn = registry.patterns_for_kind(EntityKind::UsSsn).unwrap();
        assert!(!ssn[0].uses_group);
        assert!(ssn[2].uses_group);
    }

    #[test]
    fn test_confidence_fallbacks() {
        let toml = r#"
[[entity]]
kind = "NUMBER"
confidence = 0.6
patterns = ['\d+', { regex = 'x\d+', confidence = 0.3 }]

[[entity]]
kind = "MONEY"
patterns = ['\$\d+']
"#;
        let registry = PatternRegistry::from_toml(toml, 0.8).unwrap();
        let number = registry.patterns_for_kind(EntityKind::Number).unwrap();
        assert_eq!(number[0].confidence, 0.6);
        assert_eq!(number[1].confidence, 0.3);
        assert_eq!(
            registry.patterns_for_kind(EntityKind::Money).unwrap()[0].confidence,
            0.8
        );
    }

    #[test]
    fn test_repeated_kind_blocks_are_merged_in_order() {
        let toml = r#"
[[entity]]
kind = "NUMBER"
patterns = ['one']

[[entity]]
kind = "NUMBER"
patterns = ['two']
"#;
        let registry = PatternRegistry::from_toml(toml, 0.95).unwrap();
        assert_eq!(registry.kind_count(), 1);
        let number = registry.patterns_for_kind(EntityKind::Number).unwrap();
        assert!(number[1].regex.is_match("TWO").unwrap());
    }

    #[test]
    fn test_invalid_regex_is_configuration_error() {
        let toml = r#"
[[entity]]
kind = "NUMBER"
patterns = ['(unclosed']
"#;
        let err = PatternRegistry::from_toml(toml, 0.95).unwrap_err();
        assert!(matches!(err, RedactorError::Configuration(_)));
    }

    #[test]
    fn test_unknown_kind_is_configuration_error() {
        let toml = r#"
[[entity]]
kind = "SHOE_SIZE"
patterns = ['\d+']
"#;
        assert!(PatternRegistry::from_toml(toml, 0.95).is_err());
    }

    #[test]
    fn test_out_of_range_confidence_rejected() {
        let toml = r#"
[[entity]]
kind = "NUMBER"
patterns = [{ regex = '\d+', confidence = 1.5 }]
"#;
        assert!(PatternRegistry::from_toml(toml, 0.95).is_err());
        assert!(PatternRegistry::from_toml("", 2.0).is_err());
    }
}
