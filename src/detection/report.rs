//! Redaction result and its console/JSON renderings

use super::summary::summarize;
use crate::domain::{CandidateSpan, EntityKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of one detection call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionResult {
    /// Length of the input in bytes
    pub original_length: usize,

    /// Input with every accepted span replaced by its placeholder
    pub redacted_text: String,

    /// Accepted spans in start order
    pub entities: Vec<CandidateSpan>,

    /// Entity count per kind
    pub entity_summary: BTreeMap<EntityKind, usize>,

    /// False when the pipeline failed and `redacted_text` is the input
    pub success: bool,

    /// Failure description
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl RedactionResult {
    /// Successful result
    pub fn completed(original: &str, redacted_text: String, entities: Vec<CandidateSpan>) -> Self {
        let entity_summary = summarize(&entities);
        Self {
            original_length: original.len(),
            redacted_text,
            entities,
            entity_summary,
            success: true,
            error: None,
        }
    }

    /// Degraded result carrying the untouched input
    pub fn failure(original: &str, error: impl Into<String>) -> Self {
        Self {
            original_length: original.len(),
            redacted_text: original.to_string(),
            entities: Vec::new(),
            entity_summary: BTreeMap::new(),
            success: false,
            error: Some(error.into()),
        }
    }

    /// Number of accepted entities
    pub fn total_entities(&self) -> usize {
        self.entities.len()
    }

    /// Length of the redacted text in bytes
    pub fn redacted_length(&self) -> usize {
        self.redacted_text.len()
    }

    /// Whether anything was redacted
    pub fn has_entities(&self) -> bool {
        !self.entities.is_empty()
    }

    /// Format report for console output
    ///
    /// Lists kinds, offsets and scores only; matched text is never printed.
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                      REDACTION REPORT                         \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "  Status:                 {}\n",
            if self.success { "completed" } else { "failed" }
        ));
        output.push_str(&format!(
            "  Original Length:        {} bytes\n",
            self.original_length
        ));
        output.push_str(&format!(
            "  Redacted Length:        {} bytes\n",
            self.redacted_length()
        ));
        output.push_str(&format!(
            "  Total Entities:         {}\n",
            self.total_entities()
        ));
        output.push('\n');

        if !self.entity_summary.is_empty() {
            output.push_str("🔍 ENTITIES BY KIND\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            let mut kinds: Vec<_> = self.entity_summary.iter().collect();
            kinds.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

            for (kind, count) in kinds {
                output.push_str(&format!("  {:30} {:>5}\n", kind.as_str(), count));
            }
            output.push('\n');
        }

        if !self.entities.is_empty() {
            output.push_str("📝 ENTITIES\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            output.push_str(&format!(
                "  {:22} {:>13}  {:11} {:>10}\n",
                "Kind", "Span", "Source", "Confidence"
            ));
            for entity in &self.entities {
                output.push_str(&format!(
                    "  {:22} {:>13}  {:11} {:>9.2}%\n",
                    entity.kind.as_str(),
                    format!("{}..{}", entity.start, entity.end),
                    entity.source.to_string(),
                    entity.confidence * 100.0
                ));
            }
            output.push('\n');
        }

        if let Some(ref error) = self.error {
            output.push_str("⚠️  ERROR\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            output.push_str(&format!("  • {error}\n"));
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
