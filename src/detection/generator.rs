//! Pattern candidate generator

use super::patterns::{CompiledPattern, PatternRegistry};
use super::source::{CandidateSource, SourceContext};
use super::validation::ValidationRules;
use crate::domain::{CandidateSpan, SourceKind};
use async_trait::async_trait;
use std::sync::Arc;

/// Runs the pattern table over input text
///
/// Emits one candidate per non-overlapping match of every pattern, after the
/// match passes its kind's validation rule. Overlaps between kinds or
/// patterns are left to the conflict resolver.
#[derive(Clone)]
pub struct PatternGenerator {
    registry: Arc<PatternRegistry>,
    rules: Arc<ValidationRules>,
}

impl PatternGenerator {
    /// Create a generator over a compiled registry and rule table
    pub fn new(registry: Arc<PatternRegistry>, rules: Arc<ValidationRules>) -> Self {
        Self { registry, rules }
    }

    /// Generator with the embedded pattern library and standard rules
    pub fn with_defaults() -> crate::domain::Result<Self> {
        Ok(Self::new(
            Arc::new(PatternRegistry::default_patterns()?),
            Arc::new(ValidationRules::standard()),
        ))
    }

    /// Generate validated pattern candidates for `text`
    pub fn generate(&self, text: &str) -> Vec<CandidateSpan> {
        let mut candidates = Vec::new();
        let mut rejected = 0usize;

        for (_, patterns) in self.registry.entries() {
            for (index, pattern) in patterns.iter().enumerate() {
                rejected += self.apply(pattern, index, text, &mut candidates);
            }
        }

        tracing::debug!(
            candidates = candidates.len(),
            rejected = rejected,
            "Pattern generation finished"
        );

        candidates
    }

    /// Apply one pattern, returning how many matches were rejected
    fn apply(
        &self,
        pattern: &CompiledPattern,
        index: usize,
        text: &str,
        out: &mut Vec<CandidateSpan>,
    ) -> usize {
        let mut rejected = 0;

        for captures in pattern.regex.captures_iter(text) {
            let captures = match captures {
                Ok(captures) => captures,
                Err(e) => {
                    // Matcher gave up (e.g. backtrack limit); keep what we have
                    tracing::debug!(
                        kind = %pattern.kind,
                        pattern_index = index,
                        error = %e,
                        "Pattern evaluation aborted"
                    );
                    break;
                }
            };

            let group = if pattern.uses_group { 1 } else { 0 };
            let Some(matched) = captures.get(group) else {
                continue;
            };

            if !self.rules.validate(pattern.kind, matched.as_str()) {
                rejected += 1;
                continue;
            }

            if let Some(span) = CandidateSpan::from_text(
                text,
                matched.start(),
                matched.end(),
                pattern.kind,
                pattern.confidence,
                SourceKind::Pattern,
            ) {
                out.push(span);
            }
        }

        rejected
    }
}

#[async_trait]
impl CandidateSource for PatternGenerator {
    fn source_kind(&self) -> SourceKind {
        SourceKind::Pattern
    }

    fn name(&self) -> &str {
        "patterns"
    }

    async fn produce(&self, text: &str, _ctx: &SourceContext) -> Vec<CandidateSpan> {
        // Runs to completion even if the request is cancelled. Regex work stays
        // off the async workers so the recognizer call proceeds meanwhile.
        let generator = self.clone();
        let text = text.to_owned();
        match tokio::task::spawn_blocking(move || generator.generate(&text)).await {
            Ok(candidates) => candidates,
            // Surfaces as a failed result in the engine
            Err(e) => match e.try_into_panic() {
                Ok(payload) => std::panic::resume_unwind(payload),
                Err(_) => std::panic::resume_unwind(Box::new("pattern generation cancelled")),
            },
        }
    }
}
