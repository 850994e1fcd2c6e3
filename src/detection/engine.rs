//! Detection pipeline
//!
//! Candidate sources run concurrently: pattern matching on the blocking pool
//! while the recognizer call is in flight. Their output is checked against
//! the input, merged by the [`ConflictResolver`], and spliced by the
//! [`Redactor`]. Any error or panic past the sources turns into a failed
//! [`RedactionResult`] carrying the untouched input.

use super::config::{DetectionConfig, NerConfig};
use super::generator::PatternGenerator;
use super::ner::{DisabledRecognizer, EntityRecognizer, HttpRecognizer, NerAdapter, RetryPolicy};
use super::patterns::PatternRegistry;
use super::redactor::Redactor;
use super::report::RedactionResult;
use super::resolver::{ConflictResolver, PriorityTable};
use super::source::{CandidateSource, SourceContext};
use super::validation::ValidationRules;
use crate::domain::{CandidateSpan, RedactorError, Result};
use futures::future::join_all;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::Instrument;
use uuid::Uuid;

/// Per-call overrides
#[derive(Debug, Clone, Default)]
pub struct DetectOptions {
    /// Deadline for the recognizer call (configured `ner.timeout_ms` when unset)
    pub ner_timeout: Option<Duration>,
    /// Cancellation signal; `true` abandons the recognizer call
    pub cancel: Option<watch::Receiver<bool>>,
}

impl DetectOptions {
    /// Override the recognizer deadline
    pub fn with_ner_timeout(mut self, timeout: Duration) -> Self {
        self.ner_timeout = Some(timeout);
        self
    }

    /// Attach a cancellation signal
    pub fn with_cancel(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Immutable detection engine, shareable across concurrent requests
pub struct DetectionEngine {
    sources: Vec<Arc<dyn CandidateSource>>,
    resolver: ConflictResolver,
    redactor: Redactor,
    ner_timeout: Duration,
}

impl DetectionEngine {
    /// Build the engine around an explicit recognizer
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the pattern library, priority table
    /// or validation table is malformed
    pub fn new(
        detection: &DetectionConfig,
        ner: &NerConfig,
        recognizer: Arc<dyn EntityRecognizer>,
    ) -> Result<Self> {
        let registry = match detection.pattern_library {
            Some(ref path) => PatternRegistry::from_file(path, detection.default_confidence)?,
            None => PatternRegistry::default_patterns_with_confidence(detection.default_confidence)?,
        };
        let rules = ValidationRules::with_overrides(&detection.validation)?;
        let priorities = PriorityTable::from_names(&detection.priority)?;

        tracing::info!(
            kinds = registry.kind_count(),
            patterns = registry.pattern_count(),
            recognizer = recognizer.backend_id(),
            ner_timeout_ms = ner.timeout_ms,
            "Detection engine initialized"
        );

        let generator = PatternGenerator::new(Arc::new(registry), Arc::new(rules));
        let adapter = NerAdapter::new(recognizer, RetryPolicy::from(&ner.retry))
            .with_default_confidence(ner.default_confidence)
            .with_offset_unit(ner.offset_unit);

        Ok(Self {
            sources: vec![Arc::new(generator), Arc::new(adapter)],
            resolver: ConflictResolver::new(Arc::new(priorities)),
            redactor: Redactor::new(),
            ner_timeout: Duration::from_millis(ner.timeout_ms),
        })
    }

    /// Build the engine, choosing the recognizer from the `[ner]` section
    pub fn from_config(detection: &DetectionConfig, ner: &NerConfig) -> Result<Self> {
        let recognizer: Arc<dyn EntityRecognizer> = if ner.enabled {
            Arc::new(HttpRecognizer::from_config(ner)?)
        } else {
            Arc::new(DisabledRecognizer)
        };
        Self::new(detection, ner, recognizer)
    }

    /// Engine with built-in patterns and no recognizer
    pub fn pattern_only() -> Result<Self> {
        Self::new(
            &DetectionConfig::default(),
            &NerConfig::default(),
            Arc::new(DisabledRecognizer),
        )
    }

    /// Register an additional candidate source
    pub fn with_source(mut self, source: Arc<dyn CandidateSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Default recognizer deadline
    pub fn ner_timeout(&self) -> Duration {
        self.ner_timeout
    }

    /// Detect and redact sensitive entities in `text`
    ///
    /// Never fails: problems are reported through `success` and `error`.
    pub async fn detect(&self, text: &str) -> RedactionResult {
        self.detect_with_options(text, DetectOptions::default())
            .await
    }

    /// [`detect`](Self::detect) with a per-call timeout and cancellation
    pub async fn detect_with_options(&self, text: &str, options: DetectOptions) -> RedactionResult {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "detect",
            request_id = %request_id,
            text_length = text.len()
        );

        async move {
            let started = Instant::now();

            let result = match AssertUnwindSafe(self.run(text, options))
                .catch_unwind()
                .await
            {
                Ok(Ok(result)) => result,
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "Detection failed, returning input unchanged");
                    RedactionResult::failure(text, e.to_string())
                }
                Err(_) => {
                    tracing::error!("Detection panicked, returning input unchanged");
                    RedactionResult::failure(text, "Unexpected internal failure during detection")
                }
            };

            tracing::info!(
                success = result.success,
                entities = result.total_entities(),
                duration_ms = started.elapsed().as_millis() as u64,
                "Detection finished"
            );

            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, text: &str, options: DetectOptions) -> Result<RedactionResult> {
        let cancel = options.cancel.unwrap_or_else(|| watch::channel(false).1);
        let ctx = SourceContext {
            ner_timeout: options.ner_timeout.unwrap_or(self.ner_timeout),
            cancel,
        };

        let batches = join_all(
            self.sources
                .iter()
                .map(|source| source.produce(text, &ctx)),
        )
        .await;

        let mut candidates: Vec<CandidateSpan> = Vec::new();
        for (source, batch) in self.sources.iter().zip(batches) {
            tracing::debug!(
                source = source.name(),
                kind = %source.source_kind(),
                candidates = batch.len(),
                "Candidate source finished"
            );
            if let Some(bad) = batch.iter().find(|c| !c.is_faithful_to(text)) {
                return Err(RedactorError::Pipeline(format!(
                    "source '{}' produced a span {}..{} that does not match the input",
                    source.name(),
                    bad.start,
                    bad.end
                )));
            }
            candidates.extend(batch);
        }

        let accepted = self.resolver.resolve(candidates);
        let redacted = self.redactor.redact(text, accepted.as_slice())?;

        Ok(RedactionResult::completed(text, redacted, accepted.into_vec()))
    }
}
