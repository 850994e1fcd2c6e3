//! NER collaborator adapter
//!
//! Normalizes an external recognizer's output into [`CandidateSpan`]s and
//! shields the pipeline from its failures: timeouts, cancellation, transport
//! errors and panics all degrade to an empty candidate list.
//!
//! The request deadline bounds the whole call. Each attempt gets an equal
//! share of it, so a hung first attempt still leaves room for a retry.

use super::retry::RetryPolicy;
use super::{map_label, EntityRecognizer, OffsetUnit, RawEntity, DEFAULT_NER_CONFIDENCE};
use crate::detection::source::{cancelled, CandidateSource, SourceContext};
use crate::domain::{CandidateSpan, RecognizerError, SourceKind};
use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

/// Adapter around an [`EntityRecognizer`] handle
pub struct NerAdapter {
    recognizer: Arc<dyn EntityRecognizer>,
    retry: RetryPolicy,
    default_confidence: f32,
    offset_unit: OffsetUnit,
}

impl NerAdapter {
    /// Wrap a recognizer with the given retry policy
    pub fn new(recognizer: Arc<dyn EntityRecognizer>, retry: RetryPolicy) -> Self {
        Self {
            recognizer,
            retry,
            default_confidence: DEFAULT_NER_CONFIDENCE,
            offset_unit: OffsetUnit::default(),
        }
    }

    /// Unit of the recognizer's offsets
    pub fn with_offset_unit(mut self, unit: OffsetUnit) -> Self {
        self.offset_unit = unit;
        self
    }

    /// Confidence for recognizer spans without a score
    pub fn with_default_confidence(mut self, confidence: f32) -> Self {
        self.default_confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Backend identifier of the wrapped recognizer
    pub fn backend_id(&self) -> &str {
        self.recognizer.backend_id()
    }

    /// Recognize entities, returning an empty list on any failure
    pub async fn recognize(&self, text: &str, ctx: &SourceContext) -> Vec<CandidateSpan> {
        match self.call(text, ctx).await {
            Ok(raw) => {
                let received = raw.len();
                let candidates = self.normalize(text, raw);
                tracing::debug!(
                    backend = self.backend_id(),
                    received = received,
                    kept = candidates.len(),
                    "Recognizer returned entities"
                );
                candidates
            }
            Err(RecognizerError::Unavailable(reason)) => {
                tracing::debug!(
                    backend = self.backend_id(),
                    reason = %reason,
                    "Recognizer unavailable, using pattern candidates only"
                );
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(
                    backend = self.backend_id(),
                    error = %e,
                    "Recognizer call failed, using pattern candidates only"
                );
                Vec::new()
            }
        }
    }

    async fn call(
        &self,
        text: &str,
        ctx: &SourceContext,
    ) -> Result<Vec<RawEntity>, RecognizerError> {
        if ctx.is_cancelled() {
            return Err(RecognizerError::Cancelled);
        }

        let mut cancel = ctx.cancel.clone();
        let timeout = ctx.ner_timeout;
        let per_attempt = self.retry.attempt_timeout(timeout);
        let attempts = self.retry.run(|| self.call_once(text, per_attempt));

        tokio::select! {
            outcome = tokio::time::timeout(timeout, attempts) => match outcome {
                Ok(result) => result,
                Err(_) => Err(RecognizerError::Timeout(timeout.as_millis() as u64)),
            },
            _ = cancelled(&mut cancel) => Err(RecognizerError::Cancelled),
        }
    }

    async fn call_once(
        &self,
        text: &str,
        timeout: Duration,
    ) -> Result<Vec<RawEntity>, RecognizerError> {
        let attempt = AssertUnwindSafe(self.recognizer.recognize(text)).catch_unwind();
        match tokio::time::timeout(timeout, attempt).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(RecognizerError::Panicked),
            Err(_) => Err(RecognizerError::Timeout(timeout.as_millis() as u64)),
        }
    }

    /// Map labels and drop anything that is not a faithful span of `text`
    fn normalize(&self, text: &str, raw: Vec<RawEntity>) -> Vec<CandidateSpan> {
        raw.into_iter()
            .filter_map(|entity| {
                let kind = map_label(&entity.label)?;
                let confidence = entity
                    .score
                    .filter(|score| score.is_finite())
                    .unwrap_or(self.default_confidence);
                let (start, end) = self
                    .offset_unit
                    .to_byte_range(text, entity.start, entity.end)?;
                CandidateSpan::from_text(
                    text,
                    start,
                    end,
                    kind,
                    confidence,
                    SourceKind::NeuralNer,
                )
            })
            .collect()
    }
}

#[async_trait]
impl CandidateSource for NerAdapter {
    fn source_kind(&self) -> SourceKind {
        SourceKind::NeuralNer
    }

    fn name(&self) -> &str {
        "ner"
    }

    async fn produce(&self, text: &str, ctx: &SourceContext) -> Vec<CandidateSpan> {
        self.recognize(text, ctx).await
    }
}
