//! Candidate source contract
//!
//! Every subsystem that proposes entity spans implements [`CandidateSource`].
//! Sources never fail: whatever goes wrong inside them is absorbed and
//! reported as fewer candidates.

use crate::domain::{CandidateSpan, SourceKind};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::watch;

/// Per-request inputs shared by all sources
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Upper bound for calls into external recognizers
    pub ner_timeout: Duration,
    /// Flips to `true` when the caller cancels the request
    pub cancel: watch::Receiver<bool>,
}

impl SourceContext {
    /// Whether cancellation was already requested
    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }
}

/// Producer of candidate spans for one input text
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Which subsystem this source represents
    fn source_kind(&self) -> SourceKind;

    /// Short identifier for logs
    fn name(&self) -> &str;

    /// Propose candidates for `text`
    async fn produce(&self, text: &str, ctx: &SourceContext) -> Vec<CandidateSpan>;
}

/// Resolves once `cancel` reads `true`; never resolves if the sender is gone
pub(crate) async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    let outcome = cancel.wait_for(|requested| *requested).await.map(|_| ());
    if outcome.is_err() {
        std::future::pending::<()>().await;
    }
}
