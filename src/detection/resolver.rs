//! Conflict resolution between overlapping candidates
//!
//! Greedy walk over candidates in a fixed total order. Each candidate either
//! joins the accepted set, replaces the entry it overlaps, or is discarded.
//! Precedence between two overlapping spans, first rule that applies:
//!
//! 1. a pattern span beats a neural span
//! 2. same source: higher kind priority wins
//! 3. same source and priority: higher confidence wins
//! 4. otherwise the entry already accepted stays

use crate::domain::{CandidateSpan, EntityKind, Result, SourceKind};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Operator-tunable tie-break ranking between entity kinds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityTable {
    priorities: HashMap<EntityKind, i32>,
}

impl PriorityTable {
    /// Table where every kind ranks 0
    pub fn empty() -> Self {
        Self::default()
    }

    /// Passport over driver license, everything else 0
    pub fn standard() -> Self {
        Self::empty()
            .with_priority(EntityKind::UsPassport, 3)
            .with_priority(EntityKind::UsDriverLicense, 2)
    }

    /// Build from configured kind names
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unknown kind names
    pub fn from_names(names: &BTreeMap<String, i32>) -> Result<Self> {
        let mut table = Self::empty();
        for (name, priority) in names {
            table.priorities.insert(name.parse()?, *priority);
        }
        Ok(table)
    }

    /// Set the priority of one kind
    pub fn with_priority(mut self, kind: EntityKind, priority: i32) -> Self {
        self.priorities.insert(kind, priority);
        self
    }

    /// Priority of `kind`, 0 if absent
    pub fn priority(&self, kind: EntityKind) -> i32 {
        self.priorities.get(&kind).copied().unwrap_or(0)
    }
}

/// Non-overlapping spans sorted by start offset
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AcceptedSet(Vec<CandidateSpan>);

impl AcceptedSet {
    /// Accepted spans in start order
    pub fn as_slice(&self) -> &[CandidateSpan] {
        &self.0
    }

    /// Iterate spans in start order
    pub fn iter(&self) -> std::slice::Iter<'_, CandidateSpan> {
        self.0.iter()
    }

    /// Number of accepted spans
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was accepted
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take the spans out
    pub fn into_vec(self) -> Vec<CandidateSpan> {
        self.0
    }
}

impl<'a> IntoIterator for &'a AcceptedSet {
    type Item = &'a CandidateSpan;
    type IntoIter = std::slice::Iter<'a, CandidateSpan>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Merges candidates from every source into one accepted set
#[derive(Debug, Clone)]
pub struct ConflictResolver {
    priorities: Arc<PriorityTable>,
}

impl ConflictResolver {
    /// Create a resolver over a priority table
    pub fn new(priorities: Arc<PriorityTable>) -> Self {
        Self { priorities }
    }

    /// Priority table in use
    pub fn priorities(&self) -> &PriorityTable {
        &self.priorities
    }

    /// Resolve overlaps; the result does not depend on input order
    pub fn resolve(&self, mut candidates: Vec<CandidateSpan>) -> AcceptedSet {
        let total = candidates.len();
        candidates.sort_by(|a, b| self.order(a, b));

        let mut accepted: Vec<CandidateSpan> = Vec::with_capacity(total);
        let mut replaced = 0usize;

        for candidate in candidates {
            // Accepted entries are sorted and disjoint, so the ones that
            // overlap `candidate` form one contiguous run.
            let first = accepted.partition_point(|a| a.end <= candidate.start);
            let last = first
                + accepted[first..]
                    .iter()
                    .take_while(|a| a.start < candidate.end)
                    .count();

            if first == last {
                accepted.insert(first, candidate);
                continue;
            }

            if accepted[first..last]
                .iter()
                .all(|existing| self.supersedes(&candidate, existing))
            {
                replaced += last - first;
                accepted.splice(first..last, std::iter::once(candidate));
            }
        }

        tracing::debug!(
            candidates = total,
            accepted = accepted.len(),
            replaced = replaced,
            "Conflict resolution finished"
        );

        AcceptedSet(accepted)
    }

    /// Total order: start asc, priority desc, confidence desc, then
    /// pattern first, longer first, kind
    fn order(&self, a: &CandidateSpan, b: &CandidateSpan) -> Ordering {
        a.start
            .cmp(&b.start)
            .then_with(|| {
                self.priorities
                    .priority(b.kind)
                    .cmp(&self.priorities.priority(a.kind))
            })
            .then_with(|| b.confidence.total_cmp(&a.confidence))
            .then_with(|| a.source.rank().cmp(&b.source.rank()))
            .then_with(|| b.end.cmp(&a.end))
            .then_with(|| a.kind.cmp(&b.kind))
    }

    /// Whether `candidate` should replace the overlapping `existing` entry
    fn supersedes(&self, candidate: &CandidateSpan, existing: &CandidateSpan) -> bool {
        match (candidate.source, existing.source) {
            (SourceKind::Pattern, SourceKind::NeuralNer) => true,
            (c, e) if c == e => {
                let candidate_priority = self.priorities.priority(candidate.kind);
                let existing_priority = self.priorities.priority(existing.kind);
                if candidate_priority != existing_priority {
                    candidate_priority > existing_priority
                } else {
                    candidate.confidence > existing.confidence
                }
            }
            _ => false,
        }
    }
}

impl Default for ConflictResolver {
    fn default() -> Self {
        Self::new(Arc::new(PriorityTable::standard()))
    }
}
