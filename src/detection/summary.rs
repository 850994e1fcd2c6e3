//! Per-kind entity counts

use crate::domain::{CandidateSpan, EntityKind};
use std::collections::BTreeMap;

/// Count accepted spans by kind
///
/// Kinds with no spans are absent from the map.
pub fn summarize<'a, I>(spans: I) -> BTreeMap<EntityKind, usize>
where
    I: IntoIterator<Item = &'a CandidateSpan>,
{
    let mut summary = BTreeMap::new();
    for span in spans {
        *summary.entry(span.kind).or_insert(0) += 1;
    }
    summary
}
