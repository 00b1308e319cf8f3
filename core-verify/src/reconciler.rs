//! Reconciliation of two listings.

use crate::listing::ListingMap;
use serde::Serialize;
use std::collections::HashMap;

/// A path present on both sides with different sizes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeMismatch {
    pub path: String,
    pub source_size: u64,
    pub target_size: u64,
}

/// Partition of both listings into four disjoint buckets
///
/// Every source path lands in exactly one of matched, mismatched or missing;
/// every target path in exactly one of matched, mismatched or extra.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
    pub matched_count: usize,
    /// In source listing order
    pub mismatched: Vec<SizeMismatch>,
    /// Source paths absent from the target, in source listing order
    pub missing: Vec<String>,
    /// Target paths absent from the source, sorted
    pub extra: Vec<String>,
}

impl ReconciliationResult {
    /// True when both sides hold exactly the same files with the same sizes
    pub fn is_clean(&self) -> bool {
        self.discrepancy_count() == 0
    }

    pub fn discrepancy_count(&self) -> usize {
        self.mismatched.len() + self.missing.len() + self.extra.len()
    }
}

/// Compare `source` against `target` by canonical path and exact size.
pub fn reconcile(source: &ListingMap, target: &ListingMap) -> ReconciliationResult {
    let mut remaining: HashMap<&str, u64> = target.iter().collect();
    let mut result = ReconciliationResult::default();

    for entry in source.entries() {
        let source_size = entry.size;
        match remaining.remove(entry.canonical_path.as_str()) {
            Some(target_size) if target_size == source_size => result.matched_count += 1,
            Some(target_size) => result.mismatched.push(SizeMismatch {
                path: entry.canonical_path.clone(),
                source_size,
                target_size,
            }),
            None => result.missing.push(entry.canonical_path.clone()),
        }
    }

    result.extra = remaining.into_keys().map(str::to_string).collect();
    result.extra.sort();

    result
}
