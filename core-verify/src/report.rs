//! Per-pair reports and the batch summary, as text and JSON.

use crate::error::{ErrorKind, VerifyError};
use crate::listing::ListingStats;
use crate::pair::TransferPair;
use crate::reconciler::ReconciliationResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Everything learned about one successfully verified pair
#[derive(Debug, Clone, Serialize)]
pub struct PairReport {
    pub pair: TransferPair,
    pub result: ReconciliationResult,
    pub source_stats: ListingStats,
    pub target_stats: ListingStats,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// A pair that could not be verified
#[derive(Debug, Clone, Serialize)]
pub struct PairFailure {
    pub pair: TransferPair,
    pub kind: ErrorKind,
    pub error: String,
}

impl PairFailure {
    pub fn new(pair: TransferPair, error: &VerifyError) -> Self {
        Self {
            pair,
            kind: error.kind(),
            error: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PairOutcome {
    Completed(PairReport),
    Failed(PairFailure),
}

impl PairOutcome {
    pub fn pair(&self) -> &TransferPair {
        match self {
            PairOutcome::Completed(report) => &report.pair,
            PairOutcome::Failed(failure) => &failure.pair,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PairOutcome::Failed(_))
    }
}

/// Outcomes of a whole run, in pair order
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub outcomes: Vec<PairOutcome>,
}

impl BatchSummary {
    pub fn completed(&self) -> impl Iterator<Item = &PairReport> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            PairOutcome::Completed(report) => Some(report),
            PairOutcome::Failed(_) => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = &PairFailure> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            PairOutcome::Failed(failure) => Some(failure),
            PairOutcome::Completed(_) => None,
        })
    }

    /// Process exit status: `1` only when every pair failed
    ///
    /// Discrepancies found in a completed pair never affect the status.
    pub fn exit_code(&self) -> i32 {
        if !self.outcomes.is_empty() && self.outcomes.iter().all(PairOutcome::is_failed) {
            1
        } else {
            0
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for PairReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = &self.result;

        writeln!(f, "== {} ==", self.pair)?;
        writeln!(f, "Matched: {}", result.matched_count)?;

        if !result.mismatched.is_empty() {
            writeln!(f, "Size mismatches: {}", result.mismatched.len())?;
            for mismatch in &result.mismatched {
                writeln!(
                    f,
                    "  {} (source {} bytes, target {} bytes)",
                    mismatch.path, mismatch.source_size, mismatch.target_size
                )?;
            }
        }

        if !result.missing.is_empty() {
            writeln!(f, "Missing from target: {}", result.missing.len())?;
            for path in &result.missing {
                writeln!(f, "  {}", path)?;
            }
        }

        if !result.extra.is_empty() {
            writeln!(f, "Extra in target: {}", result.extra.len())?;
            for path in &result.extra {
                writeln!(f, "  {}", path)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for PairFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.pair)?;
        writeln!(f, "FAILED ({}): {}", self.kind, self.error)
    }
}

impl fmt::Display for PairOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairOutcome::Completed(report) => fmt::Display::fmt(report, f),
            PairOutcome::Failed(failure) => fmt::Display::fmt(failure, f),
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            writeln!(f, "{}", outcome)?;
        }

        let completed = self.completed().count();
        let failed = self.failed().count();
        let discrepancies: usize = self
            .completed()
            .map(|report| report.result.discrepancy_count())
            .sum();

        writeln!(
            f,
            "Summary: {} pair(s) verified, {} failed, {} discrepancy(ies)",
            completed, failed, discrepancies
        )
    }
}
