//! # Verification Coordinator
//!
//! Runs a batch of transfer pairs through collection, reconciliation and
//! reporting.
//!
//! ## Workflow
//!
//! For each pair, in the order given:
//! 1. Collect the source (project tree) and target (bucket) listings
//!    concurrently; both must finish before anything is compared
//! 2. Reconcile the two listings
//! 3. Record a [`PairOutcome`]
//!
//! A pair that fails to resolve or collect is recorded as failed and the
//! batch moves on. Nothing a single pair does can end the batch.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_verify::{parse_pairs, VerificationCoordinator};
//!
//! let pairs = parse_pairs(&config.pairs)?;
//! let coordinator = VerificationCoordinator::new(bucket_store, project_store, config.collector);
//! let summary = coordinator.run(&pairs).await;
//! print!("{}", summary);
//! std::process::exit(summary.exit_code());
//! ```

use crate::collector::{ListingCollector, ListingSource};
use crate::error::Result;
use crate::pair::TransferPair;
use crate::reconciler::reconcile;
use crate::report::{BatchSummary, PairFailure, PairOutcome, PairReport};
use bridge_traits::store::{BucketStore, ProjectStore};
use chrono::Utc;
use core_runtime::CollectorSettings;
use futures::future::try_join;
use std::sync::Arc;
use tracing::{error, info, instrument};

pub struct VerificationCoordinator {
    bucket_store: Arc<dyn BucketStore>,
    project_store: Arc<dyn ProjectStore>,
    collector: ListingCollector,
}

impl VerificationCoordinator {
    pub fn new(
        bucket_store: Arc<dyn BucketStore>,
        project_store: Arc<dyn ProjectStore>,
        settings: CollectorSettings,
    ) -> Self {
        Self {
            bucket_store,
            project_store,
            collector: ListingCollector::new(settings),
        }
    }

    /// Verify one pair.
    ///
    /// Returns an error when either side fails to resolve or collect; the
    /// reconciliation itself never fails.
    #[instrument(skip(self, pair), fields(pair = %pair))]
    pub async fn verify_pair(&self, pair: &TransferPair) -> Result<PairReport> {
        let started_at = Utc::now();

        let source = ListingSource::ProjectTree {
            store: Arc::clone(&self.project_store),
            location: pair.source.clone(),
        };
        let target = ListingSource::Bucket {
            store: Arc::clone(&self.bucket_store),
            location: pair.target.clone(),
        };

        info!("Phase 1: Collecting listings");
        let (source_listing, target_listing) =
            try_join(self.collector.collect(&source), self.collector.collect(&target)).await?;

        info!(
            "Phase 2: Reconciling {} source and {} target file(s)",
            source_listing.len(),
            target_listing.len()
        );
        let result = reconcile(&source_listing, &target_listing);

        info!(
            matched = result.matched_count,
            mismatched = result.mismatched.len(),
            missing = result.missing.len(),
            extra = result.extra.len(),
            "Pair verified"
        );

        Ok(PairReport {
            pair: pair.clone(),
            result,
            source_stats: source_listing.stats(),
            target_stats: target_listing.stats(),
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Verify every pair in order, continuing past failed pairs.
    pub async fn run(&self, pairs: &[TransferPair]) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for (index, pair) in pairs.iter().enumerate() {
            info!("Verifying pair {}/{}: {}", index + 1, pairs.len(), pair);

            let outcome = match self.verify_pair(pair).await {
                Ok(report) => PairOutcome::Completed(report),
                Err(e) => {
                    error!("Pair {} failed ({}): {}", pair, e.kind(), e);
                    PairOutcome::Failed(PairFailure::new(pair.clone(), &e))
                }
            };

            summary.outcomes.push(outcome);
        }

        info!(
            "Batch finished: {} completed, {} failed",
            summary.completed().count(),
            summary.failed().count()
        );

        summary
    }
}
