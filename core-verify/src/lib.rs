//! # Core Verify
//!
//! Cross-store file reconciliation for transfer verification.
//!
//! Given a recursive listing of a project folder (the source) and a
//! paginated listing of a bucket prefix (the target), decides whether every
//! source file arrived with its exact byte size and classifies every
//! discrepancy.
//!
//! ## Modules
//!
//! - [`path`]: canonical path normalization, the join key between stores
//! - [`listing`]: canonical path → size maps with collection statistics
//! - [`collector`]: builds listings from either store kind
//! - [`enricher`]: batched size lookup for project-tree listings
//! - [`reconciler`]: four-way partition of two listings
//! - [`report`]: per-pair reports, batch summary, text and JSON rendering
//! - [`coordinator`]: runs a batch of pairs, failing pairs individually

pub mod collector;
pub mod coordinator;
pub mod enricher;
pub mod error;
pub mod listing;
pub mod pair;
pub mod path;
pub mod reconciler;
pub mod report;

pub use collector::{ListingCollector, ListingSource};
pub use coordinator::VerificationCoordinator;
pub use enricher::BulkMetadataEnricher;
pub use error::{ErrorKind, Result, VerifyError};
pub use listing::{ListingMap, ListingStats, ObjectEntry, Side};
pub use pair::{parse_pairs, SourceLocation, TargetLocation, TransferPair};
pub use path::{normalize, Normalized};
pub use reconciler::{reconcile, ReconciliationResult, SizeMismatch};
pub use report::{BatchSummary, PairFailure, PairOutcome, PairReport};
