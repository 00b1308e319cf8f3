//! Listing collection.
//!
//! Builds a [`ListingMap`] from either kind of store. The two acquisition
//! paths differ (paginated flat listing vs. recursive tree listing plus size
//! enrichment) but both end in the same normalize-and-record step.

use crate::enricher::BulkMetadataEnricher;
use crate::error::{Result, VerifyError};
use crate::listing::{ListingMap, Side};
use crate::pair::{SourceLocation, TargetLocation};
use crate::path::{normalize, Normalized};
use bridge_traits::store::{BucketStore, ProjectStore};
use core_runtime::{CollectorSettings, DuplicatePolicy};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Where a listing comes from
#[derive(Clone)]
pub enum ListingSource {
    /// Flat bucket listing; the transfer target
    Bucket {
        store: Arc<dyn BucketStore>,
        location: TargetLocation,
    },
    /// Recursive project-tree listing; the transfer source
    ProjectTree {
        store: Arc<dyn ProjectStore>,
        location: SourceLocation,
    },
}

impl ListingSource {
    pub fn side(&self) -> Side {
        match self {
            ListingSource::Bucket { .. } => Side::Target,
            ListingSource::ProjectTree { .. } => Side::Source,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ListingSource::Bucket { location, .. } => location.to_string(),
            ListingSource::ProjectTree { location, .. } => location.to_string(),
        }
    }
}

/// Collects one side of a pair into a [`ListingMap`]
#[derive(Debug, Clone, Default)]
pub struct ListingCollector {
    settings: CollectorSettings,
}

impl ListingCollector {
    pub fn new(settings: CollectorSettings) -> Self {
        Self { settings }
    }

    /// Collect a full listing.
    ///
    /// Fails with [`VerifyError::Timeout`] when the side does not finish
    /// within the configured timeout and with [`VerifyError::EmptyListing`]
    /// when it yields no files. A partial listing is never returned.
    #[instrument(skip(self, source), fields(side = %source.side(), location = %source.describe()))]
    pub async fn collect(&self, source: &ListingSource) -> Result<ListingMap> {
        let side = source.side();
        let timeout = self.settings.operation_timeout;

        let listing = match tokio::time::timeout(timeout, self.collect_inner(source)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!("Listing did not finish within {:?}", timeout);
                return Err(VerifyError::Timeout {
                    side,
                    secs: timeout_secs(timeout),
                });
            }
        };

        if listing.is_empty() {
            return Err(VerifyError::EmptyListing {
                side,
                location: source.describe(),
            });
        }

        let stats = listing.stats();
        info!(
            files = listing.len(),
            bytes = listing.total_size(),
            markers = stats.directory_markers,
            anomalies = stats.prefix_anomalies,
            duplicates = stats.duplicates,
            "Listing collected"
        );

        Ok(listing)
    }

    async fn collect_inner(&self, source: &ListingSource) -> Result<ListingMap> {
        match source {
            ListingSource::Bucket { store, location } => {
                self.collect_bucket(store.as_ref(), location).await
            }
            ListingSource::ProjectTree { store, location } => {
                self.collect_project(store, location).await
            }
        }
    }

    async fn collect_bucket(
        &self,
        store: &dyn BucketStore,
        location: &TargetLocation,
    ) -> Result<ListingMap> {
        let side = Side::Target;
        let bucket = location.bucket.as_str();

        match store.bucket_exists(bucket).await {
            Ok(true) => {}
            Ok(false) => return Err(VerifyError::BucketNotFound(bucket.to_string())),
            Err(e) if e.is_not_found() => {
                return Err(VerifyError::BucketNotFound(bucket.to_string()))
            }
            Err(e) => return Err(VerifyError::listing(side, e)),
        }

        let listing_prefix = location.listing_prefix();
        let mut listing = ListingMap::new();
        let mut continuation: Option<String> = None;
        let mut page = 0usize;

        loop {
            page += 1;
            let (objects, next) = store
                .list_store_objects(bucket, listing_prefix.as_deref(), continuation.take())
                .await
                .map_err(|e| VerifyError::listing(side, e))?;

            debug!(
                "Page {}: {} object(s), more: {}",
                page,
                objects.len(),
                next.is_some()
            );

            for object in objects {
                self.record(
                    &mut listing,
                    side,
                    &object.key,
                    object.size,
                    location.prefix.as_deref(),
                )?;
            }

            match next {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }

        Ok(listing)
    }

    async fn collect_project(
        &self,
        store: &Arc<dyn ProjectStore>,
        location: &SourceLocation,
    ) -> Result<ListingMap> {
        let side = Side::Source;

        let project = store
            .resolve_project(&location.project)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    VerifyError::ProjectNotFound(location.project.clone())
                } else if e.is_ambiguous() {
                    VerifyError::AmbiguousProject {
                        project: location.project.clone(),
                        reason: e.to_string(),
                    }
                } else {
                    VerifyError::listing(side, e)
                }
            })?
            .ok_or_else(|| VerifyError::ProjectNotFound(location.project.clone()))?;

        debug!("Resolved project {} ({})", project.id, project.name);

        let folder = match &location.folder {
            Some(path) => {
                let not_found = || VerifyError::FolderNotFound {
                    project: project.id.clone(),
                    folder: path.clone(),
                };
                let folder = store
                    .resolve_folder(&project, path)
                    .await
                    .map_err(|e| {
                        if e.is_not_found() {
                            not_found()
                        } else {
                            VerifyError::listing(side, e)
                        }
                    })?
                    .ok_or_else(not_found)?;
                Some(folder)
            }
            None => None,
        };

        let nodes = store
            .recursive_list(&project, folder.as_ref())
            .await
            .map_err(|e| VerifyError::listing(side, e))?;

        let mut listing = ListingMap::new();
        let total = nodes.len() as u64;
        let mut files: Vec<_> = nodes.into_iter().filter(|node| node.is_file()).collect();
        {
            let stats = listing.stats_mut();
            stats.entries_seen += total - files.len() as u64;
            stats.directory_markers += total - files.len() as u64;
        }

        let missing_sizes = files.iter().filter(|node| node.size.is_none()).count();
        let enricher = BulkMetadataEnricher::new(Arc::clone(store));
        if !enricher.populate_sizes(&project, &mut files).await {
            return Err(VerifyError::EnrichmentFailed {
                project: project.id.clone(),
                count: missing_sizes,
            });
        }

        let strip_prefix = folder.as_ref().map(|f| f.path.as_str());
        for node in files {
            // Enrichment succeeded, so every file carries a size
            let Some(size) = node.size else {
                return Err(VerifyError::EnrichmentFailed {
                    project: project.id.clone(),
                    count: 1,
                });
            };
            self.record(&mut listing, side, &node.path, size, strip_prefix)?;
        }

        Ok(listing)
    }

    /// Normalize one raw entry and record it, applying the duplicate policy
    fn record(
        &self,
        listing: &mut ListingMap,
        side: Side,
        raw_key: &str,
        size: u64,
        strip_prefix: Option<&str>,
    ) -> Result<()> {
        listing.stats_mut().entries_seen += 1;

        let path = match normalize(raw_key, strip_prefix) {
            Normalized::Canonical(path) => path,
            Normalized::PrefixMismatch(path) => {
                warn!(
                    "Key '{}' is outside prefix '{}', keeping it unmodified",
                    raw_key,
                    strip_prefix.unwrap_or_default()
                );
                listing.stats_mut().prefix_anomalies += 1;
                path
            }
            Normalized::DirectoryMarker => {
                listing.stats_mut().directory_markers += 1;
                return Ok(());
            }
        };

        if listing.contains(&path) {
            if self.settings.duplicate_policy == DuplicatePolicy::Reject {
                return Err(VerifyError::DuplicatePath { side, path });
            }
            warn!("Duplicate path '{}' in {} listing, keeping last size", path, side);
        }

        listing.insert(path, size);
        Ok(())
    }
}

fn timeout_secs(timeout: Duration) -> u64 {
    timeout.as_secs().max(u64::from(timeout.subsec_nanos() > 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collector(policy: DuplicatePolicy) -> ListingCollector {
        ListingCollector::new(CollectorSettings {
            duplicate_policy: policy,
            ..Default::default()
        })
    }

    #[test]
    fn test_record_counts_markers_and_anomalies() {
        let collector = collector(DuplicatePolicy::Overwrite);
        let mut listing = ListingMap::new();

        collector
            .record(&mut listing, Side::Target, "proj/", 0, Some("proj"))
            .unwrap();
        collector
            .record(&mut listing, Side::Target, "proj/a.txt", 5, Some("proj"))
            .unwrap();
        collector
            .record(&mut listing, Side::Target, "stray.txt", 7, Some("proj"))
            .unwrap();

        let stats = listing.stats();
        assert_eq!(stats.entries_seen, 3);
        assert_eq!(stats.directory_markers, 1);
        assert_eq!(stats.prefix_anomalies, 1);
        assert_eq!(listing.get("a.txt"), Some(5));
        assert_eq!(listing.get("stray.txt"), Some(7));
    }

    #[test]
    fn test_record_overwrites_duplicates_by_default() {
        let collector = collector(DuplicatePolicy::Overwrite);
        let mut listing = ListingMap::new();

        collector
            .record(&mut listing, Side::Source, "/a.txt", 1, None)
            .unwrap();
        collector
            .record(&mut listing, Side::Source, "a.txt", 2, None)
            .unwrap();

        assert_eq!(listing.len(), 1);
        assert_eq!(listing.get("a.txt"), Some(2));
        assert_eq!(listing.stats().duplicates, 1);
    }

    #[test]
    fn test_record_rejects_duplicates_when_configured() {
        let collector = collector(DuplicatePolicy::Reject);
        let mut listing = ListingMap::new();

        collector
            .record(&mut listing, Side::Source, "/a.txt", 1, None)
            .unwrap();
        let err = collector
            .record(&mut listing, Side::Source, "a.txt", 2, None)
            .unwrap_err();

        assert!(matches!(err, VerifyError::DuplicatePath { side: Side::Source, .. }));
        assert_eq!(listing.get("a.txt"), Some(1));
    }

    #[test]
    fn test_timeout_secs_rounds_up() {
        assert_eq!(timeout_secs(Duration::from_secs(30)), 30);
        assert_eq!(timeout_secs(Duration::from_millis(50)), 1);
    }
}
