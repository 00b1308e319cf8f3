//! Bulk size enrichment for project-tree listings.
//!
//! Recursive project listings may come back without sizes. Rather than one
//! metadata round-trip per file, every missing size is requested in a single
//! batched call before the listing is normalized.

use bridge_traits::store::{ProjectHandle, ProjectNode, ProjectStore};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub struct BulkMetadataEnricher {
    store: Arc<dyn ProjectStore>,
}

impl BulkMetadataEnricher {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self { store }
    }

    /// Fill in every missing file size with one batched lookup.
    ///
    /// Returns `false` when the lookup fails or leaves any requested file
    /// without a size; in that case no node is modified. Returns `true`
    /// without calling the store when no file lacks a size.
    #[instrument(skip(self, project, nodes), fields(project = %project.id, nodes = nodes.len()))]
    pub async fn populate_sizes(&self, project: &ProjectHandle, nodes: &mut [ProjectNode]) -> bool {
        let file_ids: Vec<String> = nodes
            .iter()
            .filter(|node| node.is_file() && node.size.is_none())
            .map(|node| node.id.clone())
            .collect();

        if file_ids.is_empty() {
            debug!("All file sizes already present, skipping bulk lookup");
            return true;
        }

        debug!("Requesting sizes for {} file(s)", file_ids.len());

        let sizes = match self.store.bulk_populate_sizes(project, &file_ids).await {
            Ok(sizes) => sizes,
            Err(e) => {
                warn!("Bulk size lookup failed: {}", e);
                return false;
            }
        };

        let unresolved = file_ids
            .iter()
            .filter(|id| !sizes.contains_key(id.as_str()))
            .count();
        if unresolved > 0 {
            warn!(
                "Bulk size lookup left {} of {} file(s) without a size",
                unresolved,
                file_ids.len()
            );
            return false;
        }

        for node in nodes
            .iter_mut()
            .filter(|node| node.is_file() && node.size.is_none())
        {
            node.size = sizes.get(&node.id).copied();
        }

        true
    }
}
