//! Object Store Abstractions
//!
//! Contracts for the two kinds of store a transfer is verified between:
//!
//! - [`BucketStore`]: flat key space with prefix scoping and paginated
//!   listings (S3-style buckets). Used as the transfer target.
//! - [`ProjectStore`]: project containing a folder tree, listed recursively
//!   (DNAnexus-style projects). Used as the transfer source.
//!
//! Authentication, transport and retry are the implementation's concern.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;

/// One object reported by a bucket listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreObject {
    /// Full object key, including any prefix
    pub key: String,
    /// Object size in bytes
    pub size: u64,
}

impl StoreObject {
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
        }
    }
}

/// Flat, prefix-scoped object store
///
/// # Example
///
/// ```ignore
/// use bridge_traits::store::BucketStore;
///
/// async fn count(store: &dyn BucketStore) -> bridge_traits::error::Result<usize> {
///     let mut total = 0;
///     let mut token = None;
///     loop {
///         let (objects, next) = store.list_store_objects("bucket", Some("run1/"), token).await?;
///         total += objects.len();
///         token = next;
///         if token.is_none() {
///             break;
///         }
///     }
///     Ok(total)
/// }
/// ```
#[async_trait]
pub trait BucketStore: Send + Sync {
    /// Check whether the bucket exists and is reachable with the current credentials
    async fn bucket_exists(&self, bucket: &str) -> Result<bool>;

    /// Fetch one page of objects under `prefix`
    ///
    /// Returns the page and the continuation token for the next one. `None`
    /// signals the listing is exhausted.
    async fn list_store_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        continuation: Option<String>,
    ) -> Result<(Vec<StoreObject>, Option<String>)>;
}

/// A resolved project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectHandle {
    pub id: String,
    pub name: String,
}

/// A resolved folder inside a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderHandle {
    pub project_id: String,
    /// Absolute folder path inside the project, e.g. `/runs/2024`
    pub path: String,
}

/// Kind of a project tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

/// One node of a recursive project listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectNode {
    /// Store-side handle, used for metadata lookups
    pub id: String,
    /// Absolute path inside the project, e.g. `/runs/2024/sample.bam`
    pub path: String,
    pub kind: NodeKind,
    /// Size in bytes, when the listing call returned it
    pub size: Option<u64>,
}

impl ProjectNode {
    pub fn file(id: impl Into<String>, path: impl Into<String>, size: Option<u64>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            kind: NodeKind::File,
            size,
        }
    }

    pub fn folder(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            id: path.clone(),
            path,
            kind: NodeKind::Folder,
            size: None,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }
}

/// Project/folder tree store
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Resolve a project by ID or name. `Ok(None)` when it does not exist.
    async fn resolve_project(&self, identifier: &str) -> Result<Option<ProjectHandle>>;

    /// Resolve a folder path inside a project. `Ok(None)` when it does not exist.
    async fn resolve_folder(
        &self,
        project: &ProjectHandle,
        folder_path: &str,
    ) -> Result<Option<FolderHandle>>;

    /// List every node below `folder` (or the project root), recursively
    async fn recursive_list(
        &self,
        project: &ProjectHandle,
        folder: Option<&FolderHandle>,
    ) -> Result<Vec<ProjectNode>>;

    /// Look up sizes for many files in one batched call
    ///
    /// Returns a map from file ID to size in bytes. IDs the store could not
    /// describe are absent from the map.
    async fn bulk_populate_sizes(
        &self,
        project: &ProjectHandle,
        file_ids: &[String],
    ) -> Result<HashMap<String, u64>>;
}
