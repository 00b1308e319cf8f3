//! # Store Bridge Traits
//!
//! Collaborator contracts between the verification core and the stores it
//! compares.
//!
//! ## Overview
//!
//! The core never talks to a network API directly. Each trait below is a
//! capability the core requires and a provider crate implements:
//!
//! - [`BucketStore`](store::BucketStore) - paginated, prefix-scoped object listings
//! - [`ProjectStore`](store::ProjectStore) - project/folder resolution, recursive
//!   listings and batched size lookups
//! - [`HttpClient`](http::HttpClient) - JSON-over-HTTPS transport for API-backed providers
//!
//! | Store | Implementation Crate |
//! |-------|---------------------|
//! | S3 buckets | `provider-s3` |
//! | DNAnexus projects | `provider-dnanexus` |
//! | HTTP transport | `bridge-desktop` |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should report missing resources as `NotFound` (or `Ok(None)` where the
//! signature allows) so the core can tell a resolution failure from a
//! transport failure.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so one provider instance can serve
//! every pair in a batch.

pub mod error;
pub mod http;
pub mod store;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use store::{
    BucketStore, FolderHandle, NodeKind, ProjectHandle, ProjectNode, ProjectStore, StoreObject,
};
