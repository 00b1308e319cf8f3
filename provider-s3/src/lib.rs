//! # S3 Provider
//!
//! Implements the `BucketStore` trait over `aws-sdk-s3`: bucket existence
//! checks with `HeadBucket` and paginated `ListObjectsV2` listings.

pub mod client;
pub mod error;

pub use client::S3BucketStore;
pub use error::{Result, S3Error};
