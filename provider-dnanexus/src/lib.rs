//! # DNAnexus Provider
//!
//! Implements the `ProjectStore` trait over the DNAnexus JSON API.
//!
//! ## Overview
//!
//! This module provides:
//! - Project resolution by ID (`project-...`) or by exact name
//! - Folder resolution inside a project
//! - Recursive, paginated file listings under a folder
//! - Batched size lookups for files listed without a size

pub mod connector;
pub mod error;
pub mod types;

pub use connector::DnanexusConnector;
pub use error::{DnanexusError, Result};
