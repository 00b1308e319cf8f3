use crate::listing::Side;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failure classes, used to decide scope and to label failed pairs in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Bad input; fatal before any pair is processed
    Configuration,
    /// A project, folder or bucket could not be found; fatal to one pair
    Resolution,
    /// Listing or enrichment failed; fatal to one pair
    Collection,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Configuration => f.write_str("configuration"),
            ErrorKind::Resolution => f.write_str("resolution"),
            ErrorKind::Collection => f.write_str("collection"),
        }
    }
}

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Invalid source '{input}': {reason}")]
    InvalidSource { input: String, reason: String },

    #[error("Invalid target '{input}': {reason}")]
    InvalidTarget { input: String, reason: String },

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Project '{project}' could not be resolved: {reason}")]
    AmbiguousProject { project: String, reason: String },

    #[error("Folder '{folder}' not found in project {project}")]
    FolderNotFound { project: String, folder: String },

    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Failed to list {side} store: {message}")]
    Listing { side: Side, message: String },

    #[error("{side} listing for {location} is empty")]
    EmptyListing { side: Side, location: String },

    #[error("Bulk size lookup failed for {count} file(s) in project {project}")]
    EnrichmentFailed { project: String, count: usize },

    #[error("Duplicate path '{path}' in {side} listing")]
    DuplicatePath { side: Side, path: String },

    #[error("{side} listing timed out after {secs} seconds")]
    Timeout { side: Side, secs: u64 },
}

impl VerifyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VerifyError::InvalidSource { .. } | VerifyError::InvalidTarget { .. } => {
                ErrorKind::Configuration
            }
            VerifyError::ProjectNotFound(_)
            | VerifyError::AmbiguousProject { .. }
            | VerifyError::FolderNotFound { .. }
            | VerifyError::BucketNotFound(_) => ErrorKind::Resolution,
            VerifyError::Listing { .. }
            | VerifyError::EmptyListing { .. }
            | VerifyError::EnrichmentFailed { .. }
            | VerifyError::DuplicatePath { .. }
            | VerifyError::Timeout { .. } => ErrorKind::Collection,
        }
    }

    pub(crate) fn listing(side: Side, error: impl fmt::Display) -> Self {
        VerifyError::Listing {
            side,
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VerifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            VerifyError::ProjectNotFound("project-x".into()).kind(),
            ErrorKind::Resolution
        );
        assert_eq!(
            VerifyError::AmbiguousProject {
                project: "demo".into(),
                reason: "2 matches".into()
            }
            .kind(),
            ErrorKind::Resolution
        );
        assert_eq!(
            VerifyError::EmptyListing {
                side: Side::Target,
                location: "s3://bucket".into()
            }
            .kind(),
            ErrorKind::Collection
        );
        assert_eq!(
            VerifyError::InvalidTarget {
                input: "".into(),
                reason: "empty".into()
            }
            .kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_error_display() {
        let error = VerifyError::Timeout {
            side: Side::Source,
            secs: 30,
        };
        assert_eq!(error.to_string(), "source listing timed out after 30 seconds");

        let error = VerifyError::FolderNotFound {
            project: "project-G1".into(),
            folder: "/runs".into(),
        };
        assert_eq!(
            error.to_string(),
            "Folder '/runs' not found in project project-G1"
        );
    }
}
