//! Source/target descriptors and the pair they form.

use crate::error::{Result, VerifyError};
use core_runtime::PairSpec;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const S3_SCHEME: &str = "s3://";

/// A project, optionally narrowed to a folder: `PROJECT[:/FOLDER]`
///
/// The project part may be an ID (`project-G1abc`) or a name. Everything
/// after the first `:` is the folder path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub project: String,
    /// Absolute folder path (`/runs/2024`); `None` means the project root
    pub folder: Option<String>,
}

impl FromStr for SourceLocation {
    type Err = VerifyError;

    fn from_str(input: &str) -> Result<Self> {
        let invalid = |reason: &str| VerifyError::InvalidSource {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (project, folder) = match input.split_once(':') {
            Some((project, folder)) => (project.trim(), Some(folder.trim())),
            None => (input.trim(), None),
        };

        if project.is_empty() {
            return Err(invalid("missing project"));
        }

        let folder = folder
            .map(|f| f.trim_matches('/'))
            .filter(|f| !f.is_empty())
            .map(|f| format!("/{}", f));

        Ok(Self {
            project: project.to_string(),
            folder,
        })
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.folder {
            Some(folder) => write!(f, "{}:{}", self.project, folder),
            None => f.write_str(&self.project),
        }
    }
}

/// A bucket, optionally narrowed to a key prefix: `[s3://]BUCKET[/PREFIX]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetLocation {
    pub bucket: String,
    /// Key prefix without leading or trailing separators
    pub prefix: Option<String>,
}

impl TargetLocation {
    /// Prefix to hand to the store: the configured prefix plus a trailing `/`
    ///
    /// Listing `runs/2024/` rather than `runs/2024` keeps sibling keys such as
    /// `runs/20245/...` out of the listing.
    pub fn listing_prefix(&self) -> Option<String> {
        self.prefix.as_ref().map(|p| format!("{}/", p))
    }
}

impl FromStr for TargetLocation {
    type Err = VerifyError;

    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let without_scheme = trimmed.strip_prefix(S3_SCHEME).unwrap_or(trimmed);

        let (bucket, prefix) = match without_scheme.split_once('/') {
            Some((bucket, prefix)) => (bucket, Some(prefix)),
            None => (without_scheme, None),
        };

        if bucket.is_empty() {
            return Err(VerifyError::InvalidTarget {
                input: input.to_string(),
                reason: "missing bucket".to_string(),
            });
        }

        let prefix = prefix
            .map(|p| p.trim_matches('/'))
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Ok(Self {
            bucket: bucket.to_string(),
            prefix,
        })
    }
}

impl fmt::Display for TargetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}{}/{}", S3_SCHEME, self.bucket, prefix),
            None => write!(f, "{}{}", S3_SCHEME, self.bucket),
        }
    }
}

/// One (source, target) comparison unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferPair {
    pub source: SourceLocation,
    pub target: TargetLocation,
}

impl TransferPair {
    pub fn new(source: SourceLocation, target: TargetLocation) -> Self {
        Self { source, target }
    }

    pub fn from_spec(spec: &PairSpec) -> Result<Self> {
        Ok(Self {
            source: spec.source.parse()?,
            target: spec.target.parse()?,
        })
    }
}

impl fmt::Display for TransferPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Parse every configured pair, failing on the first malformed descriptor
pub fn parse_pairs(specs: &[PairSpec]) -> Result<Vec<TransferPair>> {
    specs.iter().map(TransferPair::from_spec).collect()
}
