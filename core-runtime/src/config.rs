//! # Verification Configuration
//!
//! Builder-based configuration for a verification run.
//!
//! ## Overview
//!
//! [`VerifyConfig`] holds everything a run needs before the first pair is
//! processed: the credential selector (division + profile), the credential
//! files, the ordered source/target pairs and the collector settings. The
//! builder fails fast: every configuration error is reported before any store
//! is contacted, and the config is passed explicitly to whatever needs it.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::VerifyConfig;
//!
//! let config = VerifyConfig::builder()
//!     .division("genomics")
//!     .profile("prod")
//!     .dnanexus_credentials("/etc/xfer/dnanexus.json")
//!     .aws_credentials("/etc/xfer/aws.json")
//!     .source("project-G1abc:/runs/2024")
//!     .target("s3://archive/runs/2024")
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.pairs.len(), 1);
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::VerifyConfig;
//!
//! // Two sources, one target
//! VerifyConfig::builder()
//!     .division("genomics")
//!     .profile("prod")
//!     .dnanexus_credentials("dx.json")
//!     .aws_credentials("aws.json")
//!     .source("project-a")
//!     .source("project-b")
//!     .target("s3://archive/a")
//!     .build()
//!     .expect("Should fail - unequal pair counts");
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default timeout for one side's listing collection
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// What to do when a store reports the same canonical path twice in one listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the last-seen size, count and log the duplicate
    #[default]
    Overwrite,
    /// Fail the pair
    Reject,
}

/// Listing collection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorSettings {
    /// Upper bound for collecting one side of a pair
    pub operation_timeout: Duration,

    /// Duplicate canonical path handling
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

/// One unparsed source/target descriptor pair, in the order given
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSpec {
    pub source: String,
    pub target: String,
}

/// Configuration for a verification run. Use [`VerifyConfig::builder`].
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Credential selector: organisational division
    pub division: String,

    /// Credential selector: profile within the division
    pub profile: String,

    /// JSON file holding project-store API tokens
    pub dnanexus_credentials_path: PathBuf,

    /// JSON file holding bucket-store access keys
    pub aws_credentials_path: PathBuf,

    /// Pairs to verify, processed in order
    pub pairs: Vec<PairSpec>,

    pub collector: CollectorSettings,
}

impl VerifyConfig {
    pub fn builder() -> VerifyConfigBuilder {
        VerifyConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// Checks that the selector values are non-blank, at least one pair is
    /// present, no descriptor is blank and the timeout is non-zero.
    pub fn validate(&self) -> Result<()> {
        if self.division.trim().is_empty() {
            return Err(Error::Config("Division cannot be empty".to_string()));
        }

        if self.profile.trim().is_empty() {
            return Err(Error::Config("Profile cannot be empty".to_string()));
        }

        if self.pairs.is_empty() {
            return Err(Error::Config(
                "At least one --source/--target pair is required".to_string(),
            ));
        }

        for (index, pair) in self.pairs.iter().enumerate() {
            if pair.source.trim().is_empty() || pair.target.trim().is_empty() {
                return Err(Error::Config(format!(
                    "Pair {} has an empty source or target",
                    index + 1
                )));
            }
        }

        if self.collector.operation_timeout.is_zero() {
            return Err(Error::Config(
                "Operation timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`VerifyConfig`].
#[derive(Debug, Default)]
pub struct VerifyConfigBuilder {
    division: Option<String>,
    profile: Option<String>,
    dnanexus_credentials_path: Option<PathBuf>,
    aws_credentials_path: Option<PathBuf>,
    sources: Vec<String>,
    targets: Vec<String>,
    collector: CollectorSettings,
}

impl VerifyConfigBuilder {
    pub fn division(mut self, division: impl Into<String>) -> Self {
        self.division = Some(division.into());
        self
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn dnanexus_credentials<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.dnanexus_credentials_path = Some(path.into());
        self
    }

    pub fn aws_credentials<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.aws_credentials_path = Some(path.into());
        self
    }

    /// Append a source descriptor. Sources pair with targets by position.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }

    /// Append a target descriptor. Targets pair with sources by position.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.targets.push(target.into());
        self
    }

    pub fn sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources.extend(sources.into_iter().map(Into::into));
        self
    }

    pub fn targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets.extend(targets.into_iter().map(Into::into));
        self
    }

    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.collector.operation_timeout = timeout;
        self
    }

    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.collector.duplicate_policy = policy;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] when division, profile or a credentials path is
    ///   missing, no pair was given, or a value is invalid
    /// - [`Error::PairCountMismatch`] when sources and targets differ in number
    pub fn build(self) -> Result<VerifyConfig> {
        let division = self.division.ok_or_else(|| {
            Error::Config("Division is required. Use --division to set it.".to_string())
        })?;

        let profile = self.profile.ok_or_else(|| {
            Error::Config("Profile is required. Use --profile to set it.".to_string())
        })?;

        let dnanexus_credentials_path = self.dnanexus_credentials_path.ok_or_else(|| {
            Error::Config(
                "DNAnexus credentials file is required. Use --dnanexus-credentials to set it."
                    .to_string(),
            )
        })?;

        let aws_credentials_path = self.aws_credentials_path.ok_or_else(|| {
            Error::Config(
                "AWS credentials file is required. Use --aws-credentials to set it.".to_string(),
            )
        })?;

        if self.sources.len() != self.targets.len() {
            return Err(Error::PairCountMismatch {
                sources: self.sources.len(),
                targets: self.targets.len(),
            });
        }

        let pairs = self
            .sources
            .into_iter()
            .zip(self.targets)
            .map(|(source, target)| PairSpec { source, target })
            .collect();

        let config = VerifyConfig {
            division,
            profile,
            dnanexus_credentials_path,
            aws_credentials_path,
            pairs,
            collector: self.collector,
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_builder() -> VerifyConfigBuilder {
        VerifyConfig::builder()
            .division("genomics")
            .profile("prod")
            .dnanexus_credentials("/etc/xfer/dx.json")
            .aws_credentials("/etc/xfer/aws.json")
    }

    #[test]
    fn test_builder_with_all_required_fields() {
        let config = complete_builder()
            .source("project-a:/runs")
            .target("s3://archive/runs")
            .build()
            .unwrap();

        assert_eq!(config.division, "genomics");
        assert_eq!(config.profile, "prod");
        assert_eq!(
            config.pairs,
            vec![PairSpec {
                source: "project-a:/runs".to_string(),
                target: "s3://archive/runs".to_string(),
            }]
        );
        assert_eq!(config.collector, CollectorSettings::default());
    }

    #[test]
    fn test_builder_requires_division() {
        let result = VerifyConfig::builder()
            .profile("prod")
            .dnanexus_credentials("dx.json")
            .aws_credentials("aws.json")
            .source("project-a")
            .target("bucket")
            .build();

        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Division is required"));
    }

    #[test]
    fn test_builder_requires_profile() {
        let result = VerifyConfig::builder()
            .division("genomics")
            .dnanexus_credentials("dx.json")
            .aws_credentials("aws.json")
            .source("project-a")
            .target("bucket")
            .build();

        assert!(result.unwrap_err().to_string().contains("Profile is required"));
    }

    #[test]
    fn test_builder_requires_credentials_paths() {
        let result = VerifyConfig::builder()
            .division("genomics")
            .profile("prod")
            .aws_credentials("aws.json")
            .source("project-a")
            .target("bucket")
            .build();
        assert!(result.unwrap_err().to_string().contains("DNAnexus credentials"));

        let result = VerifyConfig::builder()
            .division("genomics")
            .profile("prod")
            .dnanexus_credentials("dx.json")
            .source("project-a")
            .target("bucket")
            .build();
        assert!(result.unwrap_err().to_string().contains("AWS credentials"));
    }

    #[test]
    fn test_builder_requires_a_pair() {
        let result = complete_builder().build();

        assert!(result
            .unwrap_err()
            .to_string()
            .contains("At least one --source/--target pair"));
    }

    #[test]
    fn test_builder_rejects_unequal_pair_counts() {
        let result = complete_builder()
            .sources(["project-a", "project-b"])
            .target("bucket/a")
            .build();

        assert!(matches!(
            result,
            Err(Error::PairCountMismatch {
                sources: 2,
                targets: 1
            })
        ));
    }

    #[test]
    fn test_pairs_keep_positional_order() {
        let config = complete_builder()
            .sources(["project-a", "project-b", "project-c"])
            .targets(["bucket/a", "bucket/b", "bucket/c"])
            .build()
            .unwrap();

        let sources: Vec<_> = config.pairs.iter().map(|p| p.source.as_str()).collect();
        let targets: Vec<_> = config.pairs.iter().map(|p| p.target.as_str()).collect();
        assert_eq!(sources, ["project-a", "project-b", "project-c"]);
        assert_eq!(targets, ["bucket/a", "bucket/b", "bucket/c"]);
    }

    #[test]
    fn test_validate_rejects_blank_values() {
        let result = complete_builder()
            .division("  ")
            .source("project-a")
            .target("bucket")
            .build();
        assert!(result.unwrap_err().to_string().contains("Division cannot be empty"));

        let result = complete_builder().source("").target("bucket").build();
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Pair 1 has an empty source or target"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let result = complete_builder()
            .source("project-a")
            .target("bucket")
            .operation_timeout(Duration::ZERO)
            .build();

        assert!(result.unwrap_err().to_string().contains("greater than zero"));
    }

    #[test]
    fn test_collector_settings_overrides() {
        let config = complete_builder()
            .source("project-a")
            .target("bucket")
            .operation_timeout(Duration::from_secs(5))
            .duplicate_policy(DuplicatePolicy::Reject)
            .build()
            .unwrap();

        assert_eq!(config.collector.operation_timeout, Duration::from_secs(5));
        assert_eq!(config.collector.duplicate_policy, DuplicatePolicy::Reject);
    }

    #[test]
    fn test_duplicate_policy_default_is_overwrite() {
        assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::Overwrite);
    }
}
