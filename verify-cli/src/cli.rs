//! Command-line arguments.

use clap::Parser;
use core_runtime::logging::{LogFormat, LogLevel, LoggingConfig};
use core_runtime::{DuplicatePolicy, Result, VerifyConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Verify that files copied from DNAnexus projects arrived intact in S3
///
/// Each `--source` pairs with the `--target` in the same position. Files are
/// matched by relative path and compared by exact byte size.
#[derive(Parser, Debug)]
#[command(name = "xfer-verify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source project, optionally narrowed to a folder (repeatable)
    #[arg(long = "source", value_name = "PROJECT[:/FOLDER]")]
    pub sources: Vec<String>,

    /// Target bucket, optionally narrowed to a prefix (repeatable)
    #[arg(long = "target", value_name = "[s3://]BUCKET[/PREFIX]")]
    pub targets: Vec<String>,

    /// Division selecting the credential entries
    #[arg(long, env = "XFER_VERIFY_DIVISION")]
    pub division: Option<String>,

    /// Profile within the division
    #[arg(long, env = "XFER_VERIFY_PROFILE")]
    pub profile: Option<String>,

    /// JSON file with DNAnexus API tokens
    #[arg(long, value_name = "FILE", env = "XFER_VERIFY_DNANEXUS_CREDENTIALS")]
    pub dnanexus_credentials: Option<PathBuf>,

    /// JSON file with AWS access keys
    #[arg(long, value_name = "FILE", env = "XFER_VERIFY_AWS_CREDENTIALS")]
    pub aws_credentials: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Log level for this tool's own crates (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "XFER_VERIFY_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log format (compact, pretty, json)
    #[arg(long, default_value = "compact")]
    pub log_format: LogFormat,

    /// Give up on one side of a pair after this many seconds
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 1800,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Fail a pair when a store lists the same path twice
    #[arg(long)]
    pub reject_duplicates: bool,
}

impl Cli {
    /// Build and validate the run configuration
    pub fn to_config(&self) -> Result<VerifyConfig> {
        let mut builder = VerifyConfig::builder()
            .sources(self.sources.iter().cloned())
            .targets(self.targets.iter().cloned())
            .operation_timeout(Duration::from_secs(self.timeout_secs));

        if let Some(division) = &self.division {
            builder = builder.division(division.clone());
        }
        if let Some(profile) = &self.profile {
            builder = builder.profile(profile.clone());
        }
        if let Some(path) = &self.dnanexus_credentials {
            builder = builder.dnanexus_credentials(path.clone());
        }
        if let Some(path) = &self.aws_credentials {
            builder = builder.aws_credentials(path.clone());
        }
        if self.reject_duplicates {
            builder = builder.duplicate_policy(DuplicatePolicy::Reject);
        }

        builder.build()
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::default()
            .with_format(self.log_format)
            .with_level(self.log_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_runtime::Error;

    const BASE_ARGS: &[&str] = &[
        "xfer-verify",
        "--division",
        "genomics",
        "--profile",
        "prod",
        "--dnanexus-credentials",
        "dx.json",
        "--aws-credentials",
        "aws.json",
    ];

    fn parse(extra: &[&str]) -> Cli {
        let args: Vec<&str> = BASE_ARGS.iter().chain(extra).copied().collect();
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_pairs_follow_argument_order() {
        let cli = parse(&[
            "--source",
            "project-a:/runs",
            "--target",
            "s3://archive/runs",
            "--source",
            "project-b",
            "--target",
            "archive/b",
        ]);

        let config = cli.to_config().unwrap();

        assert_eq!(config.pairs.len(), 2);
        assert_eq!(config.pairs[0].source, "project-a:/runs");
        assert_eq!(config.pairs[0].target, "s3://archive/runs");
        assert_eq!(config.pairs[1].source, "project-b");
        assert_eq!(config.pairs[1].target, "archive/b");
        assert_eq!(config.division, "genomics");
        assert_eq!(config.collector.duplicate_policy, DuplicatePolicy::Overwrite);
    }

    #[test]
    fn test_unequal_pair_counts_rejected() {
        let cli = parse(&["--source", "project-a", "--source", "project-b", "--target", "archive"]);

        assert!(matches!(
            cli.to_config(),
            Err(Error::PairCountMismatch {
                sources: 2,
                targets: 1
            })
        ));
    }

    #[test]
    fn test_no_pairs_rejected() {
        let cli = parse(&[]);

        assert!(matches!(cli.to_config(), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_division_rejected() {
        let mut cli = parse(&["--source", "project-a", "--target", "archive"]);
        cli.division = None;

        let err = cli.to_config().unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("--division"));
    }

    #[test]
    fn test_run_options() {
        let cli = parse(&[
            "--source",
            "project-a",
            "--target",
            "archive",
            "--timeout-secs",
            "60",
            "--reject-duplicates",
            "--json",
            "--log-level",
            "debug",
            "--log-format",
            "json",
        ]);

        let config = cli.to_config().unwrap();
        let logging = cli.logging_config();

        assert!(cli.json);
        assert_eq!(config.collector.operation_timeout, Duration::from_secs(60));
        assert_eq!(config.collector.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(logging.level, LogLevel::Debug);
        assert_eq!(logging.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_rejected_by_parser() {
        let zero_timeout: Vec<&str> = BASE_ARGS
            .iter()
            .copied()
            .chain(["--timeout-secs", "0"])
            .collect();
        let bad_level: Vec<&str> = BASE_ARGS
            .iter()
            .copied()
            .chain(["--log-level", "loud"])
            .collect();

        assert!(Cli::try_parse_from(zero_timeout).is_err());
        assert!(Cli::try_parse_from(bad_level).is_err());
    }
}
