//! xfer-verify: checks a batch of DNAnexus → S3 transfers.
//!
//! Reports go to stdout, logs to stderr. Exit status:
//! - `0` when every pair ran, whatever discrepancies were found
//! - `1` when every pair failed to run
//! - `2` on a configuration error; no pair is attempted

mod cli;

use std::fmt::Display;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use bridge_desktop::ReqwestHttpClient;
use clap::Parser;
use core_runtime::logging::init_logging;
use core_runtime::Credentials;
use core_verify::{parse_pairs, VerificationCoordinator};
use provider_dnanexus::DnanexusConnector;
use provider_s3::S3BucketStore;
use tracing::{error, info};

use cli::Cli;

const CONFIGURATION_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.logging_config()).context("Failed to initialize logging")?;

    let config = match cli.to_config() {
        Ok(config) => config,
        Err(e) => return Ok(configuration_error(e)),
    };

    let credentials = match Credentials::load(&config) {
        Ok(credentials) => credentials,
        Err(e) => return Ok(configuration_error(e)),
    };

    let pairs = match parse_pairs(&config.pairs) {
        Ok(pairs) => pairs,
        Err(e) => return Ok(configuration_error(e)),
    };

    info!(
        "Verifying {} pair(s) for {}/{}",
        pairs.len(),
        config.division,
        config.profile
    );

    let http_client = ReqwestHttpClient::new().context("Failed to create HTTP client")?;
    let project_store =
        DnanexusConnector::from_credentials(Arc::new(http_client), &credentials.dnanexus);
    let bucket_store = S3BucketStore::new(&credentials.aws).await;

    let coordinator = VerificationCoordinator::new(
        Arc::new(bucket_store),
        Arc::new(project_store),
        config.collector.clone(),
    );
    let summary = coordinator.run(&pairs).await;

    if cli.json {
        println!("{}", summary.to_json().context("Failed to render JSON report")?);
    } else {
        print!("{}", summary);
    }

    Ok(ExitCode::from(summary.exit_code() as u8))
}

fn configuration_error(error: impl Display) -> ExitCode {
    error!("Configuration error: {}", error);
    eprintln!("Error: {}", error);
    ExitCode::from(CONFIGURATION_ERROR)
}
