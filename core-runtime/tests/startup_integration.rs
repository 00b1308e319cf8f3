//! Startup flow: build the config, load credentials, install logging.

use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
use core_runtime::{Credentials, DuplicatePolicy, Error, VerifyConfig};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn write_credential_files(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    let dx_path = dir.path().join("dnanexus.json");
    let aws_path = dir.path().join("aws.json");

    fs::write(
        &dx_path,
        r#"{ "oncology": { "staging": { "api_token": "tok", "api_server": "https://stg.example.org" } } }"#,
    )
    .unwrap();
    fs::write(
        &aws_path,
        r#"{ "oncology": { "staging": {
            "access_key_id": "AKIA1",
            "secret_access_key": "s3cr3t",
            "session_token": "sess",
            "region": "eu-west-2"
        } } }"#,
    )
    .unwrap();

    (dx_path, aws_path)
}

#[test]
fn test_config_and_credentials_load_together() {
    let dir = TempDir::new().unwrap();
    let (dx_path, aws_path) = write_credential_files(&dir);

    let config = VerifyConfig::builder()
        .division("oncology")
        .profile("staging")
        .dnanexus_credentials(&dx_path)
        .aws_credentials(&aws_path)
        .sources(["project-a:/runs", "project-b"])
        .targets(["s3://archive/runs", "archive/b"])
        .operation_timeout(Duration::from_secs(90))
        .duplicate_policy(DuplicatePolicy::Reject)
        .build()
        .unwrap();

    let credentials = Credentials::load(&config).unwrap();

    assert_eq!(config.pairs.len(), 2);
    assert_eq!(config.collector.operation_timeout, Duration::from_secs(90));
    assert_eq!(credentials.dnanexus.api_server, "https://stg.example.org");
    assert_eq!(credentials.aws.session_token.as_deref(), Some("sess"));
    assert_eq!(credentials.aws.region, "eu-west-2");

    let debug = format!("{:?}", credentials);
    assert!(!debug.contains("s3cr3t"));
    assert!(!debug.contains("tok\""));
}

#[test]
fn test_missing_credentials_file_is_reported_with_path() {
    let dir = TempDir::new().unwrap();
    let (dx_path, _) = write_credential_files(&dir);
    let missing = dir.path().join("absent.json");

    let config = VerifyConfig::builder()
        .division("oncology")
        .profile("staging")
        .dnanexus_credentials(&dx_path)
        .aws_credentials(&missing)
        .source("project-a")
        .target("archive")
        .build()
        .unwrap();

    match Credentials::load(&config) {
        Err(Error::CredentialsFile { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected CredentialsFile error, got {:?}", other),
    }
}

#[test]
fn test_logging_installs_once() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Json)
        .with_level(LogLevel::Debug);

    assert!(init_logging(config.clone()).is_ok());
    tracing::info!(pair = "project-a -> archive", "Logging ready");

    assert!(init_logging(config).is_err());
}
