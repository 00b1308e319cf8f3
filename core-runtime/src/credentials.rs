//! # Credential Files
//!
//! Loads store credentials selected by division and profile.
//!
//! Both credential files are JSON objects keyed by division, then profile:
//!
//! ```json
//! {
//!   "genomics": {
//!     "prod": { "api_token": "...", "api_server": "api.dnanexus.com" }
//!   }
//! }
//! ```
//!
//! The AWS file uses the same nesting with `access_key_id`,
//! `secret_access_key`, optional `session_token` and `region`. Secrets never
//! appear in `Debug` output.

use crate::config::VerifyConfig;
use crate::error::{Error, Result};
use crate::logging::redact_if_sensitive;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

const DEFAULT_API_SERVER: &str = "api.dnanexus.com";

fn default_api_server() -> String {
    DEFAULT_API_SERVER.to_string()
}

/// Project-store API credentials
#[derive(Clone, Deserialize)]
pub struct DnanexusCredentials {
    pub api_token: String,
    #[serde(default = "default_api_server")]
    pub api_server: String,
}

impl fmt::Debug for DnanexusCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnanexusCredentials")
            .field("api_token", &redact_if_sensitive("api_token", &self.api_token))
            .field("api_server", &self.api_server)
            .finish()
    }
}

/// Bucket-store access keys
#[derive(Clone, Deserialize)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(default)]
    pub session_token: Option<String>,
    pub region: String,
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &redact_if_sensitive("secret_access_key", &self.secret_access_key),
            )
            .field(
                "session_token",
                &self
                    .session_token
                    .as_deref()
                    .map(|t| redact_if_sensitive("session_token", t)),
            )
            .field("region", &self.region)
            .finish()
    }
}

/// Credentials for both stores of a run
#[derive(Debug, Clone)]
pub struct Credentials {
    pub dnanexus: DnanexusCredentials,
    pub aws: AwsCredentials,
}

impl Credentials {
    /// Read both credential files and select the configured division/profile.
    pub fn load(config: &VerifyConfig) -> Result<Self> {
        let dnanexus = load_entry(
            &config.dnanexus_credentials_path,
            "DNAnexus",
            &config.division,
            &config.profile,
        )?;
        let aws = load_entry(
            &config.aws_credentials_path,
            "AWS",
            &config.division,
            &config.profile,
        )?;

        Ok(Self { dnanexus, aws })
    }
}

type CredentialFile<T> = HashMap<String, HashMap<String, T>>;

fn load_entry<T: DeserializeOwned>(
    path: &Path,
    kind: &'static str,
    division: &str,
    profile: &str,
) -> Result<T> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::CredentialsFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut file: CredentialFile<T> =
        serde_json::from_str(&contents).map_err(|e| Error::CredentialsFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    file.get_mut(division)
        .and_then(|profiles| profiles.remove(profile))
        .ok_or_else(|| Error::CredentialsNotFound {
            kind,
            division: division.to_string(),
            profile: profile.to_string(),
        })
}
