use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Source/target count mismatch: {sources} source(s) but {targets} target(s)")]
    PairCountMismatch { sources: usize, targets: usize },

    #[error("Failed to read credentials file {path}: {message}")]
    CredentialsFile { path: PathBuf, message: String },

    #[error("No {kind} credentials for division '{division}', profile '{profile}'")]
    CredentialsNotFound {
        kind: &'static str,
        division: String,
        profile: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
