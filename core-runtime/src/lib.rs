//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for transfer verification:
//! - Run configuration with fail-fast validation
//! - Credential file loading keyed by division and profile
//! - Logging and tracing setup
//!
//! Configuration is built once at startup and passed explicitly to the
//! components that need it; nothing here holds global mutable state apart
//! from the tracing subscriber.

pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;

pub use config::{CollectorSettings, DuplicatePolicy, PairSpec, VerifyConfig};
pub use credentials::{AwsCredentials, Credentials, DnanexusCredentials};
pub use error::{Error, Result};
