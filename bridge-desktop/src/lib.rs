//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop and server hosts.
//!
//! - `HttpClient` using `reqwest` with retry and exponential backoff
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new()?);
//! let connector =
//!     provider_dnanexus::DnanexusConnector::new(http_client, token, "api.dnanexus.com");
//! ```

mod http;

pub use http::ReqwestHttpClient;
