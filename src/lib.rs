//! Workspace facade crate.
//!
//! Exposes feature flags that map to the individual workspace crates so a host
//! tool can depend on `xfer-verify-workspace` and pick the store providers it
//! needs without wiring each crate by hand.
//!
//! - `s3` enables [`provider_s3`] (target-side bucket listings)
//! - `dnanexus` enables [`provider_dnanexus`] and the reqwest-backed HTTP client
//!   it runs on (source-side project trees)

pub use core_verify;

#[cfg(feature = "s3")]
pub use provider_s3;

#[cfg(feature = "dnanexus")]
pub use bridge_desktop;

#[cfg(feature = "dnanexus")]
pub use provider_dnanexus;
