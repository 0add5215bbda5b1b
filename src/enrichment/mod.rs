//! Optional enrichment of the segments
//!
//! Runs on top of the geometry: failures never abort a run, they only
//! leave elevations unknown or descriptions as a placeholder.

pub mod description;
pub mod elevation;

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{AnthropicDescriber, GoogleElevation, OpenElevation};

#[cfg(feature = "http")]
use tracing::warn;

#[cfg(feature = "http")]
use crate::config::ProvidersConfig;

/// Paid provider first when a key is configured, then the free one.
/// A provider whose client cannot be set up is left out of the chain.
#[cfg(feature = "http")]
pub fn elevation_chain(providers: &ProvidersConfig) -> elevation::ElevationChain {
    let mut chain = elevation::ElevationChain::new();

    if let Some(key) = &providers.google_api_key {
        match GoogleElevation::new(key.clone()) {
            Ok(google) => chain = chain.with(google),
            Err(e) => warn!("Elevation provider google left out: {}", e),
        }
    }

    match OpenElevation::new(providers.open_elevation_url.clone()) {
        Ok(open) => chain.with(open),
        Err(e) => {
            warn!("Elevation provider open-elevation left out: {}", e);
            chain
        }
    }
}
