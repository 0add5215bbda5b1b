//! Elevation backfill

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::EnrichmentError;

/// A point to look up, keyed by its position in the track
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    pub position: usize,
    pub latitude: f64,
    pub longitude: f64,
}

/// Elevation lookup service
pub trait ElevationProvider {
    fn name(&self) -> &str;

    /// Elevations, in meters, keyed by the locations positions
    fn try_fetch(&self, locations: &[Location]) -> Result<BTreeMap<usize, f64>, EnrichmentError>;
}

/// Providers tried in priority order until one answers
#[derive(Default)]
pub struct ElevationChain {
    providers: Vec<Box<dyn ElevationProvider>>,
}

impl ElevationChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<P>(mut self, provider: P) -> Self
    where
        P: ElevationProvider + 'static,
    {
        self.providers.push(Box::new(provider));

        self
    }

    pub fn providers(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Ask each provider in turn. Never fails: when no provider can answer
    /// the result is empty and the points keep their unknown elevation.
    pub fn lookup(&self, locations: &[Location]) -> BTreeMap<usize, f64> {
        if locations.is_empty() {
            return BTreeMap::new();
        }

        for provider in &self.providers {
            match provider.try_fetch(locations) {
                Ok(elevations) => {
                    debug!(
                        "{} answered {} of {} elevations",
                        provider.name(),
                        elevations.len(),
                        locations.len()
                    );
                    return elevations;
                }
                Err(e) => warn!("Elevation provider {} failed: {}", provider.name(), e),
            }
        }

        warn!(
            "{}, {} points keep an unknown elevation",
            EnrichmentError::Exhausted,
            locations.len()
        );

        BTreeMap::new()
    }
}
