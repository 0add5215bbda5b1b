//! Error taxonomy
//!
//! Source errors are fatal and travel up to the caller. Enrichment errors
//! stay inside the enrichment collaborators, which degrade to empty or
//! placeholder values instead.

use std::path::PathBuf;

use thiserror::Error;

/// The GPX data could not be retrieved or parsed
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("GPX file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed on read the GPX data: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed on fetch the GPX data: {0}")]
    Http(String),
    #[error("GPX provider answered with status {0}")]
    Status(u16),
    #[error("No GPX provider registered for host `{0}`")]
    UnknownProvider(String),
    #[error("Missing credential `{0}` for the GPX provider")]
    MissingCredential(&'static str),
    #[error("Failed on parse the GPX data: {0}")]
    Parse(String),
}

/// An elevation or description lookup failed
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("request failed: {0}")]
    Http(String),
    #[error("service answered with status {0}")]
    Status(u16),
    #[error("unexpected payload: {0}")]
    Payload(String),
    #[error("no provider could answer")]
    Exhausted,
    #[error("`{0}` is not configured")]
    NotConfigured(&'static str),
}

/// Invalid segmentation parameters
#[derive(Debug, Error, PartialEq)]
pub enum AnalyzeError {
    #[error("segment length must be a positive number of kilometers, got {0}")]
    InvalidSegmentLength(f64),
}

/// Failure while writing the segments output
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed on write the CSV: {0}")]
    Csv(String),
    #[error("Failed on write the output: {0}")]
    Io(#[from] std::io::Error),
}

/// Any unrecoverable failure of a whole run
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Analyze(#[from] AnalyzeError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("No routes found for {0}")]
    NoRoutes(String),
}
