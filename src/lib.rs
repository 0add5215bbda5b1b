//! gpxsegments - fixed-length segments statistics of GPX tracks

mod analyzer;
pub mod config;
pub mod enrichment;
pub mod error;
#[cfg(feature = "csv")]
pub mod output;
pub mod sources;

pub use analyzer::geomath::{distance_km, grade_percent, EARTH_RADIUS_KM};
pub use analyzer::point::{GeoPoint, MissingElevation, Tracer, Trajectory, TrajectoryPoint};
pub use analyzer::route::{Route, RouteBuilder};
pub use analyzer::segmenter::{Segment, Segmenter, DEFAULT_SEGMENT_LENGTH_KM};
pub use config::Settings;
pub use error::{AnalyzeError, EnrichmentError, Error, SinkError, SourceError};
pub use sources::GpxSource;
