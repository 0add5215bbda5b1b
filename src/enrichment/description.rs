//! Natural-language segment descriptions

use tracing::warn;

use crate::analyzer::segmenter::Segment;
use crate::error::EnrichmentError;

/// Description written when the generation fails
pub const PLACEHOLDER: &str = "-";

/// Text generation service
pub trait SegmentDescriber {
    fn describe(&self, segment: &Segment, prompt: &str) -> Result<String, EnrichmentError>;
}

/// Stands for a service missing its credentials
pub struct Unconfigured(pub &'static str);

impl SegmentDescriber for Unconfigured {
    fn describe(&self, _: &Segment, _: &str) -> Result<String, EnrichmentError> {
        Err(EnrichmentError::NotConfigured(self.0))
    }
}

/// Statistics of the segment, as context for the generation
pub fn segment_context(segment: &Segment) -> String {
    format!(
        "You are a helpful assistant analyzing route segments.\n\
         This is the segment #{} of a route:\n\
         - Distance: {:.2} km\n\
         - Elevation gain: {:.0} m\n\
         - Elevation loss: {:.0} m\n\
         - Average grade: {:.1}%\n\
         - Maximum grade: {:.1}%\n\
         - Minimum grade: {:.1}%\n",
        segment.number,
        segment.distance,
        segment.elevation_gain,
        segment.elevation_loss,
        segment.avg_grade,
        segment.max_grade,
        segment.min_grade,
    )
}

/// Describe the segment, or fall back to [`PLACEHOLDER`]
pub fn describe_or_placeholder(
    describer: &dyn SegmentDescriber,
    segment: &Segment,
    prompt: &str,
) -> String {
    match describer.describe(segment, prompt) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed on describe the segment #{}: {}", segment.number, e);
            PLACEHOLDER.to_string()
        }
    }
}
