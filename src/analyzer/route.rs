//! Routes generation API

use gpx::Gpx;
use tracing::info;

use super::point::{GeoPoint, MissingElevation, Tracer};
use super::segmenter::{Segment, Segmenter, DEFAULT_SEGMENT_LENGTH_KM};
use crate::enrichment::description::{describe_or_placeholder, SegmentDescriber};
use crate::enrichment::elevation::{ElevationChain, Location};
use crate::error::AnalyzeError;

/// Ordered segments of one raw track segment, with their totals
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Route {
    pub name: String,
    pub segments: Vec<Segment>,
    /// Kilometers, sum of the segments distances
    pub distance: f64,
    pub elevation_gain: f64,
    pub elevation_loss: f64,
}

impl Route {
    pub fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    /// Number the segment and place it after the ones already appended
    pub fn append_segment(&mut self, mut segment: Segment) {
        segment.number = self.segments.len() + 1;
        segment.start_distance = self.distance;
        segment.end_distance = segment.start_distance + segment.distance;

        self.distance += segment.distance;
        self.elevation_gain += segment.elevation_gain;
        self.elevation_loss += segment.elevation_loss;

        self.segments.push(segment);
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Builds the routes of a GPX
pub struct RouteBuilder<'a> {
    /// Target segment length in kilometers
    pub segment_length: f64,
    pub missing_elevation: MissingElevation,
    elevation: Option<&'a ElevationChain>,
    describer: Option<(&'a dyn SegmentDescriber, String)>,
}

impl<'a> RouteBuilder<'a> {
    pub fn new(segment_length: f64) -> Self {
        Self {
            segment_length,
            missing_elevation: MissingElevation::default(),
            elevation: None,
            describer: None,
        }
    }

    pub fn missing_elevation(&mut self, policy: MissingElevation) -> &mut Self {
        self.missing_elevation = policy;

        self
    }

    /// Backfill missing elevations before segmenting
    pub fn elevation(&mut self, chain: &'a ElevationChain) -> &mut Self {
        self.elevation = Some(chain);

        self
    }

    /// Describe every closed segment with the given prompt
    pub fn describe(&mut self, describer: &'a dyn SegmentDescriber, prompt: String) -> &mut Self {
        self.describer = Some((describer, prompt));

        self
    }

    /// One route per raw segment of every track
    pub fn build(&self, gpx: &Gpx) -> Result<Vec<Route>, AnalyzeError> {
        let mut routes = vec![];

        for (itrack, track) in gpx.tracks.iter().enumerate() {
            let track_name = match &track.name {
                Some(name) if !name.trim().is_empty() => name.trim().to_string(),
                _ => format!("Track {}", itrack + 1),
            };

            for (iseg, tseg) in track.segments.iter().enumerate() {
                let points = tseg.points.iter().map(GeoPoint::from).collect();
                let name = format!("{} #{}", track_name, iseg + 1);

                routes.push(self.build_route(name, points)?);
            }
        }

        Ok(routes)
    }

    /// Segment an ordered list of points into a route
    pub fn build_route(&self, name: String, mut points: Vec<GeoPoint>) -> Result<Route, AnalyzeError> {
        let mut segmenter = Segmenter::new(self.segment_length)?;

        if let Some(chain) = self.elevation {
            backfill(chain, &mut points);
        }

        let mut tracer = Tracer::new(self.missing_elevation);
        let mut route = Route::new(name);

        for point in points {
            let Some(traced) = tracer.trace(point) else {
                continue;
            };

            if let Some(segment) = segmenter.push(traced) {
                route.append_segment(segment);
            }
        }

        if let Some(segment) = segmenter.finish() {
            route.append_segment(segment);
        }

        if let Some((describer, prompt)) = &self.describer {
            for segment in route.segments.iter_mut() {
                let description = describe_or_placeholder(*describer, segment, prompt);
                segment.description = Some(description);
            }
        }

        info!(
            "Route `{}`: {} segments, {:.2} km, +{:.0}/-{:.0} m",
            route.name,
            route.segments.len(),
            route.distance,
            route.elevation_gain,
            route.elevation_loss
        );

        Ok(route)
    }
}

impl Default for RouteBuilder<'_> {
    fn default() -> Self {
        Self::new(DEFAULT_SEGMENT_LENGTH_KM)
    }
}

/// Fill the elevations the chain knows about, leave the others unknown
fn backfill(chain: &ElevationChain, points: &mut [GeoPoint]) {
    let missing: Vec<Location> = points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.elevation.is_none())
        .map(|(position, p)| Location {
            position,
            latitude: p.latitude(),
            longitude: p.longitude(),
        })
        .collect();

    if missing.is_empty() {
        return;
    }

    for (position, elevation) in chain.lookup(&missing) {
        if let Some(p) = points.get_mut(position) {
            p.elevation = Some(elevation);
        }
    }
}
