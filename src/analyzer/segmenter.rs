//! Fixed-length segmentation of a traced track

use std::mem;

use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::point::{Trajectory, TrajectoryPoint};
use crate::error::AnalyzeError;

/// Default target length of a segment, in kilometers
pub const DEFAULT_SEGMENT_LENGTH_KM: f64 = 1.0;

/// Statistics of a contiguous run of points
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// 1-based position in its route. Assigned by the route
    pub number: usize,
    pub start_elevation: f64,
    pub end_elevation: f64,
    pub min_elevation: f64,
    pub max_elevation: f64,
    /// Kilometers covered by the segment, from the point preceding it
    pub distance: f64,
    /// Route kilometer where the segment starts. Assigned by the route
    pub start_distance: f64,
    /// Route kilometer where the segment ends. Assigned by the route
    pub end_distance: f64,
    pub elevation_gain: f64,
    pub elevation_loss: f64,
    pub avg_grade: f64,
    pub max_grade: f64,
    pub min_grade: f64,
    pub start_time: Option<OffsetDateTime>,
    pub end_time: Option<OffsetDateTime>,
    pub duration: Option<Duration>,
    pub description: Option<String>,
    /// Points the statistics were computed from
    pub points: Vec<TrajectoryPoint>,
}

impl Segment {
    /// Duration as `HH:MM:SS`, hours are not wrapped into days
    pub fn duration_hms(&self) -> Option<String> {
        self.duration.map(format_hms)
    }
}

fn format_hms(duration: Duration) -> String {
    let seconds = duration.whole_seconds();
    let (hours, rest) = (seconds.div_euclid(3600), seconds.rem_euclid(3600));
    let (minutes, seconds) = (rest / 60, rest % 60);

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Streaming segmentation state machine
///
/// Points are pushed in track order. The running segment closes as soon as
/// its distance reaches the target length; whatever is left when the input
/// is exhausted is closed by [`Segmenter::finish`] if it holds at least two
/// points, and dropped otherwise.
///
/// Every point but the first of the track is paired with the point pushed
/// before it, also across a boundary: the step leading into a segment
/// counts in that segment.
#[derive(Debug)]
pub struct Segmenter {
    length_km: f64,
    previous: Option<TrajectoryPoint>,
    buffer: Vec<TrajectoryPoint>,
    distance: f64,
    elevation_gain: f64,
    elevation_loss: f64,
    grades: Vec<f64>,
}

impl Segmenter {
    pub fn new(length_km: f64) -> Result<Self, AnalyzeError> {
        if !length_km.is_finite() || length_km <= 0.0 {
            return Err(AnalyzeError::InvalidSegmentLength(length_km));
        }

        Ok(Self {
            length_km,
            previous: None,
            buffer: vec![],
            distance: 0.0,
            elevation_gain: 0.0,
            elevation_loss: 0.0,
            grades: vec![],
        })
    }

    /// Add the next point, returning the segment it completes, if any
    pub fn push(&mut self, point: TrajectoryPoint) -> Option<Segment> {
        // The first point of the track only anchors it
        if let Some(previous) = self.previous.replace(point) {
            let delta = point.elevation_delta(&previous);
            if delta > 0.0 {
                self.elevation_gain += delta;
            } else if delta < 0.0 {
                self.elevation_loss += delta.abs();
            }

            self.distance += point.distance();
            self.grades.push(point.grade());
        }

        self.buffer.push(point);

        if self.distance >= self.length_km {
            Some(self.close())
        } else {
            None
        }
    }

    /// Input exhausted: close the trailing segment when it spans a distance
    pub fn finish(mut self) -> Option<Segment> {
        if self.buffer.len() >= 2 {
            return Some(self.close());
        }

        if !self.buffer.is_empty() {
            debug!("Dropping trailing single-point fragment");
        }

        None
    }

    fn close(&mut self) -> Segment {
        let points = mem::take(&mut self.buffer);
        let grades = mem::take(&mut self.grades);
        let distance = mem::replace(&mut self.distance, 0.0);
        let elevation_gain = mem::replace(&mut self.elevation_gain, 0.0);
        let elevation_loss = mem::replace(&mut self.elevation_loss, 0.0);

        // a closed segment always holds at least one point
        let first = points[0];
        let last = points[points.len() - 1];

        let (min_elevation, max_elevation) = points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), p| (min.min(p.elevation()), max.max(p.elevation())),
        );

        let (avg_grade, max_grade, min_grade) = if grades.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            (
                grades.iter().sum::<f64>() / grades.len() as f64,
                grades.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                grades.iter().copied().fold(f64::INFINITY, f64::min),
            )
        };

        let duration = match (first.time(), last.time()) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        };

        debug!(
            "Closed segment of {} points, {:.3} km, +{:.1}/-{:.1} m",
            points.len(),
            distance,
            elevation_gain,
            elevation_loss
        );

        Segment {
            number: 0,
            start_elevation: first.elevation(),
            end_elevation: last.elevation(),
            min_elevation,
            max_elevation,
            distance,
            start_distance: 0.0,
            end_distance: distance,
            elevation_gain,
            elevation_loss,
            avg_grade,
            max_grade,
            min_grade,
            start_time: first.time(),
            end_time: last.time(),
            duration,
            description: None,
            points,
        }
    }
}
