//! Track point definitions

use geo::Point;
use gpx::Waypoint;
use serde::Deserialize;
use time::format_description::well_known::Iso8601;
use time::OffsetDateTime;

use super::geomath::{distance_km, grade_percent};

/// Raw sample of a track, as read from the GPX
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    /// `x` is the longitude, `y` the latitude
    pub coordinates: Point,
    /// Meters. `None` when the sample carries no elevation at all
    pub elevation: Option<f64>,
    pub time: Option<OffsetDateTime>,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64, elevation: Option<f64>) -> Self {
        Self {
            coordinates: Point::new(longitude, latitude),
            elevation,
            time: None,
        }
    }

    pub fn at(mut self, time: OffsetDateTime) -> Self {
        self.time = Some(time);

        self
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates.y()
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates.x()
    }
}

impl From<&Waypoint> for GeoPoint {
    fn from(wp: &Waypoint) -> Self {
        let p = wp.point();

        Self {
            coordinates: Point::new(round6(p.x()), round6(p.y())),
            elevation: wp.elevation,
            // the GPX time is only exposed through its ISO 8601 rendering
            time: wp
                .time
                .as_ref()
                .and_then(|t| t.format().ok())
                .and_then(|s| OffsetDateTime::parse(&s, &Iso8601::DEFAULT).ok()),
        }
    }
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

/// Read access to the values derived from a point's predecessor
pub trait Trajectory {
    /// Kilometers from the previous point
    fn distance(&self) -> f64;
    /// Percent slope from the previous point
    fn grade(&self) -> f64;
    /// Kilometers from the first point of the track
    fn cumulative_distance(&self) -> f64;
}

/// A raw point decorated with the values derived from its predecessor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectoryPoint {
    point: GeoPoint,
    elevation: f64,
    distance_from_prev: f64,
    cumulative_distance: f64,
    grade: f64,
}

impl TrajectoryPoint {
    /// First point of a track: nothing to compare with
    pub fn first(point: GeoPoint, elevation: f64) -> Self {
        Self {
            point,
            elevation,
            distance_from_prev: 0.0,
            cumulative_distance: 0.0,
            grade: 0.0,
        }
    }

    pub fn following(point: GeoPoint, elevation: f64, previous: &TrajectoryPoint) -> Self {
        let distance_from_prev = distance_km(previous.point.coordinates, point.coordinates);
        let grade = grade_percent(distance_from_prev, elevation - previous.elevation);

        Self {
            point,
            elevation,
            distance_from_prev,
            cumulative_distance: previous.cumulative_distance + distance_from_prev,
            grade,
        }
    }

    pub fn point(&self) -> &GeoPoint {
        &self.point
    }

    /// Elevation used for the computations, in meters
    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    pub fn time(&self) -> Option<OffsetDateTime> {
        self.point.time
    }

    /// Signed elevation change from `previous` to this point
    pub fn elevation_delta(&self, previous: &TrajectoryPoint) -> f64 {
        self.elevation - previous.elevation
    }
}

impl Trajectory for TrajectoryPoint {
    fn distance(&self) -> f64 {
        self.distance_from_prev
    }

    fn grade(&self) -> f64 {
        self.grade
    }

    fn cumulative_distance(&self) -> f64 {
        self.cumulative_distance
    }
}

/// What to do with points that have no elevation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingElevation {
    /// Ignore the point; the next point pairs with the last one that had
    /// an elevation
    #[default]
    Skip,
    /// Ignore the point only until a first elevation is known, afterwards
    /// reuse the previous elevation (flat step)
    Hold,
}

/// Turns raw points, in track order, into trajectory points
#[derive(Debug)]
pub struct Tracer {
    policy: MissingElevation,
    previous: Option<TrajectoryPoint>,
}

impl Tracer {
    pub fn new(policy: MissingElevation) -> Self {
        Self {
            policy,
            previous: None,
        }
    }

    /// Derive the next point, or `None` when the policy discards it
    pub fn trace(&mut self, point: GeoPoint) -> Option<TrajectoryPoint> {
        let elevation = match (point.elevation, self.previous, self.policy) {
            (Some(e), _, _) => e,
            (None, Some(prev), MissingElevation::Hold) => prev.elevation,
            (None, _, _) => return None,
        };

        let traced = match &self.previous {
            Some(prev) => TrajectoryPoint::following(point, elevation, prev),
            None => TrajectoryPoint::first(point, elevation),
        };
        self.previous = Some(traced);

        Some(traced)
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoPoint, MissingElevation, Tracer, Trajectory, TrajectoryPoint};

    #[test]
    fn derived_from_previous() {
        let p1 = TrajectoryPoint::first(GeoPoint::new(52.5200, 13.4050, Some(34.0)), 34.0);
        let p2 = TrajectoryPoint::following(GeoPoint::new(52.5201, 13.4051, Some(54.0)), 54.0, &p1);

        assert_eq!(0.0, p1.distance());
        assert_eq!(0.0, p1.grade());
        assert_eq!(0.01302, (p2.distance() * 1e5).round() / 1e5);
        assert_eq!(153.65, (p2.grade() * 100.0).round() / 100.0);
        assert_eq!(p2.distance(), p2.cumulative_distance());
        assert_eq!(20.0, p2.elevation_delta(&p1));
        assert_eq!(-20.0, p1.elevation_delta(&p2));
    }

    #[test]
    fn cumulative_distance_keeps_growing() {
        let mut tracer = Tracer::new(MissingElevation::Skip);

        let a = tracer.trace(GeoPoint::new(45.0, 7.0, Some(100.0))).unwrap();
        let b = tracer.trace(GeoPoint::new(45.001, 7.0, Some(110.0))).unwrap();
        let c = tracer.trace(GeoPoint::new(45.002, 7.0, Some(105.0))).unwrap();

        assert_eq!(0.0, a.cumulative_distance());
        assert!(b.cumulative_distance() > 0.0);
        assert_eq!(b.cumulative_distance() + c.distance(), c.cumulative_distance());
        assert!(b.grade() > 0.0);
        assert!(c.grade() < 0.0);
    }

    #[test]
    fn skip_policy_ignores_points_without_elevation() {
        let mut tracer = Tracer::new(MissingElevation::Skip);

        assert!(tracer.trace(GeoPoint::new(45.0, 7.0, None)).is_none());
        let a = tracer.trace(GeoPoint::new(45.001, 7.0, Some(100.0))).unwrap();
        assert_eq!(0.0, a.distance());

        assert!(tracer.trace(GeoPoint::new(45.002, 7.0, None)).is_none());
        let b = tracer.trace(GeoPoint::new(45.003, 7.0, Some(100.0))).unwrap();

        // paired with the last point that had an elevation
        let two_steps = GeoPoint::new(45.003, 7.0, None).coordinates;
        let expected = super::distance_km(a.point().coordinates, two_steps);
        assert_eq!(expected, b.distance());
    }

    #[test]
    fn hold_policy_flattens_points_without_elevation() {
        let mut tracer = Tracer::new(MissingElevation::Hold);

        assert!(tracer.trace(GeoPoint::new(45.0, 7.0, None)).is_none());
        tracer.trace(GeoPoint::new(45.001, 7.0, Some(100.0))).unwrap();

        let held = tracer.trace(GeoPoint::new(45.002, 7.0, None)).unwrap();
        assert_eq!(100.0, held.elevation());
        assert_eq!(0.0, held.grade());
        assert!(held.distance() > 0.0);
    }

    #[test]
    fn zero_is_a_real_elevation() {
        let mut tracer = Tracer::new(MissingElevation::Skip);

        let sea = tracer.trace(GeoPoint::new(45.0, 7.0, Some(0.0)));
        assert_eq!(Some(0.0), sea.map(|p| p.elevation()));
    }
}
