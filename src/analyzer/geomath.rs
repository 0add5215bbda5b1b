//! Distance and grade helpers

use geo::Point;

/// Mean earth radius, in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates, in kilometers
///
/// Coordinates follow the `geo` convention: `x` is the longitude and `y`
/// the latitude, both in decimal degrees.
pub fn distance_km(a: Point, b: Point) -> f64 {
    let (lat1, lon1) = (a.y().to_radians(), a.x().to_radians());
    let (lat2, lon2) = (b.y().to_radians(), b.x().to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * h.sqrt().asin() * EARTH_RADIUS_KM
}

/// Slope, in percent, over a horizontal distance in kilometers
///
/// A zero distance has no slope and yields 0.
pub fn grade_percent(distance_km: f64, elevation_delta_m: f64) -> f64 {
    if distance_km == 0.0 {
        return 0.0;
    }

    elevation_delta_m / (distance_km * 1000.0) * 100.0
}

#[cfg(test)]
mod tests {
    use geo::Point;

    use super::{distance_km, grade_percent};

    fn round(value: f64, decimals: i32) -> f64 {
        let f = 10f64.powi(decimals);
        (value * f).round() / f
    }

    #[test]
    fn same_point_has_no_distance() {
        assert_eq!(0.0, distance_km(Point::new(0.0, 0.0), Point::new(0.0, 0.0)));
        assert_eq!(
            0.0,
            distance_km(Point::new(13.4050, 52.5200), Point::new(13.4050, 52.5200))
        );
    }

    #[test]
    fn distance_is_symmetric() {
        let nashville = Point::new(-86.67, 36.12);
        let los_angeles = Point::new(-118.40, 33.94);

        assert_eq!(
            distance_km(nashville, los_angeles),
            distance_km(los_angeles, nashville)
        );
    }

    #[test]
    fn known_distances() {
        let nashville = Point::new(-86.67, 36.12);
        let los_angeles = Point::new(-118.40, 33.94);
        assert_eq!(2886.44, round(distance_km(nashville, los_angeles), 2));

        let berlin = Point::new(13.4050, 52.5200);
        let nearby = Point::new(13.4051, 52.5201);
        assert_eq!(0.01302, round(distance_km(berlin, nearby), 5));
    }

    #[test]
    fn grades() {
        assert_eq!(0.0, grade_percent(0.0, 10.0));
        assert_eq!(0.0, grade_percent(0.0, -250.0));
        assert_eq!(5.0, grade_percent(2.0, 100.0));
        assert_eq!(-5.0, grade_percent(1.0, -50.0));
    }

    #[test]
    fn steep_short_pair() {
        let d = distance_km(Point::new(13.4050, 52.5200), Point::new(13.4051, 52.5201));

        assert_eq!(153.65, round(grade_percent(d, 20.0).abs(), 2));
    }
}
