//! Great-circle geometry.

use carelink_core::Coordinate;

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates via the haversine formula,
/// in kilometres.
///
/// Symmetric in its arguments and zero for identical points. Inputs are
/// decimal degrees; the computation is done in radians.
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_zero_for_identical_points() {
        let p = Coordinate::new(43.70, -79.42);
        assert!(distance_km(p, p).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(43.70, -79.42);
        let b = Coordinate::new(51.5074, -0.1278);
        let forward = distance_km(a, b);
        let backward = distance_km(b, a);
        assert!(
            (forward - backward).abs() < 1e-9,
            "haversine should be symmetric: {forward} vs {backward}"
        );
    }

    #[test]
    fn one_degree_of_longitude_on_the_equator() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 1.0);
        // 6371 * pi / 180
        let d = distance_km(a, b);
        assert!((d - 111.1949).abs() < 0.01, "got {d}");
    }

    #[test]
    fn antipodal_poles_span_half_the_circumference() {
        let north = Coordinate::new(90.0, 0.0);
        let south = Coordinate::new(-90.0, 0.0);
        // 6371 * pi
        let d = distance_km(north, south);
        assert!((d - 20_015.0866).abs() < 0.01, "got {d}");
    }

    #[test]
    fn short_urban_hop_matches_expected_distance() {
        // Downtown Toronto to a hospital ~6.4 km away.
        let user = Coordinate::new(43.70, -79.42);
        let hospital = Coordinate::new(43.65, -79.38);
        let d = distance_km(user, hospital);
        assert!((d - 6.423).abs() < 0.01, "got {d}");
    }
}
