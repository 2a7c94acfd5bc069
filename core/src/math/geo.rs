/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two lat/lng points given in degrees.
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64, radius_m: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lng2 - lng1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    radius_m * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let distance = haversine_distance(0.0, 0.0, 0.0, 1.0, EARTH_RADIUS_M);
        assert_abs_diff_eq!(distance, PI / 180.0 * EARTH_RADIUS_M, epsilon = 1.0);
        assert_abs_diff_eq!(distance, 111_195.0, epsilon = 1.0);
    }

    #[test]
    fn identical_points_are_zero_apart() {
        assert_eq!(haversine_distance(45.5, -73.6, 45.5, -73.6, EARTH_RADIUS_M), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = haversine_distance(48.85, 2.35, 51.5, -0.12, EARTH_RADIUS_M);
        let back = haversine_distance(51.5, -0.12, 48.85, 2.35, EARTH_RADIUS_M);
        assert_abs_diff_eq!(there, back, epsilon = 1e-6);
        assert!(there > 300_000.0 && there < 400_000.0);
    }
}
