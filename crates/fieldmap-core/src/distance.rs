//! Great-circle math on a spherical Earth.
//!
//! All distance work happens on latitude/longitude degrees. The map's
//! projected coordinates are a rendering concern and never enter these
//! formulas.

use crate::Coordinate;

/// Mean Earth radius used by every distance computation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two points given in degrees.
///
/// Symmetric bit-for-bit and exactly `0.0` for identical points. NaN or
/// infinite inputs yield NaN.
#[must_use]
pub fn distance_km(a_lat: f64, a_lon: f64, b_lat: f64, b_lon: f64) -> f64 {
    // Canonical argument order so swapping a and b runs the same float ops.
    let ((lat1, lon1), (lat2, lon2)) = if (b_lat, b_lon) < (a_lat, a_lon) {
        ((b_lat, b_lon), (a_lat, a_lon))
    } else {
        ((a_lat, a_lon), (b_lat, b_lon))
    };

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Point reached by travelling `distance_km` from `origin` along the initial
/// bearing `bearing_deg` (clockwise from north).
///
/// Longitude of the result is wrapped into [-180, 180].
#[must_use]
pub fn destination(origin: Coordinate, bearing_deg: f64, distance_km: f64) -> Coordinate {
    let delta = distance_km / EARTH_RADIUS_KM;
    let theta = bearing_deg.to_radians();
    let phi1 = origin.lat.to_radians();
    let lambda1 = origin.lon.to_radians();

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * sin_phi2);

    let lon = (lambda2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    Coordinate {
        lon,
        lat: phi2.to_degrees(),
    }
}
