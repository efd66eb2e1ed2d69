//! Spherical Web Mercator (EPSG:3857) helpers for the rendering side.
//!
//! Distances are never measured in projected space. The projection is only
//! used to express the radius overlay in the renderer's units.

use fieldmap_core::{destination, Coordinate};

/// Semi-major axis of WGS 84, the EPSG:3857 sphere radius.
pub const WEB_MERCATOR_RADIUS_M: f64 = 6_378_137.0;

/// Latitude limit of the square Web Mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Projects a position to EPSG:3857 metres, returning `(x, y)`.
///
/// Latitudes beyond [`MAX_LATITUDE`] are clamped.
#[must_use]
pub fn to_web_mercator(coordinate: Coordinate) -> (f64, f64) {
    let lat = coordinate.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = WEB_MERCATOR_RADIUS_M * coordinate.lon.to_radians();
    let y = WEB_MERCATOR_RADIUS_M * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();
    (x, y)
}

/// Inverse of [`to_web_mercator`].
#[must_use]
pub fn from_web_mercator(x: f64, y: f64) -> Coordinate {
    let lon = (x / WEB_MERCATOR_RADIUS_M).to_degrees();
    let lat = (2.0 * (y / WEB_MERCATOR_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2)
        .to_degrees();
    Coordinate { lon, lat }
}

/// Ground radius converted to projected metres at `lat`.
///
/// Mercator stretches distances by `1 / cos(lat)`; a circle drawn with this
/// radius around the projected center covers `radius_km` on the ground.
#[must_use]
pub fn projected_radius_m(radius_km: f64, lat: f64) -> f64 {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    radius_km * 1_000.0 / lat.cos()
}

/// `segments` points at `radius_km` from `center`, clockwise from north.
/// The ring is open; GeoJSON export closes it.
#[must_use]
pub fn geodesic_ring(center: Coordinate, radius_km: f64, segments: usize) -> Vec<Coordinate> {
    let segments = segments.max(3);
    #[allow(clippy::cast_precision_loss)]
    let step = 360.0 / segments as f64;
    (0..segments)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let bearing = step * i as f64;
            destination(center, bearing, radius_km)
        })
        .collect()
}
