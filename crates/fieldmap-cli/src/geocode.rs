//! `geocode` command: one forward lookup, printed as a coordinate or "no match".

use fieldmap_geocode::Geocoder;

/// Provider failures are logged by the geocoder and read as "no match".
pub(crate) async fn lookup_line(
    geocoder: &impl Geocoder,
    text: &str,
    country_code: Option<&str>,
) -> String {
    match geocoder.geocode(text, country_code).await {
        Some(coordinate) => coordinate.to_string(),
        None => "no match".to_string(),
    }
}
