use thiserror::Error;

/// Errors from the forward-geocoding provider.
///
/// Only [`GeocodingClient::lookup`](crate::GeocodingClient::lookup) surfaces
/// these; the [`Geocoder`](crate::Geocoder) implementation logs them and
/// reports "no match".
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Network/TLS failure or a non-2xx status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid geocoder base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The provider answered with a position outside WGS84 ranges.
    #[error("provider returned an invalid coordinate: {0}")]
    InvalidCoordinate(#[from] fieldmap_core::CoreError),
}

/// Failure to obtain a device position.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location unavailable: {0}")]
    Unavailable(String),
}
