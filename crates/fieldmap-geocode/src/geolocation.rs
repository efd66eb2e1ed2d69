//! Device geolocation seam.
//!
//! The real capability is permission-gated and host-specific (browser,
//! mobile OS). Hosts without one, and tests, use [`FixedGeolocator`].

use std::future::Future;

use fieldmap_core::Coordinate;

use crate::error::GeolocationError;

pub trait Geolocator: Send + Sync {
    /// A single position reading.
    fn current_position(&self)
        -> impl Future<Output = Result<Coordinate, GeolocationError>> + Send;
}

/// Geolocator that always answers with the same reading or the same error.
#[derive(Debug, Clone)]
pub struct FixedGeolocator {
    reading: Result<Coordinate, GeolocationError>,
}

impl FixedGeolocator {
    #[must_use]
    pub fn at(position: Coordinate) -> Self {
        Self {
            reading: Ok(position),
        }
    }

    #[must_use]
    pub fn failing(error: GeolocationError) -> Self {
        Self {
            reading: Err(error),
        }
    }
}

impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinate, GeolocationError> {
        self.reading.clone()
    }
}
