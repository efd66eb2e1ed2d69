//! Location lookups: forward geocoding over HTTP and device geolocation.
//!
//! Both are exposed through narrow traits ([`Geocoder`], [`Geolocator`]) so
//! the search orchestrator can be driven by fakes in tests. Network failures
//! stop at this boundary: [`Geocoder::geocode`] never returns an error.

pub mod client;
pub mod error;
pub mod geolocation;
pub(crate) mod retry;
pub mod types;

pub use client::{Geocoder, GeocodingClient};
pub use error::{GeocodeError, GeolocationError};
pub use geolocation::{FixedGeolocator, Geolocator};
pub use types::GeocodeMatch;
