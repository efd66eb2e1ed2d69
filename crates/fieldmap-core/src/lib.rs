//! Domain types and pure logic for the venue/event discovery engine.
//!
//! Everything in here is synchronous and free of network I/O: coordinates,
//! great-circle distance, the country centroid table, candidate records and
//! the filter state with its compiled predicate. Configuration loading lives
//! here as well so every crate reads the same `AppConfig`.

pub mod app_config;
pub mod candidate;
pub mod config;
pub mod coordinate;
pub mod countries;
pub mod distance;
pub mod error;
pub mod filter;

pub use app_config::{AppConfig, Environment};
pub use candidate::{
    load_candidates, Candidate, CandidateKind, CandidateSource, CandidatesFile,
    FileCandidateSource,
};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use coordinate::Coordinate;
pub use countries::{country_by_key, CountryInfo, COUNTRIES};
pub use distance::{destination, distance_km, EARTH_RADIUS_KM};
pub use error::{ConfigError, CoreError};
pub use filter::{reduce, FilterAction, FilterCriteria, FilterState, Predicate, Selection};
