//! Canonical country centroids.
//!
//! Selecting a country in the filter recenters the search on the country's
//! representative point. Keys are the lower-case values the country filter
//! carries; the ISO code biases forward geocoding towards that country.

use crate::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountryInfo {
    /// Filter value, lower-case.
    pub key: &'static str,
    pub name: &'static str,
    /// ISO 3166-1 alpha-2, lower-case.
    pub iso_code: &'static str,
    pub centroid: Coordinate,
}

pub const COUNTRIES: &[CountryInfo] = &[
    CountryInfo {
        key: "france",
        name: "France",
        iso_code: "fr",
        centroid: Coordinate {
            lon: 2.213_749,
            lat: 46.227_638,
        },
    },
    CountryInfo {
        key: "belgique",
        name: "Belgique",
        iso_code: "be",
        centroid: Coordinate {
            lon: 4.469_936,
            lat: 50.503_887,
        },
    },
    CountryInfo {
        key: "suisse",
        name: "Suisse",
        iso_code: "ch",
        centroid: Coordinate {
            lon: 8.227_512,
            lat: 46.818_188,
        },
    },
    CountryInfo {
        key: "luxembourg",
        name: "Luxembourg",
        iso_code: "lu",
        centroid: Coordinate {
            lon: 6.129_583,
            lat: 49.815_273,
        },
    },
    CountryInfo {
        key: "allemagne",
        name: "Allemagne",
        iso_code: "de",
        centroid: Coordinate {
            lon: 10.451_526,
            lat: 51.165_691,
        },
    },
    CountryInfo {
        key: "espagne",
        name: "Espagne",
        iso_code: "es",
        centroid: Coordinate {
            lon: -3.749_220,
            lat: 40.463_667,
        },
    },
    CountryInfo {
        key: "italie",
        name: "Italie",
        iso_code: "it",
        centroid: Coordinate {
            lon: 12.567_380,
            lat: 41.871_940,
        },
    },
    CountryInfo {
        key: "royaume-uni",
        name: "Royaume-Uni",
        iso_code: "gb",
        centroid: Coordinate {
            lon: -3.435_973,
            lat: 55.378_051,
        },
    },
    CountryInfo {
        key: "pays-bas",
        name: "Pays-Bas",
        iso_code: "nl",
        centroid: Coordinate {
            lon: 5.291_266,
            lat: 52.132_633,
        },
    },
    CountryInfo {
        key: "canada",
        name: "Canada",
        iso_code: "ca",
        centroid: Coordinate {
            lon: -106.346_771,
            lat: 56.130_366,
        },
    },
];

/// Looks up a country by its filter key (case-insensitive, trimmed).
#[must_use]
pub fn country_by_key(key: &str) -> Option<&'static CountryInfo> {
    let key = key.trim();
    COUNTRIES.iter().find(|c| c.key.eq_ignore_ascii_case(key))
}
