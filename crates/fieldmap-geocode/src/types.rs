//! Wire types for the forward-geocoding response.

use serde::{Deserialize, Deserializer};

use fieldmap_core::{Coordinate, CoreError};

/// One entry of the provider's JSON array.
///
/// Nominatim-style providers send `lat`/`lon` as strings; others send
/// numbers. Both are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeMatch {
    #[serde(deserialize_with = "lenient_f64")]
    pub lat: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub lon: f64,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl GeocodeMatch {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] for out-of-range values.
    pub fn coordinate(&self) -> Result<Coordinate, CoreError> {
        Coordinate::new(self.lon, self.lat)
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_coordinates() {
        let m: GeocodeMatch = serde_json::from_str(
            r#"{"lat": "48.8588897", "lon": "2.3200410", "display_name": "Paris, France"}"#,
        )
        .unwrap();
        assert!((m.lat - 48.858_889_7).abs() < 1e-9);
        assert!((m.lon - 2.320_041).abs() < 1e-9);
        assert_eq!(m.display_name.as_deref(), Some("Paris, France"));
    }

    #[test]
    fn parses_numeric_coordinates() {
        let m: GeocodeMatch = serde_json::from_str(r#"{"lat": 45.76, "lon": 4.83}"#).unwrap();
        let c = m.coordinate().unwrap();
        assert!((c.lat - 45.76).abs() < 1e-9);
        assert!(m.display_name.is_none());
    }

    #[test]
    fn rejects_non_numeric_string() {
        let result = serde_json::from_str::<GeocodeMatch>(r#"{"lat": "north", "lon": "2.3"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn out_of_range_is_invalid_coordinate() {
        let m: GeocodeMatch = serde_json::from_str(r#"{"lat": 123.0, "lon": 2.0}"#).unwrap();
        assert!(m.coordinate().is_err());
    }
}
