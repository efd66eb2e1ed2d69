use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("unknown").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "FIELDMAP_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(
        cfg.candidates_path.to_string_lossy(),
        "./config/candidates.yaml"
    );
    assert_eq!(cfg.default_country, "france");
    assert_eq!(cfg.geocoder_url, "https://nominatim.openstreetmap.org/search");
    assert_eq!(cfg.geocoder_user_agent, "fieldmap/0.1 (venue-discovery)");
    assert_eq!(cfg.geocoder_timeout_secs, 10);
    assert_eq!(cfg.geocoder_max_retries, 1);
    assert_eq!(cfg.geocoder_retry_backoff_ms, 250);
    assert_eq!(cfg.debounce_ms, 500);
    assert!((cfg.map_zoom_unbounded - 6.0).abs() < f64::EPSILON);
    assert!((cfg.map_zoom_bounded - 10.0).abs() < f64::EPSILON);
}

#[test]
fn debounce_ms_override() {
    let mut map = HashMap::new();
    map.insert("FIELDMAP_DEBOUNCE_MS", "250");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.debounce_ms, 250);
}

#[test]
fn debounce_ms_invalid() {
    let mut map = HashMap::new();
    map.insert("FIELDMAP_DEBOUNCE_MS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FIELDMAP_DEBOUNCE_MS"),
        "expected InvalidEnvVar(FIELDMAP_DEBOUNCE_MS), got: {result:?}"
    );
}

#[test]
fn geocoder_max_retries_invalid() {
    let mut map = HashMap::new();
    map.insert("FIELDMAP_GEOCODER_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FIELDMAP_GEOCODER_MAX_RETRIES"),
        "expected InvalidEnvVar(FIELDMAP_GEOCODER_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn default_country_is_normalised() {
    let mut map = HashMap::new();
    map.insert("FIELDMAP_DEFAULT_COUNTRY", "  Belgique ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.default_country, "belgique");
}

#[test]
fn default_country_unknown_fails() {
    let mut map = HashMap::new();
    map.insert("FIELDMAP_DEFAULT_COUNTRY", "atlantis");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FIELDMAP_DEFAULT_COUNTRY"),
        "expected InvalidEnvVar(FIELDMAP_DEFAULT_COUNTRY), got: {result:?}"
    );
}

#[test]
fn zoom_out_of_range_fails() {
    let mut map = HashMap::new();
    map.insert("FIELDMAP_MAP_ZOOM_BOUNDED", "30");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FIELDMAP_MAP_ZOOM_BOUNDED"),
        "expected InvalidEnvVar(FIELDMAP_MAP_ZOOM_BOUNDED), got: {result:?}"
    );
}

#[test]
fn zoom_override() {
    let mut map = HashMap::new();
    map.insert("FIELDMAP_MAP_ZOOM_UNBOUNDED", "5.5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!((cfg.map_zoom_unbounded - 5.5).abs() < f64::EPSILON);
}
