use crate::app_config::{AppConfig, Environment};
use crate::countries::country_by_key;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_zoom = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let zoom = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if !(0.0..=24.0).contains(&zoom) {
            return Err(invalid(var, format!("zoom {zoom} is outside 0..=24")));
        }
        Ok(zoom)
    };

    let env = parse_environment(&or_default("FIELDMAP_ENV", "development"))?;
    let log_level = or_default("FIELDMAP_LOG_LEVEL", "info");
    let candidates_path = PathBuf::from(or_default(
        "FIELDMAP_CANDIDATES_PATH",
        "./config/candidates.yaml",
    ));

    let default_country = or_default("FIELDMAP_DEFAULT_COUNTRY", "france")
        .trim()
        .to_lowercase();
    if country_by_key(&default_country).is_none() {
        return Err(invalid(
            "FIELDMAP_DEFAULT_COUNTRY",
            format!("unknown country '{default_country}'"),
        ));
    }

    let geocoder_url = or_default(
        "FIELDMAP_GEOCODER_URL",
        "https://nominatim.openstreetmap.org/search",
    );
    let geocoder_user_agent = or_default(
        "FIELDMAP_GEOCODER_USER_AGENT",
        "fieldmap/0.1 (venue-discovery)",
    );
    let geocoder_timeout_secs = parse_u64("FIELDMAP_GEOCODER_TIMEOUT_SECS", "10")?;
    let geocoder_max_retries = parse_u32("FIELDMAP_GEOCODER_MAX_RETRIES", "1")?;
    let geocoder_retry_backoff_ms = parse_u64("FIELDMAP_GEOCODER_RETRY_BACKOFF_MS", "250")?;

    let debounce_ms = parse_u64("FIELDMAP_DEBOUNCE_MS", "500")?;
    let map_zoom_unbounded = parse_zoom("FIELDMAP_MAP_ZOOM_UNBOUNDED", "6")?;
    let map_zoom_bounded = parse_zoom("FIELDMAP_MAP_ZOOM_BOUNDED", "10")?;

    Ok(AppConfig {
        env,
        log_level,
        candidates_path,
        default_country,
        geocoder_url,
        geocoder_user_agent,
        geocoder_timeout_secs,
        geocoder_max_retries,
        geocoder_retry_backoff_ms,
        debounce_ms,
        map_zoom_unbounded,
        map_zoom_bounded,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FIELDMAP_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
