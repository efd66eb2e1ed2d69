use thiserror::Error;

/// Errors raised by domain-level validation.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid coordinate (lon={lon}, lat={lat}): longitude must be in [-180, 180] and latitude in [-90, 90]")]
    InvalidCoordinate { lon: f64, lat: f64 },

    #[error("invalid search radius {0} km: must be a finite number >= 0")]
    InvalidRadius(f64),
}

/// Errors raised while loading configuration or the candidate file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read candidates file {path}: {source}")]
    CandidatesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse candidates file: {0}")]
    CandidatesFileParse(#[from] serde_yaml::Error),

    #[error("candidate validation failed: {0}")]
    Validation(String),
}
