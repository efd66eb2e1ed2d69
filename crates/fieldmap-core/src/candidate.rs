use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ConfigError, Coordinate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    Event,
    Store,
}

impl std::fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateKind::Event => write!(f, "event"),
            CandidateKind::Store => write!(f, "store"),
        }
    }
}

/// An event or venue that can be filtered and placed on the map.
///
/// Read-only once loaded into a search session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    pub kind: CandidateKind,
    /// Event title or store name.
    pub title: String,
    /// Human-readable place, e.g. a city or an address line.
    #[serde(default)]
    pub location_label: Option<String>,
    pub coordinate: Coordinate,
    /// Field type, e.g. `woodland` or `cqb`.
    pub category: String,
    /// Sub-region code, e.g. a French département number.
    pub sub_region: String,
    pub country: String,
    #[serde(default)]
    pub occurs_on: Option<NaiveDate>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub price: Option<Decimal>,
}

impl Candidate {
    /// Route of the detail page for this candidate.
    #[must_use]
    pub fn detail_path(&self) -> String {
        match self.kind {
            CandidateKind::Event => format!("/events/{}", self.id),
            CandidateKind::Store => format!("/stores/{}", self.id),
        }
    }

    /// `occurs_on` rendered as `YYYY-MM-DD`, the form the date filter matches against.
    #[must_use]
    pub fn date_label(&self) -> Option<String> {
        self.occurs_on.map(|d| d.format("%Y-%m-%d").to_string())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CandidatesFile {
    pub candidates: Vec<Candidate>,
}

/// Read-only supplier of the candidate set, fetched once per search session.
pub trait CandidateSource {
    /// Returns every candidate known to the source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the source cannot be read or holds invalid records.
    fn fetch_all(&self) -> Result<Vec<Candidate>, ConfigError>;
}

/// Candidate source backed by a YAML (or JSON) document on disk.
#[derive(Debug, Clone)]
pub struct FileCandidateSource {
    path: PathBuf,
}

impl FileCandidateSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CandidateSource for FileCandidateSource {
    fn fetch_all(&self) -> Result<Vec<Candidate>, ConfigError> {
        load_candidates(&self.path).map(|file| file.candidates)
    }
}

/// Load and validate candidates from a YAML file. JSON documents parse too.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_candidates(path: &Path) -> Result<CandidatesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CandidatesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: CandidatesFile = serde_yaml::from_str(&content)?;
    validate_candidates(&file)?;

    tracing::debug!(
        path = %path.display(),
        count = file.candidates.len(),
        "loaded candidates"
    );
    Ok(file)
}

fn validate_candidates(file: &CandidatesFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for candidate in &file.candidates {
        if candidate.title.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "candidate {} has an empty title",
                candidate.id
            )));
        }

        if !candidate.coordinate.is_valid() {
            return Err(ConfigError::Validation(format!(
                "candidate '{}' has an out-of-range coordinate ({})",
                candidate.title, candidate.coordinate
            )));
        }

        if !seen_ids.insert(candidate.id) {
            return Err(ConfigError::Validation(format!(
                "duplicate candidate id: {}",
                candidate.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "candidate_test.rs"]
mod tests;
