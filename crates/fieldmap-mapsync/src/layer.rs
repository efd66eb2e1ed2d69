//! Derived layers. Built from the current search state and never patched.

use serde::Serialize;
use uuid::Uuid;

use fieldmap_core::{Candidate, CandidateKind, Coordinate};

use crate::projection::{geodesic_ring, projected_radius_m, to_web_mercator};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layer {
    RadiusOverlay(RadiusOverlay),
    Markers { features: Vec<MarkerFeature> },
}

impl Layer {
    #[must_use]
    pub fn as_overlay(&self) -> Option<&RadiusOverlay> {
        match self {
            Layer::RadiusOverlay(overlay) => Some(overlay),
            Layer::Markers { .. } => None,
        }
    }

    #[must_use]
    pub fn markers(&self) -> &[MarkerFeature] {
        match self {
            Layer::Markers { features } => features,
            Layer::RadiusOverlay(_) => &[],
        }
    }
}

/// Search-radius circle, in both renderer and ground terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadiusOverlay {
    pub center: Coordinate,
    pub radius_km: f64,
    /// Center in EPSG:3857 metres.
    pub projected_center: (f64, f64),
    /// Radius in EPSG:3857 metres at the center's latitude.
    pub projected_radius_m: f64,
    /// Open geodesic ring at `radius_km`.
    pub ring: Vec<Coordinate>,
}

impl RadiusOverlay {
    #[must_use]
    pub fn new(center: Coordinate, radius_km: f64, segments: usize) -> Self {
        Self {
            center,
            radius_km,
            projected_center: to_web_mercator(center),
            projected_radius_m: projected_radius_m(radius_km, center.lat),
            ring: geodesic_ring(center, radius_km, segments),
        }
    }
}

/// One marker, carrying what the detail popup shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerFeature {
    pub candidate_id: Uuid,
    pub kind: CandidateKind,
    pub title: String,
    pub category: String,
    pub location_label: Option<String>,
    pub date: Option<String>,
    pub coordinate: Coordinate,
    pub detail_path: String,
}

impl From<&Candidate> for MarkerFeature {
    fn from(candidate: &Candidate) -> Self {
        Self {
            candidate_id: candidate.id,
            kind: candidate.kind,
            title: candidate.title.clone(),
            category: candidate.category.clone(),
            location_label: candidate.location_label.clone(),
            date: candidate.date_label(),
            coordinate: candidate.coordinate,
            detail_path: candidate.detail_path(),
        }
    }
}
