//! Search criteria and the predicate derived from them.
//!
//! [`FilterCriteria`] is a plain value. Every change goes through
//! [`reduce`], which returns a new value instead of mutating the old one, and
//! [`FilterState`] swaps its `Arc` only when the value actually changed. That
//! lets downstream caches key on `Arc` identity.

use std::convert::Infallible;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::countries::country_by_key;
use crate::{Candidate, Coordinate, CoreError};

const ALL: &str = "all";

/// A facet value or the `"all"` sentinel that disables the facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed == ALL {
            Selection::All
        } else {
            Selection::Only(trimmed.to_string())
        }
    }

    /// Exact match, or always `true` for [`Selection::All`].
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(expected) => expected == value,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Selection::All => ALL,
            Selection::Only(value) => value,
        }
    }
}

impl FromStr for Selection {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Selection> for String {
    fn from(value: Selection) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current search criteria.
///
/// `radius_km == 0.0` means radius filtering is disabled, not "exact
/// position only".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub text_query: String,
    pub category: Selection,
    pub sub_region: Selection,
    pub country: Selection,
    /// Substring matched against the candidate's `YYYY-MM-DD` date.
    pub date: Option<String>,
    pub radius_km: f64,
    pub center: Coordinate,
}

impl FilterCriteria {
    /// Session defaults: every facet open, radius unbounded, centered on `center`.
    #[must_use]
    pub fn new(center: Coordinate) -> Self {
        Self {
            text_query: String::new(),
            category: Selection::All,
            sub_region: Selection::All,
            country: Selection::All,
            date: None,
            radius_km: 0.0,
            center,
        }
    }

    #[must_use]
    pub fn is_radius_bounded(&self) -> bool {
        self.radius_km > 0.0
    }
}

/// A single change to the criteria.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    SetQuery(String),
    SetCategory(Selection),
    SetSubRegion(Selection),
    /// Recognized countries also move the center to their centroid.
    SetCountry(Selection),
    SetDate(Option<String>),
    SetRadius(f64),
    SetCenter(Coordinate),
    /// Back to session defaults around `center`.
    Reset { center: Coordinate },
}

/// Applies `action` to `current`, producing the next criteria value.
///
/// # Errors
///
/// Returns [`CoreError::InvalidRadius`] for a negative or non-finite radius and
/// [`CoreError::InvalidCoordinate`] for an out-of-range center.
pub fn reduce(current: &FilterCriteria, action: FilterAction) -> Result<FilterCriteria, CoreError> {
    let mut next = current.clone();
    match action {
        FilterAction::SetQuery(text) => next.text_query = text,
        FilterAction::SetCategory(selection) => next.category = selection,
        FilterAction::SetSubRegion(selection) => next.sub_region = selection,
        FilterAction::SetCountry(selection) => {
            let known = match &selection {
                Selection::Only(key) => country_by_key(key),
                Selection::All => None,
            };
            next.country = match known {
                Some(country) => {
                    next.center = country.centroid;
                    Selection::Only(country.key.to_string())
                }
                None => selection,
            };
        }
        FilterAction::SetDate(date) => {
            next.date = date
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty());
        }
        FilterAction::SetRadius(radius_km) => {
            if !radius_km.is_finite() || radius_km < 0.0 {
                return Err(CoreError::InvalidRadius(radius_km));
            }
            next.radius_km = radius_km;
        }
        FilterAction::SetCenter(center) => {
            next.center = Coordinate::new(center.lon, center.lat)?;
        }
        FilterAction::Reset { center } => {
            next = FilterCriteria::new(Coordinate::new(center.lon, center.lat)?);
        }
    }
    Ok(next)
}

/// Candidate predicate compiled from one criteria value.
#[derive(Debug, Clone)]
pub struct Predicate {
    query: Option<String>,
    category: Selection,
    sub_region: Selection,
    country: Selection,
    date: Option<String>,
    radius: Option<(Coordinate, f64)>,
}

impl Predicate {
    #[must_use]
    pub fn compile(criteria: &FilterCriteria) -> Self {
        let query = criteria.text_query.trim();
        Self {
            query: (!query.is_empty()).then(|| query.to_lowercase()),
            category: criteria.category.clone(),
            sub_region: criteria.sub_region.clone(),
            country: criteria.country.clone(),
            date: criteria.date.clone(),
            radius: criteria
                .is_radius_bounded()
                .then_some((criteria.center, criteria.radius_km)),
        }
    }

    /// Logical AND of every active clause.
    #[must_use]
    pub fn matches(&self, candidate: &Candidate) -> bool {
        self.matches_text(candidate)
            && self.category.matches(&candidate.category)
            && self.sub_region.matches(&candidate.sub_region)
            && self.country.matches(&candidate.country)
            && self.matches_date(candidate)
            && self.matches_radius(candidate)
    }

    fn matches_text(&self, candidate: &Candidate) -> bool {
        let Some(query) = &self.query else {
            return true;
        };
        candidate.title.to_lowercase().contains(query)
            || candidate
                .location_label
                .as_deref()
                .is_some_and(|label| label.to_lowercase().contains(query))
    }

    fn matches_date(&self, candidate: &Candidate) -> bool {
        let Some(date) = &self.date else {
            return true;
        };
        candidate
            .date_label()
            .is_some_and(|label| label.contains(date.as_str()))
    }

    fn matches_radius(&self, candidate: &Candidate) -> bool {
        let Some((center, radius_km)) = self.radius else {
            return true;
        };
        center.distance_km(&candidate.coordinate) <= radius_km
    }
}

/// Owner of the current criteria and its compiled predicate.
#[derive(Debug, Clone)]
pub struct FilterState {
    criteria: Arc<FilterCriteria>,
    predicate: Predicate,
}

impl FilterState {
    #[must_use]
    pub fn new(criteria: FilterCriteria) -> Self {
        let predicate = Predicate::compile(&criteria);
        Self {
            criteria: Arc::new(criteria),
            predicate,
        }
    }

    #[must_use]
    pub fn criteria(&self) -> &Arc<FilterCriteria> {
        &self.criteria
    }

    #[must_use]
    pub fn apply(&self, candidate: &Candidate) -> bool {
        self.predicate.matches(candidate)
    }

    /// Reduces `action` into the state. Returns `true` when the criteria
    /// changed, in which case [`FilterState::criteria`] is a new `Arc`.
    ///
    /// # Errors
    ///
    /// Propagates the validation errors of [`reduce`]; the state is left
    /// untouched on error.
    pub fn dispatch(&mut self, action: FilterAction) -> Result<bool, CoreError> {
        let next = reduce(&self.criteria, action)?;
        if next == *self.criteria {
            return Ok(false);
        }
        self.predicate = Predicate::compile(&next);
        self.criteria = Arc::new(next);
        Ok(true)
    }

    /// Candidates accepted by the predicate, in input order.
    #[must_use]
    pub fn filter<'a>(&self, candidates: &'a [Candidate]) -> Vec<&'a Candidate> {
        candidates.iter().filter(|c| self.apply(c)).collect()
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
