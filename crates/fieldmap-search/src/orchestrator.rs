//! The search session: filter criteria, debounced geocoding of the text
//! query, device geolocation and the memoized filtered list.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use fieldmap_core::{
    country_by_key, AppConfig, Candidate, Coordinate, CoreError, FilterAction, FilterCriteria,
    FilterState, Selection,
};
use fieldmap_geocode::{GeolocationError, Geocoder, Geolocator};

use crate::scheduler::{GeocodeScheduler, RequestId, Resolution, Schedule, SearchPhase};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Quiet period after the last query change before geocoding.
    pub debounce: Duration,
    /// Initial center, and the center `reset` returns to.
    pub default_center: Coordinate,
}

impl SearchConfig {
    /// Default quiet period around `default_center`.
    #[must_use]
    pub fn around(default_center: Coordinate) -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            default_center,
        }
    }

    /// Debounce from `FIELDMAP_DEBOUNCE_MS`, center from the default
    /// country's centroid.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        let default_center = country_by_key(&config.default_country)
            .or_else(|| country_by_key("france"))
            .map_or(Coordinate { lon: 0.0, lat: 0.0 }, |c| c.centroid);
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            default_center,
        }
    }
}

/// One-time message for the user. Cleared once taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub cause: GeolocationError,
}

impl Notice {
    fn location_unavailable(cause: GeolocationError) -> Self {
        let message = match &cause {
            GeolocationError::PermissionDenied => {
                "Location access was denied; the search center was not changed.".to_string()
            }
            GeolocationError::Unavailable(_) => {
                "Your location could not be determined; the search center was not changed."
                    .to_string()
            }
        };
        Self { message, cause }
    }
}

struct Session {
    filter: FilterState,
    scheduler: GeocodeScheduler,
    notice: Option<Notice>,
    filtered: Option<(Arc<FilterCriteria>, Arc<[Candidate]>)>,
}

/// State shared with timer and request tasks.
struct Shared {
    session: Mutex<Session>,
    changes: watch::Sender<Arc<FilterCriteria>>,
}

impl Shared {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(&self, action: FilterAction) -> Result<bool, CoreError> {
        let mut session = self.session();
        let changed = session.filter.dispatch(action)?;
        if changed {
            self.changes
                .send_replace(Arc::clone(session.filter.criteria()));
        }
        Ok(changed)
    }

    fn resolve(&self, request_id: RequestId, query: &str, result: Option<Coordinate>) {
        let mut session = self.session();
        let id = request_id.get();
        match session.scheduler.resolve(request_id, result) {
            Resolution::Applied(center) => {
                match session.filter.dispatch(FilterAction::SetCenter(center)) {
                    Ok(changed) => {
                        tracing::info!(query, %center, request_id = id, "search center moved");
                        if changed {
                            self.changes
                                .send_replace(Arc::clone(session.filter.criteria()));
                        }
                    }
                    Err(e) => tracing::warn!(query, error = %e, "geocoded center rejected"),
                }
            }
            Resolution::NoMatch => {
                tracing::debug!(query, request_id = id, "no match, center unchanged");
            }
            Resolution::Stale => {
                tracing::debug!(query, request_id = id, "discarding stale geocode result");
            }
        }
    }
}

/// Drives one search session.
///
/// Setters that touch the text query spawn tokio tasks, so they must be
/// called from within a runtime.
pub struct SearchOrchestrator<G> {
    shared: Arc<Shared>,
    geocoder: Arc<G>,
    candidates: Arc<[Candidate]>,
    config: SearchConfig,
    timer: Option<JoinHandle<()>>,
}

impl<G: Geocoder> SearchOrchestrator<G> {
    pub fn new(
        geocoder: G,
        candidates: impl Into<Arc<[Candidate]>>,
        config: SearchConfig,
    ) -> Self {
        let filter = FilterState::new(FilterCriteria::new(config.default_center));
        let (changes, _) = watch::channel(Arc::clone(filter.criteria()));
        let session = Session {
            filter,
            scheduler: GeocodeScheduler::new(),
            notice: None,
            filtered: None,
        };
        Self {
            shared: Arc::new(Shared {
                session: Mutex::new(session),
                changes,
            }),
            geocoder: Arc::new(geocoder),
            candidates: candidates.into(),
            config,
            timer: None,
        }
    }

    /// Updates the text query and (re)arms the geocoding debounce.
    ///
    /// The text filter applies immediately; the center only moves once the
    /// query has been stable for the quiet period and the geocoder answers.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn set_query(&mut self, text: impl Into<String>) {
        let text = text.into();
        let schedule = {
            let mut session = self.shared.session();
            let schedule = session.scheduler.query_changed(&text);
            if let Ok(true) = session.filter.dispatch(FilterAction::SetQuery(text)) {
                self.shared
                    .changes
                    .send_replace(Arc::clone(session.filter.criteria()));
            }
            schedule
        };

        self.cancel_timer();
        if let Schedule::Arm(generation) = schedule {
            let shared = Arc::clone(&self.shared);
            let geocoder = Arc::clone(&self.geocoder);
            let debounce = self.config.debounce;
            self.timer = Some(tokio::spawn(async move {
                tokio::time::sleep(debounce).await;
                let (request, country_code) = {
                    let mut session = shared.session();
                    let Some(request) = session.scheduler.timer_fired(generation) else {
                        return;
                    };
                    (request, country_bias(&session.filter.criteria().country))
                };
                tracing::debug!(
                    query = %request.query,
                    request_id = request.request_id.get(),
                    country_code,
                    "dispatching geocode"
                );
                // Detached so a later keystroke, which aborts the timer, does
                // not cancel a request that is already out.
                tokio::spawn(async move {
                    let result = geocoder.geocode(&request.query, country_code).await;
                    shared.resolve(request.request_id, &request.query, result);
                });
            }));
        }
    }

    /// # Errors
    ///
    /// Never fails today; the signature matches the other setters.
    pub fn set_category(&mut self, category: &str) -> Result<(), CoreError> {
        self.shared
            .dispatch(FilterAction::SetCategory(Selection::parse(category)))
            .map(drop)
    }

    /// # Errors
    ///
    /// Never fails today; the signature matches the other setters.
    pub fn set_sub_region(&mut self, sub_region: &str) -> Result<(), CoreError> {
        self.shared
            .dispatch(FilterAction::SetSubRegion(Selection::parse(sub_region)))
            .map(drop)
    }

    /// Selects a country. A country with a known centroid also recenters the
    /// search there, overriding any earlier geocoded or device position.
    ///
    /// # Errors
    ///
    /// Never fails today; the signature matches the other setters.
    pub fn set_country(&mut self, country: &str) -> Result<(), CoreError> {
        self.shared
            .dispatch(FilterAction::SetCountry(Selection::parse(country)))
            .map(drop)
    }

    /// Sets the date filter; `None` or a blank string clears it.
    ///
    /// # Errors
    ///
    /// Never fails today; the signature matches the other setters.
    pub fn set_date(&mut self, date: Option<&str>) -> Result<(), CoreError> {
        self.shared
            .dispatch(FilterAction::SetDate(date.map(str::to_string)))
            .map(drop)
    }

    /// Sets the radius in kilometres; 0 means unbounded.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidRadius`] for negative or non-finite values.
    pub fn set_radius(&mut self, radius_km: f64) -> Result<(), CoreError> {
        self.shared
            .dispatch(FilterAction::SetRadius(radius_km))
            .map(drop)
    }

    /// Back to the session defaults. Pending geocodes are dropped.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidCoordinate`] if the configured default center is
    /// out of range.
    pub fn reset(&mut self) -> Result<(), CoreError> {
        self.cancel_timer();
        self.shared.session().scheduler.bypass();
        self.shared
            .dispatch(FilterAction::Reset {
                center: self.config.default_center,
            })
            .map(drop)
    }

    /// Recenters on the device position.
    ///
    /// On success every pending or in-flight geocode becomes stale. On
    /// failure the criteria are untouched and a [`Notice`] is raised.
    pub async fn use_current_location(
        &mut self,
        geolocator: &impl Geolocator,
    ) -> Option<Coordinate> {
        let reading = geolocator.current_position().await;

        let mut session = self.shared.session();
        let position = match reading {
            Ok(position) => position,
            Err(cause) => {
                tracing::warn!(error = %cause, "geolocation failed");
                session.notice = Some(Notice::location_unavailable(cause));
                return None;
            }
        };

        match session.filter.dispatch(FilterAction::SetCenter(position)) {
            Ok(changed) => {
                session.scheduler.bypass();
                if changed {
                    self.shared
                        .changes
                        .send_replace(Arc::clone(session.filter.criteria()));
                }
                drop(session);
                self.cancel_timer();
                tracing::info!(center = %position, "search center set from device location");
                Some(position)
            }
            Err(e) => {
                tracing::warn!(error = %e, "device reported an invalid position");
                let cause = GeolocationError::Unavailable(e.to_string());
                session.notice = Some(Notice::location_unavailable(cause));
                None
            }
        }
    }

    #[must_use]
    pub fn criteria(&self) -> Arc<FilterCriteria> {
        Arc::clone(self.shared.session().filter.criteria())
    }

    #[must_use]
    pub fn current_center(&self) -> Coordinate {
        self.shared.session().filter.criteria().center
    }

    #[must_use]
    pub fn current_radius(&self) -> f64 {
        self.shared.session().filter.criteria().radius_km
    }

    #[must_use]
    pub fn phase(&self) -> SearchPhase {
        self.shared.session().scheduler.phase()
    }

    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Candidates accepted by the current criteria, in input order.
    ///
    /// Recomputed only when the criteria value changes; otherwise the same
    /// `Arc` is handed out again.
    #[must_use]
    pub fn filtered_candidates(&self) -> Arc<[Candidate]> {
        let mut guard = self.shared.session();
        let session = &mut *guard;
        let criteria = session.filter.criteria();

        if let Some((key, filtered)) = &session.filtered {
            if Arc::ptr_eq(key, criteria) {
                return Arc::clone(filtered);
            }
        }

        let filtered: Arc<[Candidate]> = self
            .candidates
            .iter()
            .filter(|c| session.filter.apply(c))
            .cloned()
            .collect();
        tracing::debug!(
            total = self.candidates.len(),
            matched = filtered.len(),
            "filtered candidates"
        );
        session.filtered = Some((Arc::clone(criteria), Arc::clone(&filtered)));
        filtered
    }

    /// Peeks at the pending notice without dismissing it.
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        self.shared.session().notice.clone()
    }

    /// Returns and dismisses the pending notice.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.shared.session().notice.take()
    }

    /// Receiver that observes every criteria change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<FilterCriteria>> {
        self.shared.changes.subscribe()
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl<G> Drop for SearchOrchestrator<G> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

fn country_bias(country: &Selection) -> Option<&'static str> {
    match country {
        Selection::All => None,
        Selection::Only(key) => country_by_key(key).map(|c| c.iso_code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_bias_uses_iso_code() {
        assert_eq!(country_bias(&Selection::All), None);
        assert_eq!(country_bias(&Selection::parse("Belgique")), Some("be"));
        assert_eq!(country_bias(&Selection::parse("atlantis")), None);
    }

    #[test]
    fn config_centers_on_default_country() {
        let mut config = test_app_config();
        config.default_country = "suisse".to_string();
        config.debounce_ms = 250;
        let search = SearchConfig::from_app_config(&config);
        assert_eq!(search.debounce, Duration::from_millis(250));
        assert_eq!(
            search.default_center,
            country_by_key("suisse").unwrap().centroid
        );
    }

    #[test]
    fn denied_notice_mentions_denial() {
        let notice = Notice::location_unavailable(GeolocationError::PermissionDenied);
        assert!(notice.message.contains("denied"));
    }

    fn test_app_config() -> AppConfig {
        fieldmap_core::build_app_config(|_| Err(std::env::VarError::NotPresent)).unwrap()
    }
}
