//! Debounce and race resolution for query geocoding, as a pure state machine.
//!
//! ```text
//! Idle ──query──▶ Pending ──timer──▶ InFlight ──current result──▶ Idle
//!                  ▲   │                │
//!                  └───┘ query          └─ stale result: discarded
//! ```
//!
//! Two counters drive it. The debounce generation identifies the armed
//! timer, so a timer that fires after being superseded is ignored. The
//! request id is assigned at dispatch; only the latest dispatched id is
//! eligible to move the center, whatever order responses arrive in.

use fieldmap_core::Coordinate;

/// Identifies one armed debounce timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Generation(u64);

/// Dispatch-order id of a geocode request. Strictly increasing per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// No timer armed and no eligible request outstanding.
    Idle,
    /// Quiet-period timer armed.
    Pending { generation: Generation },
    /// Geocode dispatched and awaiting its response.
    InFlight { request_id: RequestId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeRequest {
    pub query: String,
    pub request_id: RequestId,
}

/// What the driver must do with its timer after a query change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Cancel any armed timer and arm a new one for this generation.
    Arm(Generation),
    /// Cancel any armed timer; nothing to geocode.
    Cancel,
}

/// Outcome of a geocode response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Latest request, with a match: move the center here.
    Applied(Coordinate),
    /// Latest request, no match or failure: center unchanged.
    NoMatch,
    /// Superseded request: ignore silently.
    Stale,
}

#[derive(Debug)]
pub struct GeocodeScheduler {
    phase: SearchPhase,
    generation: u64,
    last_request: u64,
    pending_query: Option<String>,
    eligible: Option<RequestId>,
}

impl Default for GeocodeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl GeocodeScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: SearchPhase::Idle,
            generation: 0,
            last_request: 0,
            pending_query: None,
            eligible: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Records a keystroke-level change of the text query.
    ///
    /// A blank query disarms the timer without scheduling anything. An
    /// outstanding request keeps its eligibility either way; only a newer
    /// dispatch supersedes it.
    pub fn query_changed(&mut self, text: &str) -> Schedule {
        self.generation += 1;
        let query = text.trim();

        if query.is_empty() {
            self.pending_query = None;
            if matches!(self.phase, SearchPhase::Pending { .. }) {
                self.phase = self.settled_phase();
            }
            return Schedule::Cancel;
        }

        let generation = Generation(self.generation);
        self.pending_query = Some(query.to_string());
        self.phase = SearchPhase::Pending { generation };
        Schedule::Arm(generation)
    }

    /// The quiet period of `generation` elapsed. Returns the request to
    /// dispatch, or `None` if that timer was superseded.
    pub fn timer_fired(&mut self, generation: Generation) -> Option<GeocodeRequest> {
        match self.phase {
            SearchPhase::Pending { generation: armed } if armed == generation => {}
            _ => return None,
        }
        let query = self.pending_query.take()?;

        self.last_request += 1;
        let request_id = RequestId(self.last_request);
        self.eligible = Some(request_id);
        self.phase = SearchPhase::InFlight { request_id };
        Some(GeocodeRequest { query, request_id })
    }

    /// A response for `request_id` arrived.
    pub fn resolve(&mut self, request_id: RequestId, result: Option<Coordinate>) -> Resolution {
        if self.eligible != Some(request_id) {
            return Resolution::Stale;
        }
        self.eligible = None;
        if self.phase == (SearchPhase::InFlight { request_id }) {
            self.phase = SearchPhase::Idle;
        }
        match result {
            Some(coordinate) => Resolution::Applied(coordinate),
            None => Resolution::NoMatch,
        }
    }

    /// The center was set directly (device location). Disarms the timer and
    /// makes every outstanding request stale.
    pub fn bypass(&mut self) {
        self.generation += 1;
        self.pending_query = None;
        self.eligible = None;
        self.phase = SearchPhase::Idle;
    }

    fn settled_phase(&self) -> SearchPhase {
        match self.eligible {
            Some(request_id) => SearchPhase::InFlight { request_id },
            None => SearchPhase::Idle,
        }
    }
}
