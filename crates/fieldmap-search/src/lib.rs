//! Search session orchestration.
//!
//! [`SearchOrchestrator`] owns the filter criteria for one session and turns
//! keystrokes into at most one geocode per quiet period. Responses that
//! arrive out of order are reconciled by [`GeocodeScheduler`], so the center
//! always reflects the most recently dispatched query.

pub mod orchestrator;
pub mod scheduler;

pub use orchestrator::{Notice, SearchConfig, SearchOrchestrator, DEFAULT_DEBOUNCE};
pub use scheduler::{
    GeocodeRequest, GeocodeScheduler, Generation, RequestId, Resolution, Schedule, SearchPhase,
};
