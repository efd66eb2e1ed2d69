//! Keeps a map view consistent with the search state.
//!
//! A [`MapSyncController`] owns the single rendering backend of one mounted
//! view. Every [`MapSyncController::sync`] rebuilds the derived layers
//! (radius overlay, markers) from scratch, so what is drawn is always a
//! function of the current center, radius and filtered candidates.
//! Teardown releases layers, handlers and the backend on every exit path.

pub mod backend;
pub mod controller;
pub mod error;
pub mod layer;
pub mod memory;
pub mod projection;
pub mod registry;

pub use backend::{
    Cursor, HandlerId, LayerId, MapBackend, PointerAction, PointerEvent, PointerHandler,
    PointerKind, Popup, Viewport,
};
pub use controller::{MapConfig, MapSyncController};
pub use error::MapError;
pub use layer::{Layer, MarkerFeature, RadiusOverlay};
pub use memory::MemoryMap;
pub use registry::{MapRegistry, ViewId};
