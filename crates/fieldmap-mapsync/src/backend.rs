//! The rendering provider seam.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use fieldmap_core::Coordinate;

use crate::layer::{Layer, MarkerFeature};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: Coordinate,
    pub zoom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LayerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct HandlerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Click,
    Move,
}

/// Pointer input, with the marker the backend found under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub coordinate: Coordinate,
    pub feature: Option<MarkerFeature>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    #[default]
    Default,
    /// "Clickable" affordance.
    Pointer,
}

/// Detail popup anchored at a marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub anchor: Coordinate,
    pub candidate_id: Uuid,
    pub title: String,
    pub category: String,
    pub location_label: Option<String>,
    pub detail_path: String,
}

impl From<&MarkerFeature> for Popup {
    fn from(feature: &MarkerFeature) -> Self {
        Self {
            anchor: feature.coordinate,
            candidate_id: feature.candidate_id,
            title: feature.title.clone(),
            category: feature.category.clone(),
            location_label: feature.location_label.clone(),
            detail_path: feature.detail_path.clone(),
        }
    }
}

/// What the backend should do in response to a pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerAction {
    ShowPopup(Popup),
    HidePopup,
    SetCursor(Cursor),
}

pub type PointerHandler = Box<dyn FnMut(&PointerEvent) -> PointerAction>;

/// An opaque map renderer owning a viewport, layers and pointer handlers.
///
/// All calls happen on one thread, in order. After [`MapBackend::dispose`]
/// the instance is dead and must not be used again.
pub trait MapBackend {
    fn set_view(&mut self, viewport: Viewport);

    fn add_layer(&mut self, layer: Layer) -> LayerId;

    /// Returns `false` if `id` was not attached.
    fn remove_layer(&mut self, id: LayerId) -> bool;

    fn bind(&mut self, kind: PointerKind, handler: PointerHandler) -> HandlerId;

    /// Returns `false` if `id` was not bound.
    fn unbind(&mut self, id: HandlerId) -> bool;

    /// Releases the instance itself.
    fn dispose(&mut self);
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler-{}", self.0)
    }
}
