//! In-process [`MapBackend`] for hosts without a renderer, and for tests.
//!
//! Cloning a [`MemoryMap`] yields another handle to the same instance, so
//! the state stays observable after the controller that owns it is gone.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::{json, Value};

use fieldmap_core::Coordinate;

use crate::backend::{
    Cursor, HandlerId, LayerId, MapBackend, PointerAction, PointerEvent, PointerHandler,
    PointerKind, Popup, Viewport,
};
use crate::layer::{Layer, MarkerFeature, RadiusOverlay};

/// Default hit-test distance for pointer events.
pub const DEFAULT_HIT_TOLERANCE_KM: f64 = 0.5;

struct BoundHandler {
    id: HandlerId,
    kind: PointerKind,
    handler: PointerHandler,
}

struct MemoryState {
    viewport: Option<Viewport>,
    layers: BTreeMap<LayerId, Layer>,
    handlers: Vec<BoundHandler>,
    popup: Option<Popup>,
    cursor: Cursor,
    next_id: u64,
    disposed: bool,
    hit_tolerance_km: f64,
}

impl MemoryState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Nearest marker within tolerance of `at`.
    fn feature_at(&self, at: Coordinate) -> Option<MarkerFeature> {
        self.layers
            .values()
            .flat_map(Layer::markers)
            .map(|feature| (at.distance_km(&feature.coordinate), feature))
            .filter(|(distance, _)| *distance <= self.hit_tolerance_km)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, feature)| feature.clone())
    }

    fn apply(&mut self, action: &PointerAction) {
        match action {
            PointerAction::ShowPopup(popup) => self.popup = Some(popup.clone()),
            PointerAction::HidePopup => self.popup = None,
            PointerAction::SetCursor(cursor) => self.cursor = *cursor,
        }
    }
}

#[derive(Clone)]
pub struct MemoryMap {
    state: Rc<RefCell<MemoryState>>,
}

impl Default for MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMap {
    #[must_use]
    pub fn new() -> Self {
        Self::with_hit_tolerance_km(DEFAULT_HIT_TOLERANCE_KM)
    }

    #[must_use]
    pub fn with_hit_tolerance_km(hit_tolerance_km: f64) -> Self {
        Self {
            state: Rc::new(RefCell::new(MemoryState {
                viewport: None,
                layers: BTreeMap::new(),
                handlers: Vec::new(),
                popup: None,
                cursor: Cursor::Default,
                next_id: 0,
                disposed: false,
                hit_tolerance_km,
            })),
        }
    }

    /// Simulates a click at `at` and returns what the bound handlers did.
    pub fn click(&self, at: Coordinate) -> Vec<PointerAction> {
        self.dispatch(PointerKind::Click, at)
    }

    /// Simulates the pointer moving to `at`.
    pub fn pointer_move(&self, at: Coordinate) -> Vec<PointerAction> {
        self.dispatch(PointerKind::Move, at)
    }

    fn dispatch(&self, kind: PointerKind, at: Coordinate) -> Vec<PointerAction> {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let event = PointerEvent {
            coordinate: at,
            feature: state.feature_at(at),
        };
        let actions: Vec<PointerAction> = state
            .handlers
            .iter_mut()
            .filter(|bound| bound.kind == kind)
            .map(|bound| (bound.handler)(&event))
            .collect();
        for action in &actions {
            state.apply(action);
        }
        actions
    }

    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.state.borrow().viewport
    }

    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.state.borrow().layers.len()
    }

    #[must_use]
    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.state.borrow().layers.keys().copied().collect()
    }

    #[must_use]
    pub fn overlay(&self) -> Option<RadiusOverlay> {
        self.state
            .borrow()
            .layers
            .values()
            .find_map(Layer::as_overlay)
            .cloned()
    }

    #[must_use]
    pub fn markers(&self) -> Vec<MarkerFeature> {
        self.state
            .borrow()
            .layers
            .values()
            .flat_map(Layer::markers)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn handler_count(&self, kind: PointerKind) -> usize {
        self.state
            .borrow()
            .handlers
            .iter()
            .filter(|bound| bound.kind == kind)
            .count()
    }

    #[must_use]
    pub fn popup(&self) -> Option<Popup> {
        self.state.borrow().popup.clone()
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.state.borrow().cursor
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.state.borrow().disposed
    }

    /// Current layers as a GeoJSON `FeatureCollection`.
    ///
    /// Markers become `Point` features; the radius overlay becomes a closed
    /// `Polygon` built from its geodesic ring.
    #[must_use]
    pub fn to_geojson(&self) -> Value {
        let state = self.state.borrow();
        let mut features = Vec::new();
        for layer in state.layers.values() {
            match layer {
                Layer::RadiusOverlay(overlay) => features.push(overlay_feature(overlay)),
                Layer::Markers { features: markers } => {
                    features.extend(markers.iter().map(marker_feature));
                }
            }
        }
        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}

fn position(coordinate: Coordinate) -> Value {
    json!([coordinate.lon, coordinate.lat])
}

fn marker_feature(marker: &MarkerFeature) -> Value {
    json!({
        "type": "Feature",
        "id": marker.candidate_id.to_string(),
        "geometry": { "type": "Point", "coordinates": position(marker.coordinate) },
        "properties": {
            "kind": marker.kind,
            "title": marker.title,
            "category": marker.category,
            "location_label": marker.location_label,
            "date": marker.date,
            "detail_path": marker.detail_path,
        },
    })
}

fn overlay_feature(overlay: &RadiusOverlay) -> Value {
    let mut ring: Vec<Value> = overlay.ring.iter().copied().map(position).collect();
    if let Some(first) = overlay.ring.first() {
        ring.push(position(*first));
    }
    json!({
        "type": "Feature",
        "geometry": { "type": "Polygon", "coordinates": [ring] },
        "properties": {
            "layer": "radius_overlay",
            "center": position(overlay.center),
            "radius_km": overlay.radius_km,
            "projected_radius_m": overlay.projected_radius_m,
        },
    })
}

impl MapBackend for MemoryMap {
    fn set_view(&mut self, viewport: Viewport) {
        let mut state = self.state.borrow_mut();
        if state.disposed {
            tracing::warn!("set_view on a disposed map ignored");
            return;
        }
        state.viewport = Some(viewport);
    }

    fn add_layer(&mut self, layer: Layer) -> LayerId {
        let mut state = self.state.borrow_mut();
        let id = LayerId(state.next_id());
        if state.disposed {
            tracing::warn!(%id, "add_layer on a disposed map ignored");
            return id;
        }
        state.layers.insert(id, layer);
        id
    }

    fn remove_layer(&mut self, id: LayerId) -> bool {
        self.state.borrow_mut().layers.remove(&id).is_some()
    }

    fn bind(&mut self, kind: PointerKind, handler: PointerHandler) -> HandlerId {
        let mut state = self.state.borrow_mut();
        let id = HandlerId(state.next_id());
        if state.disposed {
            tracing::warn!(%id, "bind on a disposed map ignored");
            return id;
        }
        state.handlers.push(BoundHandler { id, kind, handler });
        id
    }

    fn unbind(&mut self, id: HandlerId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.handlers.len();
        state.handlers.retain(|bound| bound.id != id);
        state.handlers.len() != before
    }

    fn dispose(&mut self) {
        let mut state = self.state.borrow_mut();
        state.layers.clear();
        state.handlers.clear();
        state.popup = None;
        state.cursor = Cursor::Default;
        state.disposed = true;
    }
}
