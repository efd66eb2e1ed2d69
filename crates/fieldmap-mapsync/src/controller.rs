use fieldmap_core::{AppConfig, Candidate, Coordinate, Environment, FilterCriteria};

use crate::backend::{
    Cursor, HandlerId, LayerId, MapBackend, PointerAction, PointerEvent, PointerKind, Viewport,
};
use crate::error::MapError;
use crate::layer::{Layer, MarkerFeature, RadiusOverlay};
use crate::registry::{MapRegistry, Registration, ViewId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    /// Zoom when the radius is unbounded (country-wide view).
    pub zoom_unbounded: f64,
    /// Zoom when a radius is set.
    pub zoom_bounded: f64,
    /// Points in the geodesic ring of the radius overlay.
    pub ring_segments: usize,
    /// Panic instead of returning an error when a live view is mounted again.
    pub panic_on_conflict: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom_unbounded: 6.0,
            zoom_bounded: 10.0,
            ring_segments: 64,
            panic_on_conflict: false,
        }
    }
}

impl MapConfig {
    /// Zoom levels from the environment. Mount conflicts panic in
    /// development.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            zoom_unbounded: config.map_zoom_unbounded,
            zoom_bounded: config.map_zoom_bounded,
            panic_on_conflict: config.env == Environment::Development,
            ..Self::default()
        }
    }
}

/// Owner of the one map instance of a mounted view.
///
/// Pointer handlers are bound once, at mount. Dropping the controller (or
/// calling [`MapSyncController::close`]) removes the derived layers, unbinds
/// the handlers, disposes the backend and frees the view for a new mount.
pub struct MapSyncController<B: MapBackend> {
    backend: B,
    config: MapConfig,
    overlay: Option<LayerId>,
    markers: Option<LayerId>,
    handlers: Vec<HandlerId>,
    released: bool,
    registration: Registration,
}

impl<B: MapBackend> MapSyncController<B> {
    /// Creates the backend for `view` and wires its pointer handlers.
    ///
    /// `factory` is only invoked once the view has been claimed.
    ///
    /// # Errors
    ///
    /// [`MapError::InstantiationConflict`] if `view` already has a live
    /// controller.
    ///
    /// # Panics
    ///
    /// On that same conflict when [`MapConfig::panic_on_conflict`] is set.
    pub fn mount<F>(
        view: ViewId,
        registry: &MapRegistry,
        config: MapConfig,
        factory: F,
    ) -> Result<Self, MapError>
    where
        F: FnOnce() -> B,
    {
        let Some(registration) = registry.claim(view.clone()) else {
            tracing::error!(%view, "refusing to create a second map instance for a live view");
            assert!(
                !config.panic_on_conflict,
                "map view {view} is already mounted; close it before mounting again"
            );
            return Err(MapError::InstantiationConflict { view });
        };

        let mut backend = factory();
        let click = backend.bind(
            PointerKind::Click,
            Box::new(|event: &PointerEvent| match &event.feature {
                Some(feature) => PointerAction::ShowPopup(feature.into()),
                None => PointerAction::HidePopup,
            }),
        );
        let hover = backend.bind(
            PointerKind::Move,
            Box::new(|event: &PointerEvent| {
                PointerAction::SetCursor(if event.feature.is_some() {
                    Cursor::Pointer
                } else {
                    Cursor::Default
                })
            }),
        );
        tracing::debug!(%view, "map mounted");

        Ok(Self {
            backend,
            config,
            overlay: None,
            markers: None,
            handlers: vec![click, hover],
            released: false,
            registration,
        })
    }

    /// Brings the map in line with `center`, `radius_km` and `candidates`.
    ///
    /// A radius of 0 (or any non-positive value) means unbounded: wide zoom
    /// and no overlay. Both derived layers are discarded and rebuilt.
    pub fn sync(&mut self, center: Coordinate, radius_km: f64, candidates: &[Candidate]) {
        let bounded = radius_km.is_finite() && radius_km > 0.0;
        let zoom = if bounded {
            self.config.zoom_bounded
        } else {
            self.config.zoom_unbounded
        };
        self.backend.set_view(Viewport { center, zoom });

        if let Some(id) = self.overlay.take() {
            self.backend.remove_layer(id);
        }
        if bounded {
            let overlay = RadiusOverlay::new(center, radius_km, self.config.ring_segments);
            self.overlay = Some(self.backend.add_layer(Layer::RadiusOverlay(overlay)));
        }

        if let Some(id) = self.markers.take() {
            self.backend.remove_layer(id);
        }
        let features: Vec<MarkerFeature> = candidates.iter().map(MarkerFeature::from).collect();
        let marker_count = features.len();
        self.markers = Some(self.backend.add_layer(Layer::Markers { features }));

        tracing::debug!(
            view = %self.registration.view(),
            %center,
            radius_km,
            zoom,
            markers = marker_count,
            "map synced"
        );
    }

    /// [`MapSyncController::sync`] driven by a criteria value.
    pub fn sync_criteria(&mut self, criteria: &FilterCriteria, candidates: &[Candidate]) {
        self.sync(criteria.center, criteria.radius_km, candidates);
    }

    #[must_use]
    pub fn view(&self) -> &ViewId {
        self.registration.view()
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Tears the view down now instead of at scope end.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        for id in self.overlay.take().into_iter().chain(self.markers.take()) {
            self.backend.remove_layer(id);
        }
        for id in self.handlers.drain(..) {
            self.backend.unbind(id);
        }
        self.backend.dispose();
        tracing::debug!(view = %self.registration.view(), "map released");
    }
}

impl<B: MapBackend> Drop for MapSyncController<B> {
    fn drop(&mut self) {
        self.release();
    }
}
