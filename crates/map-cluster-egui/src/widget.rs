//! ClusterMapWidget - interactive clustered marker map
//!
//! # EGUI-RULES Compliance
//! - Engine and camera are owned here; the app only passes markers in
//! - Returns `Option<Activation>` instead of invoking app callbacks
//! - Reclustering is driven by polling `MapCamera::take_changed()`

use egui::{Sense, Ui};
use map_cluster::{
    Activation, ClusterConfig, ClusterEngine, ConfigError, GeoBounds, LatLng, MarkerSpec,
    OverlayId, PassOutcome, PixelPoint,
};
use tracing::{debug, warn};

use crate::camera::MapCamera;
use crate::render;
use crate::surface::MapSurface;

/// Zoom levels per scrolled point
const ZOOM_PER_SCROLL: f64 = 1.0 / 120.0;
/// Extra hit slop around overlay footprints
const HIT_TOLERANCE_PX: f64 = 4.0;
/// Padding kept around markers when fitting the view
const FIT_PADDING_PX: f64 = 48.0;

pub struct ClusterMapWidget {
    engine: ClusterEngine,
    surface: MapSurface,
    hovered: Option<OverlayId>,
    needs_fit: bool,
}

impl ClusterMapWidget {
    pub fn new(config: ClusterConfig, center: LatLng, zoom: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: ClusterEngine::new(config)?,
            surface: MapSurface::new(MapCamera::new(center, zoom)),
            hovered: None,
            needs_fit: false,
        })
    }

    /// Replace the marker set; the view is fitted to it on the next frame
    pub fn set_markers(&mut self, markers: Vec<MarkerSpec>) -> PassOutcome {
        self.needs_fit = !markers.is_empty();
        self.engine.set_markers(markers, &mut self.surface)
    }

    pub fn engine(&self) -> &ClusterEngine {
        &self.engine
    }

    pub fn camera(&self) -> &MapCamera {
        &self.surface.camera
    }

    pub fn surface(&self) -> &MapSurface {
        &self.surface
    }

    pub fn hovered(&self) -> Option<OverlayId> {
        self.hovered
    }

    fn fit_to_markers(&mut self) {
        let Some(bounds) = GeoBounds::from_positions(self.engine.markers().iter().map(|m| &m.position))
        else {
            self.needs_fit = false;
            return;
        };
        if self.surface.camera.fit_bounds(bounds, FIT_PADDING_PX) {
            debug!(?bounds, zoom = self.surface.camera.zoom(), "fitted view to markers");
            self.needs_fit = false;
        }
    }

    /// Render the map into all available space
    pub fn ui(&mut self, ui: &mut Ui) -> Option<Activation> {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let local = |pos: egui::Pos2| {
            let d = pos - rect.min;
            PixelPoint::new(d.x as f64, d.y as f64)
        };

        // 1. Input → camera
        self.surface
            .camera
            .set_screen_size(rect.width() as f64, rect.height() as f64);
        if self.needs_fit {
            self.fit_to_markers();
        }
        if response.dragged() {
            let delta = response.drag_delta();
            self.surface.camera.pan(delta.x as f64, delta.y as f64);
        }
        if let Some(pos) = response.hover_pos() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                self.surface
                    .camera
                    .zoom_at(scroll as f64 * ZOOM_PER_SCROLL, local(pos));
            }
        }

        // 2. Camera change → recluster
        if self.surface.camera.take_changed() || self.engine.is_pending() {
            self.engine.on_viewport_changed(&mut self.surface);
        }

        // 3. Place overlays for this paint
        self.engine.draw(&mut self.surface);
        self.hovered = response
            .hover_pos()
            .and_then(|pos| self.engine.overlay_near(local(pos), HIT_TOLERANCE_PX));

        render::paint_map(&ui.painter_at(rect), rect, &self.surface, self.hovered);

        // 4. Click → activation
        let clicked = response.clicked().then_some(self.hovered).flatten()?;
        match self.engine.activate(clicked, &mut self.surface) {
            Ok(activation) => {
                if matches!(activation, Activation::DrillIn { .. }) {
                    ui.ctx().request_repaint();
                }
                Some(activation)
            }
            Err(err) => {
                warn!(%err, "overlay activation failed");
                None
            }
        }
    }
}
