//! MapSurface - the host side of the overlay contract
//!
//! Owns the camera and the set of attached overlay elements. The engine
//! attaches, places and detaches through [`OverlayLayer`]; the painter
//! only ever reads `elements()`.

use std::collections::BTreeMap;

use map_cluster::{
    Footprint, LatLng, Overlay, OverlayId, OverlayLayer, OverlayVisual, PixelPoint, Projection,
    ViewportController,
};
use tracing::{trace, warn};

use crate::camera::MapCamera;

/// One attached overlay as the painter sees it
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayElement {
    pub visual: OverlayVisual,
    /// None until the first placement
    pub footprint: Option<Footprint>,
}

#[derive(Debug, Default)]
pub struct MapSurface {
    pub camera: MapCamera,
    elements: BTreeMap<OverlayId, OverlayElement>,
}

impl MapSurface {
    pub fn new(camera: MapCamera) -> Self {
        Self {
            camera,
            elements: BTreeMap::new(),
        }
    }

    /// Attached elements in attach order
    pub fn elements(&self) -> impl Iterator<Item = (OverlayId, &OverlayElement)> {
        self.elements.iter().map(|(id, el)| (*id, el))
    }

    pub fn element(&self, id: OverlayId) -> Option<&OverlayElement> {
        self.elements.get(&id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Projection for MapSurface {
    fn world_point(&self, position: LatLng) -> Option<PixelPoint> {
        self.camera.world_point(position)
    }

    fn current_zoom(&self) -> Option<f64> {
        self.camera.current_zoom()
    }
}

impl ViewportController for MapSurface {
    fn set_zoom(&mut self, zoom: f64) {
        self.camera.set_zoom(zoom);
    }

    fn set_center(&mut self, center: LatLng) {
        self.camera.set_center(center);
    }
}

impl OverlayLayer for MapSurface {
    fn layer_pixel(&self, position: LatLng) -> Option<PixelPoint> {
        self.camera.geo_to_screen(position)
    }

    fn attach(&mut self, overlay: &Overlay) {
        let element = OverlayElement {
            visual: overlay.visual().clone(),
            footprint: overlay.footprint(),
        };
        if self.elements.insert(overlay.id(), element).is_some() {
            warn!(overlay = %overlay.id(), "overlay attached twice");
        }
    }

    fn detach(&mut self, id: OverlayId) {
        if self.elements.remove(&id).is_none() {
            warn!(overlay = %id, "detach of unknown overlay");
        }
    }

    fn place(&mut self, id: OverlayId, footprint: Footprint) {
        match self.elements.get_mut(&id) {
            Some(element) => element.footprint = Some(footprint),
            None => trace!(overlay = %id, "place ignored, overlay not attached"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use map_cluster::{ClusterEngine, MarkerSpec, PassOutcome, RenderMode};
    use pretty_assertions::assert_eq;

    fn markers() -> Vec<MarkerSpec> {
        vec![
            MarkerSpec::inert("a", LatLng::new(48.8566, 2.3522), "music"),
            MarkerSpec::inert("b", LatLng::new(48.8567, 2.3523), "music"),
            MarkerSpec::inert("c", LatLng::new(45.7640, 4.8357), "food"),
        ]
    }

    #[test]
    fn test_engine_defers_until_surface_has_size() {
        let mut surface = MapSurface::new(MapCamera::new(LatLng::new(48.0, 3.0), 10.0));
        let mut engine = ClusterEngine::default();

        assert_eq!(engine.set_markers(markers(), &mut surface), PassOutcome::Deferred);
        assert!(surface.is_empty());

        surface.camera.set_screen_size(1024.0, 768.0);
        let outcome = engine.on_viewport_changed(&mut surface);
        assert!(matches!(outcome, PassOutcome::Rebuilt { overlays: 2, .. }));
        assert_eq!(surface.len(), 2);
    }

    #[test]
    fn test_elements_mirror_engine_overlays() {
        let mut surface = MapSurface::new(MapCamera::new(LatLng::new(48.0, 3.0), 10.0));
        surface.camera.set_screen_size(1024.0, 768.0);
        let mut engine = ClusterEngine::default();
        engine.set_markers(markers(), &mut surface);
        engine.draw(&mut surface);

        let modes: Vec<_> = surface.elements().map(|(_, el)| el.visual.mode).collect();
        assert_eq!(modes, vec![RenderMode::DuplicateIcons, RenderMode::Single]);
        for overlay in engine.overlays() {
            let element = surface.element(overlay.id()).unwrap();
            assert_eq!(element.footprint, overlay.footprint());
        }

        // Recompute swaps the whole element set
        let before: Vec<_> = surface.elements().map(|(id, _)| id).collect();
        engine.on_viewport_changed(&mut surface);
        let after: Vec<_> = surface.elements().map(|(id, _)| id).collect();
        assert_eq!(after.len(), 2);
        assert!(before.iter().all(|id| !after.contains(id)));
    }

    #[test]
    fn test_drill_in_moves_camera() {
        let mut surface = MapSurface::new(MapCamera::new(LatLng::new(48.0, 3.0), 10.0));
        surface.camera.set_screen_size(1024.0, 768.0);
        let mut engine = ClusterEngine::default();
        engine.set_markers(markers(), &mut surface);
        surface.camera.take_changed();

        let pair = engine.overlays()[0].id();
        engine.activate(pair, &mut surface).unwrap();

        assert!(surface.camera.take_changed());
        assert_eq!(surface.camera.zoom(), 12.0);
        assert!((surface.camera.center().lat - 48.85665).abs() < 1e-9);
    }
}
