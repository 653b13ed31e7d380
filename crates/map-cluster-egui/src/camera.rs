//! MapCamera - slippy-map center/zoom with screen transforms
//!
//! Web Mercator math in `f64`; world pixels at zoom 18+ overflow `f32`
//! precision, so egui's `Pos2` only appears at the paint boundary.
//!
//! # EGUI-RULES Compliance
//! - Camera state is UI-only
//! - No callbacks - `take_changed()` is polled once per frame
//! - Projection is unavailable until the first `set_screen_size`

use map_cluster::projection::{zoom_scale, MAX_MERCATOR_LAT};
use map_cluster::{GeoBounds, LatLng, PixelPoint, Projection, ViewportController, WebMercator};

/// Zoom used when fitting a single point (no extent to fit)
const SINGLE_POINT_ZOOM: f64 = 14.0;

#[derive(Debug, Clone)]
pub struct MapCamera {
    center: LatLng,
    zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    screen_size: Option<[f64; 2]>,
    changed: bool,
}

impl Default for MapCamera {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 2.0)
    }
}

impl MapCamera {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        let mut camera = Self {
            center: LatLng::new(0.0, 0.0),
            zoom: 0.0,
            min_zoom: 1.0,
            max_zoom: 20.0,
            screen_size: None,
            changed: true,
        };
        camera.set_center(center);
        camera.set_zoom(zoom);
        camera
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn screen_size(&self) -> Option<[f64; 2]> {
        self.screen_size
    }

    /// Called every frame with the allocated map rect size
    pub fn set_screen_size(&mut self, width: f64, height: f64) {
        let size = Some([width, height]);
        if self.screen_size != size {
            self.screen_size = size;
            self.changed = true;
        }
    }

    /// True once after any viewport change
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    // =========================================================================
    // COORDINATE TRANSFORMS
    // =========================================================================

    fn world_px(&self, position: LatLng, zoom: f64) -> PixelPoint {
        WebMercator::to_world(position).scaled(zoom_scale(zoom))
    }

    fn half_screen(&self) -> Option<PixelPoint> {
        self.screen_size
            .map(|[w, h]| PixelPoint::new(w / 2.0, h / 2.0))
    }

    /// Geographic position → map-rect-local pixel
    pub fn geo_to_screen(&self, position: LatLng) -> Option<PixelPoint> {
        let half = self.half_screen()?;
        let p = self.world_px(position, self.zoom);
        let c = self.world_px(self.center, self.zoom);
        Some(PixelPoint::new(p.x - c.x + half.x, p.y - c.y + half.y))
    }

    /// Map-rect-local pixel → geographic position
    pub fn screen_to_geo(&self, screen: PixelPoint) -> Option<LatLng> {
        let half = self.half_screen()?;
        let c = self.world_px(self.center, self.zoom);
        let world = PixelPoint::new(screen.x - half.x + c.x, screen.y - half.y + c.y);
        Some(WebMercator::from_world(world.scaled(1.0 / zoom_scale(self.zoom))))
    }

    /// Geographic area currently on screen
    pub fn visible_bounds(&self) -> Option<GeoBounds> {
        let [w, h] = self.screen_size?;
        let top_left = self.screen_to_geo(PixelPoint::new(0.0, 0.0))?;
        let bottom_right = self.screen_to_geo(PixelPoint::new(w, h))?;
        Some(GeoBounds::new(
            LatLng::new(bottom_right.lat, top_left.lng),
            LatLng::new(top_left.lat, bottom_right.lng),
        ))
    }

    // =========================================================================
    // CAMERA CONTROLS
    // =========================================================================

    /// Pan by a screen delta (drag direction)
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        let c = self.world_px(self.center, self.zoom);
        let moved = PixelPoint::new(c.x - dx, c.y - dy);
        self.set_center(WebMercator::from_world(moved.scaled(1.0 / zoom_scale(self.zoom))));
    }

    /// Zoom by `delta` levels keeping the point under `screen_pos` fixed
    pub fn zoom_at(&mut self, delta: f64, screen_pos: PixelPoint) {
        let new_zoom = (self.zoom + delta).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < 1e-9 {
            return;
        }
        let (Some(anchor), Some(half)) = (self.screen_to_geo(screen_pos), self.half_screen()) else {
            self.set_zoom(new_zoom);
            return;
        };

        let anchor_world = self.world_px(anchor, new_zoom);
        let center_world = PixelPoint::new(
            anchor_world.x - (screen_pos.x - half.x),
            anchor_world.y - (screen_pos.y - half.y),
        );
        self.zoom = new_zoom;
        self.set_center(WebMercator::from_world(
            center_world.scaled(1.0 / zoom_scale(new_zoom)),
        ));
        self.changed = true;
    }

    /// Center on `bounds` at the largest zoom that shows all of it.
    /// Returns false until the screen size is known.
    pub fn fit_bounds(&mut self, bounds: GeoBounds, padding: f64) -> bool {
        let Some([w, h]) = self.screen_size else {
            return false;
        };
        let sw = WebMercator::to_world(bounds.south_west);
        let ne = WebMercator::to_world(bounds.north_east);
        let extent_x = (ne.x - sw.x).abs();
        let extent_y = (sw.y - ne.y).abs();
        let avail_x = (w - 2.0 * padding).max(1.0);
        let avail_y = (h - 2.0 * padding).max(1.0);

        let zoom = if extent_x <= f64::EPSILON && extent_y <= f64::EPSILON {
            SINGLE_POINT_ZOOM
        } else {
            let ratio_x = if extent_x > f64::EPSILON { avail_x / extent_x } else { f64::INFINITY };
            let ratio_y = if extent_y > f64::EPSILON { avail_y / extent_y } else { f64::INFINITY };
            ratio_x.min(ratio_y).log2()
        };

        let mid = PixelPoint::new((sw.x + ne.x) / 2.0, (sw.y + ne.y) / 2.0);
        self.set_center(WebMercator::from_world(mid));
        self.set_zoom(zoom);
        true
    }
}

impl Projection for MapCamera {
    fn world_point(&self, position: LatLng) -> Option<PixelPoint> {
        self.screen_size.map(|_| WebMercator::to_world(position))
    }

    fn current_zoom(&self) -> Option<f64> {
        self.screen_size.map(|_| self.zoom)
    }
}

impl ViewportController for MapCamera {
    fn set_zoom(&mut self, zoom: f64) {
        let zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if zoom != self.zoom {
            self.zoom = zoom;
            self.changed = true;
        }
    }

    fn set_center(&mut self, center: LatLng) {
        let mut lng = center.lng;
        while lng > 180.0 {
            lng -= 360.0;
        }
        while lng < -180.0 {
            lng += 360.0;
        }
        let center = LatLng::new(center.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT), lng);
        if center != self.center {
            self.center = center;
            self.changed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn ready_camera() -> MapCamera {
        let mut camera = MapCamera::new(LatLng::new(48.85, 2.35), 12.0);
        camera.set_screen_size(800.0, 600.0);
        camera.take_changed();
        camera
    }

    #[test]
    fn test_not_ready_without_screen_size() {
        let camera = MapCamera::default();
        assert!(camera.current_zoom().is_none());
        assert!(camera.geo_to_screen(LatLng::new(0.0, 0.0)).is_none());
        assert!(camera.visible_bounds().is_none());
    }

    #[test]
    fn test_center_maps_to_screen_center() {
        let camera = ready_camera();
        let p = camera.geo_to_screen(camera.center()).unwrap();
        assert!(approx(p.x, 400.0, 1e-6));
        assert!(approx(p.y, 300.0, 1e-6));
    }

    #[test]
    fn test_screen_round_trip() {
        let camera = ready_camera();
        let geo = camera.screen_to_geo(PixelPoint::new(120.0, 450.0)).unwrap();
        let back = camera.geo_to_screen(geo).unwrap();
        assert!(approx(back.x, 120.0, 1e-6));
        assert!(approx(back.y, 450.0, 1e-6));
    }

    #[test]
    fn test_pan_moves_content_with_drag() {
        let mut camera = ready_camera();
        let landmark = camera.center();
        camera.pan(50.0, -20.0);
        assert!(camera.take_changed());
        let p = camera.geo_to_screen(landmark).unwrap();
        assert!(approx(p.x, 450.0, 1e-6));
        assert!(approx(p.y, 280.0, 1e-6));
    }

    #[test]
    fn test_zoom_at_keeps_cursor_anchor() {
        let mut camera = ready_camera();
        let cursor = PixelPoint::new(600.0, 100.0);
        let under = camera.screen_to_geo(cursor).unwrap();
        camera.zoom_at(1.5, cursor);
        assert!(approx(camera.zoom(), 13.5, 1e-9));
        let p = camera.geo_to_screen(under).unwrap();
        assert!(approx(p.x, 600.0, 1e-6));
        assert!(approx(p.y, 100.0, 1e-6));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = ready_camera();
        camera.set_zoom(99.0);
        assert_eq!(camera.zoom(), camera.max_zoom);
        camera.zoom_at(-50.0, PixelPoint::new(0.0, 0.0));
        assert_eq!(camera.zoom(), camera.min_zoom);
    }

    #[test]
    fn test_fit_bounds_shows_everything() {
        let mut camera = ready_camera();
        let bounds = GeoBounds::new(LatLng::new(48.80, 2.25), LatLng::new(48.90, 2.45));
        assert!(camera.fit_bounds(bounds, 40.0));
        for corner in [bounds.south_west, bounds.north_east] {
            let p = camera.geo_to_screen(corner).unwrap();
            assert!(p.x >= 39.0 && p.x <= 761.0, "x out of view: {}", p.x);
            assert!(p.y >= 39.0 && p.y <= 561.0, "y out of view: {}", p.y);
        }
    }

    #[test]
    fn test_fit_single_point() {
        let mut camera = ready_camera();
        let p = LatLng::new(10.0, 10.0);
        assert!(camera.fit_bounds(GeoBounds::new(p, p), 40.0));
        assert_eq!(camera.zoom(), SINGLE_POINT_ZOOM);
        assert!(approx(camera.center().lat, 10.0, 1e-9));
    }

    #[test]
    fn test_longitude_wraps() {
        let mut camera = ready_camera();
        camera.set_center(LatLng::new(0.0, 190.0));
        assert!(approx(camera.center().lng, -170.0, 1e-9));
    }
}
