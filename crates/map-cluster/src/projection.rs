//! Projection adapter and host-facing traits
//!
//! The engine never touches a map SDK directly. Hosts implement these traits
//! and pass themselves into the engine on every call.
//!
//! # Pixel convention
//! `world_point` returns zoom-0 world pixels (a 256px square world, Web
//! Mercator style). Pixel distance at zoom `z` is the world-pixel distance
//! scaled by `2^z`.

use crate::geo::{LatLng, PixelPoint};
use crate::overlay::{Footprint, Overlay, OverlayId};

/// Width of the zoom-0 world in pixels
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the Web Mercator projection
pub const MAX_MERCATOR_LAT: f64 = 85.05112878;

/// Geographic → pixel projection supplied by the host
pub trait Projection {
    /// Zoom-0 world pixel for a position. None while the host is not ready.
    fn world_point(&self, position: LatLng) -> Option<PixelPoint>;

    /// Current zoom level. None while the host is not ready.
    fn current_zoom(&self) -> Option<f64>;

    /// Pixel position at `zoom`
    fn project(&self, position: LatLng, zoom: f64) -> Option<PixelPoint> {
        self.world_point(position)
            .map(|p| p.scaled(zoom_scale(zoom)))
    }
}

/// Viewport commands used by drill-in
pub trait ViewportController {
    fn set_zoom(&mut self, zoom: f64);
    fn set_center(&mut self, center: LatLng);
}

/// The host rendering layer overlays are attached to
pub trait OverlayLayer {
    /// Layer-relative pixel for a position, used by overlay draw hooks.
    /// None while the layer has no projection yet.
    fn layer_pixel(&self, position: LatLng) -> Option<PixelPoint>;

    fn attach(&mut self, overlay: &Overlay);

    fn detach(&mut self, id: OverlayId);

    /// Position an attached overlay's visual footprint
    fn place(&mut self, id: OverlayId, footprint: Footprint);
}

/// Everything the engine needs from a host surface
pub trait MapHost: Projection + ViewportController + OverlayLayer {}

impl<T: Projection + ViewportController + OverlayLayer> MapHost for T {}

/// `2^zoom`
pub fn zoom_scale(zoom: f64) -> f64 {
    2f64.powf(zoom)
}

/// Spherical Web Mercator projection, always available
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl WebMercator {
    pub fn world_x(lng: f64) -> f64 {
        (lng + 180.0) / 360.0 * TILE_SIZE
    }

    pub fn world_y(lat: f64) -> f64 {
        let lat_rad = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
        (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0 * TILE_SIZE
    }

    pub fn to_world(position: LatLng) -> PixelPoint {
        PixelPoint::new(Self::world_x(position.lng), Self::world_y(position.lat))
    }

    /// Inverse of `to_world`
    pub fn from_world(point: PixelPoint) -> LatLng {
        let lng = point.x / TILE_SIZE * 360.0 - 180.0;
        let n = std::f64::consts::PI - 2.0 * std::f64::consts::PI * point.y / TILE_SIZE;
        let lat = n.sinh().atan().to_degrees();
        LatLng::new(lat, lng)
    }
}

/// A fixed-zoom Web Mercator projection, handy for offline clustering
#[derive(Debug, Clone, Copy)]
pub struct FixedZoom(pub f64);

impl Projection for FixedZoom {
    fn world_point(&self, position: LatLng) -> Option<PixelPoint> {
        Some(WebMercator::to_world(position))
    }

    fn current_zoom(&self) -> Option<f64> {
        Some(self.0)
    }
}
