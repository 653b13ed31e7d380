//! Clustering engine facade
//!
//! ```text
//! set_markers / on_viewport_changed
//!        │
//!        ▼
//! MarkerRegistry ──► cluster() ──► OverlayManager::rebuild ──► host layer
//!                                        │
//!                 draw (every paint) ◄───┘
//!                        │
//!                        ▼
//!                 overlay_at ──► activate ──► InteractionDispatcher
//! ```
//!
//! Every host-notified viewport change reclusters, pans included. Each pass
//! clears the attached overlay set first; a pass that cannot project then
//! stops with nothing attached and is retried on the next notification.

use serde::Serialize;
use tracing::debug;

use crate::cluster::{cluster, Cluster};
use crate::config::ClusterConfig;
use crate::dispatch::{Activation, InteractionDispatcher};
use crate::error::{ClusterError, ConfigError, EngineError};
use crate::geo::PixelPoint;
use crate::marker::MarkerSpec;
use crate::overlay::{Overlay, OverlayId, OverlayManager};
use crate::projection::MapHost;
use crate::registry::MarkerRegistry;

/// Result of one recompute pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PassOutcome {
    Rebuilt {
        zoom: f64,
        clusters: usize,
        overlays: usize,
        /// Markers rejected by the last registry update
        skipped: usize,
    },
    /// Projection not ready; the overlay set was cleared and nothing is
    /// attached until a later pass succeeds
    Deferred,
}

pub struct ClusterEngine {
    config: ClusterConfig,
    registry: MarkerRegistry,
    overlays: OverlayManager,
    dispatcher: InteractionDispatcher,
    last_zoom: Option<f64>,
    pending: bool,
}

impl std::fmt::Debug for ClusterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterEngine")
            .field("markers", &self.registry.len())
            .field("overlays", &self.overlays.len())
            .field("last_zoom", &self.last_zoom)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl Default for ClusterEngine {
    fn default() -> Self {
        Self::with_valid_config(ClusterConfig::default())
    }
}

impl ClusterEngine {
    /// Engine for `config`, rejecting values that would disable grouping
    /// or drill-in (NaN grid size, non-positive footprint, ...)
    pub fn new(config: ClusterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: ClusterConfig) -> Self {
        Self {
            overlays: OverlayManager::new(config.footprint_px),
            dispatcher: InteractionDispatcher::new(config.drill_zoom_increment),
            registry: MarkerRegistry::new(),
            config,
            last_zoom: None,
            pending: false,
        }
    }

    /// Replace the full marker set and recompute
    pub fn set_markers<H: MapHost + ?Sized>(
        &mut self,
        markers: Vec<MarkerSpec>,
        host: &mut H,
    ) -> PassOutcome {
        self.registry.replace(markers);
        self.recompute(host)
    }

    /// Host notification for any zoom or pan
    pub fn on_viewport_changed<H: MapHost + ?Sized>(&mut self, host: &mut H) -> PassOutcome {
        self.recompute(host)
    }

    fn recompute<H: MapHost + ?Sized>(&mut self, host: &mut H) -> PassOutcome {
        self.overlays.clear(host);

        let Some(zoom) = host.current_zoom() else {
            debug!("projection not ready, deferring pass");
            self.pending = true;
            return PassOutcome::Deferred;
        };

        let clusters = match cluster(self.registry.markers(), zoom, self.config.params(), &*host) {
            Ok(clusters) => clusters,
            Err(ClusterError::ProjectionUnavailable) => {
                debug!(zoom, "projection unavailable mid-pass, deferring");
                self.pending = true;
                return PassOutcome::Deferred;
            }
        };

        let cluster_count = clusters.len();
        self.overlays.rebuild(clusters, host);
        self.last_zoom = Some(zoom);
        self.pending = false;

        debug!(
            zoom,
            markers = self.registry.len(),
            clusters = cluster_count,
            "recompute pass complete"
        );

        PassOutcome::Rebuilt {
            zoom,
            clusters: cluster_count,
            overlays: self.overlays.len(),
            skipped: self.registry.rejected().len(),
        }
    }

    /// Per-paint draw hook for every overlay
    pub fn draw<H: MapHost + ?Sized>(&mut self, host: &mut H) {
        self.overlays.draw(host);
    }

    /// Topmost overlay at a layer pixel
    pub fn overlay_at(&self, point: PixelPoint) -> Option<OverlayId> {
        self.overlays.overlay_at(point, 0.0)
    }

    /// Topmost overlay within `tolerance` px of a layer pixel (touch input)
    pub fn overlay_near(&self, point: PixelPoint, tolerance: f64) -> Option<OverlayId> {
        self.overlays.overlay_at(point, tolerance)
    }

    /// Route an overlay activation
    pub fn activate<H: MapHost + ?Sized>(
        &mut self,
        id: OverlayId,
        host: &mut H,
    ) -> Result<Activation, EngineError> {
        let overlay = self.overlays.get(id).ok_or(EngineError::UnknownOverlay(id))?;
        let zoom = host
            .current_zoom()
            .or(self.last_zoom)
            .unwrap_or(self.config.max_zoom);
        self.dispatcher
            .activate(overlay.cluster(), zoom, host)
            .ok_or(EngineError::EmptyCluster(id))
    }

    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.overlays.overlays().iter().map(Overlay::cluster)
    }

    pub fn overlays(&self) -> &[Overlay] {
        self.overlays.overlays()
    }

    pub fn markers(&self) -> &[MarkerSpec] {
        self.registry.markers()
    }

    pub fn registry(&self) -> &MarkerRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Zoom of the last completed pass
    pub fn last_zoom(&self) -> Option<f64> {
        self.last_zoom
    }

    /// A pass was deferred and has not yet run
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
