//! Interaction dispatch for activated overlays
//!
//! A single-member cluster runs its marker's callback. Anything larger
//! drills in: recenter on the cluster and zoom in by a fixed increment. The
//! cluster itself is not expanded here; the viewport change that follows
//! triggers a fresh pass, and the higher zoom splits it up. Resolution is
//! therefore two-step and eventual.

use serde::Serialize;
use tracing::debug;

use crate::cluster::Cluster;
use crate::geo::LatLng;
use crate::marker::MarkerId;
use crate::projection::ViewportController;

/// What an activation did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Activation {
    /// The single member's callback ran
    Marker { id: MarkerId },
    /// A drill-in viewport command was issued
    DrillIn { center: LatLng, zoom: f64 },
}

#[derive(Debug, Clone, Copy)]
pub struct InteractionDispatcher {
    zoom_increment: f64,
}

impl InteractionDispatcher {
    pub fn new(zoom_increment: f64) -> Self {
        Self { zoom_increment }
    }

    /// Route an activation. `current_zoom` is the zoom drill-in builds on.
    ///
    /// Returns None for an empty cluster, which a pass never produces.
    pub fn activate<V: ViewportController + ?Sized>(
        &self,
        cluster: &Cluster,
        current_zoom: f64,
        viewport: &mut V,
    ) -> Option<Activation> {
        match cluster.members.as_slice() {
            [] => None,
            [only] => {
                debug!(marker = %only.id, "activating marker");
                only.activate();
                Some(Activation::Marker {
                    id: only.id.clone(),
                })
            }
            members => {
                let zoom = current_zoom + self.zoom_increment;
                debug!(
                    members = members.len(),
                    lat = cluster.center.lat,
                    lng = cluster.center.lng,
                    zoom,
                    "drilling into cluster"
                );
                viewport.set_center(cluster.center);
                viewport.set_zoom(zoom);
                Some(Activation::DrillIn {
                    center: cluster.center,
                    zoom,
                })
            }
        }
    }
}

impl Default for InteractionDispatcher {
    fn default() -> Self {
        Self::new(2.0)
    }
}
