//! Overlay lifecycle
//!
//! One overlay per cluster, attached to the host layer. Every pass tears the
//! whole set down and rebuilds it; overlays are never mutated in place apart
//! from their screen footprint, which the draw hook refreshes on each paint.
//!
//! # Render modes
//! - `Single`: one member, its category icon
//! - `DuplicateIcons`: every member shares a category, 2-4 copies of the icon
//! - `DominantIcon`: mixed categories, first member's icon plus a count badge

use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use crate::cluster::Cluster;
use crate::geo::{LatLng, PixelPoint};
use crate::marker::Category;
use crate::projection::OverlayLayer;
use crate::spatial::{FootprintIndex, FootprintNode};

/// Identity of one attached overlay. Fresh ids every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OverlayId(u64);

impl OverlayId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    Single,
    DuplicateIcons,
    DominantIcon,
}

impl RenderMode {
    pub fn for_cluster(cluster: &Cluster) -> Self {
        if cluster.members.len() <= 1 {
            RenderMode::Single
        } else if cluster.is_homogeneous() {
            RenderMode::DuplicateIcons
        } else {
            RenderMode::DominantIcon
        }
    }
}

/// One icon inside an overlay footprint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Glyph {
    pub category: Category,
    /// Offset from the footprint center, in px
    pub offset: [f64; 2],
}

/// What an overlay looks like, independent of where it sits
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayVisual {
    pub mode: RenderMode,
    pub glyphs: Vec<Glyph>,
    /// Member count shown on dominant-icon overlays
    pub badge: Option<usize>,
}

impl OverlayVisual {
    pub fn for_cluster(cluster: &Cluster, footprint_px: f64) -> Self {
        let mode = RenderMode::for_cluster(cluster);
        let lead = cluster
            .lead_category()
            .cloned()
            .unwrap_or_else(|| Category::new(""));

        match mode {
            RenderMode::Single => Self {
                mode,
                glyphs: vec![Glyph {
                    category: lead,
                    offset: [0.0, 0.0],
                }],
                badge: None,
            },
            RenderMode::DuplicateIcons => Self {
                mode,
                glyphs: duplicate_offsets(duplicate_glyph_count(cluster.len()), footprint_px)
                    .into_iter()
                    .map(|offset| Glyph {
                        category: lead.clone(),
                        offset,
                    })
                    .collect(),
                badge: None,
            },
            RenderMode::DominantIcon => Self {
                mode,
                glyphs: vec![Glyph {
                    category: lead,
                    offset: [0.0, 0.0],
                }],
                badge: Some(cluster.len()),
            },
        }
    }
}

/// One glyph per member, never fewer than two or more than four
pub fn duplicate_glyph_count(members: usize) -> usize {
    members.clamp(2, 4)
}

/// Fixed glyph layouts: 2 diagonal corners, 3 triangle, 4 quadrants
fn duplicate_offsets(count: usize, footprint_px: f64) -> Vec<[f64; 2]> {
    let q = footprint_px / 4.0;
    match count {
        2 => vec![[-q, -q], [q, q]],
        3 => vec![[0.0, -q], [-q, q], [q, q]],
        _ => vec![[-q, -q], [q, -q], [-q, q], [q, q]],
    }
}

/// Square screen area an overlay occupies, in layer pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Footprint {
    pub left: f64,
    pub top: f64,
    pub size: f64,
}

impl Footprint {
    /// Footprint of `size` centered on `center`
    pub fn centered_on(center: PixelPoint, size: f64) -> Self {
        let half = size / 2.0;
        Self {
            left: center.x - half,
            top: center.y - half,
            size,
        }
    }

    pub fn center(&self) -> PixelPoint {
        PixelPoint::new(self.left + self.size / 2.0, self.top + self.size / 2.0)
    }

    pub fn min(&self) -> [f64; 2] {
        [self.left, self.top]
    }

    pub fn max(&self) -> [f64; 2] {
        [self.left + self.size, self.top + self.size]
    }

    pub fn contains(&self, p: PixelPoint) -> bool {
        p.x >= self.left && p.x <= self.left + self.size && p.y >= self.top && p.y <= self.top + self.size
    }
}

/// A visual element bound to exactly one cluster
#[derive(Debug, Clone)]
pub struct Overlay {
    id: OverlayId,
    cluster: Cluster,
    visual: OverlayVisual,
    footprint_px: f64,
    footprint: Option<Footprint>,
}

impl Overlay {
    fn new(id: OverlayId, cluster: Cluster, footprint_px: f64) -> Self {
        let visual = OverlayVisual::for_cluster(&cluster, footprint_px);
        Self {
            id,
            cluster,
            visual,
            footprint_px,
            footprint: None,
        }
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    /// Geographic anchor (the cluster center)
    pub fn anchor(&self) -> LatLng {
        self.cluster.center
    }

    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    pub fn visual(&self) -> &OverlayVisual {
        &self.visual
    }

    pub fn mode(&self) -> RenderMode {
        self.visual.mode
    }

    pub fn footprint_px(&self) -> f64 {
        self.footprint_px
    }

    /// Footprint from the last successful draw
    pub fn footprint(&self) -> Option<Footprint> {
        self.footprint
    }

    /// Draw hook: re-project the anchor and center the footprint on it.
    /// While the layer cannot project nothing is placed and the previous
    /// footprint is dropped, so hit testing waits for the next placement.
    pub fn draw<L: OverlayLayer + ?Sized>(&mut self, layer: &mut L) -> Option<Footprint> {
        let Some(pixel) = layer.layer_pixel(self.anchor()) else {
            trace!(overlay = %self.id, "layer projection unavailable, skipping draw");
            self.footprint = None;
            return None;
        };
        let footprint = Footprint::centered_on(pixel, self.footprint_px);
        self.footprint = Some(footprint);
        layer.place(self.id, footprint);
        Some(footprint)
    }
}

/// Owns the attached overlay set and keeps the host layer in sync with it
#[derive(Debug)]
pub struct OverlayManager {
    overlays: Vec<Overlay>,
    next_id: u64,
    footprint_px: f64,
    hit_index: FootprintIndex,
}

impl OverlayManager {
    pub fn new(footprint_px: f64) -> Self {
        Self {
            overlays: Vec::new(),
            next_id: 1,
            footprint_px,
            hit_index: FootprintIndex::new(),
        }
    }

    /// Detach and release every overlay
    pub fn clear<L: OverlayLayer + ?Sized>(&mut self, layer: &mut L) {
        for overlay in self.overlays.drain(..) {
            layer.detach(overlay.id);
        }
        self.hit_index.clear();
    }

    /// Full teardown then one fresh overlay per cluster.
    /// `clear` always completes before the first attach.
    pub fn rebuild<L: OverlayLayer + ?Sized>(&mut self, clusters: Vec<Cluster>, layer: &mut L) {
        let removed = self.overlays.len();
        self.clear(layer);

        self.overlays.reserve(clusters.len());
        for cluster in clusters {
            let id = OverlayId(self.next_id);
            self.next_id += 1;
            let overlay = Overlay::new(id, cluster, self.footprint_px);
            layer.attach(&overlay);
            self.overlays.push(overlay);
        }

        debug!(removed, attached = self.overlays.len(), "overlay set rebuilt");
    }

    /// Run every overlay's draw hook and refresh the hit-test index
    pub fn draw<L: OverlayLayer + ?Sized>(&mut self, layer: &mut L) {
        for overlay in &mut self.overlays {
            overlay.draw(layer);
        }
        self.hit_index.rebuild(
            self.overlays
                .iter()
                .filter_map(|o| o.footprint.map(|fp| FootprintNode::new(o.id, &fp))),
        );
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn get(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.id == id)
    }

    /// Topmost overlay whose footprint is within `tolerance` px of `point`
    pub fn overlay_at(&self, point: PixelPoint, tolerance: f64) -> Option<OverlayId> {
        self.hit_index.hit_test(point, tolerance)
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }
}
