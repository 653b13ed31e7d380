//! Spatial index over overlay footprints for click/tap hit testing
//!
//! Uses R-tree (via `rstar`) so activation lookups stay O(log n) when a
//! zoomed-out city view carries a few hundred overlays.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::geo::PixelPoint;
use crate::overlay::{Footprint, OverlayId};

/// Index entry for one placed overlay
#[derive(Debug, Clone)]
pub struct FootprintNode {
    pub id: OverlayId,
    bounds: AABB<[f64; 2]>,
}

impl FootprintNode {
    pub fn new(id: OverlayId, footprint: &Footprint) -> Self {
        Self {
            id,
            bounds: AABB::from_corners(footprint.min(), footprint.max()),
        }
    }
}

impl RTreeObject for FootprintNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

impl PointDistance for FootprintNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        // Zero inside the rectangle, squared distance to the nearest edge outside
        let (lower, upper) = (self.bounds.lower(), self.bounds.upper());
        let dx = (lower[0] - point[0]).max(0.0).max(point[0] - upper[0]);
        let dy = (lower[1] - point[1]).max(0.0).max(point[1] - upper[1]);
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        let (lower, upper) = (self.bounds.lower(), self.bounds.upper());
        (lower[0]..=upper[0]).contains(&point[0]) && (lower[1]..=upper[1]).contains(&point[1])
    }
}

/// Hit-test index, rebuilt after every draw
#[derive(Clone, Default)]
pub struct FootprintIndex {
    tree: RTree<FootprintNode>,
    count: usize,
}

impl std::fmt::Debug for FootprintIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FootprintIndex")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl FootprintIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rebuild(&mut self, nodes: impl Iterator<Item = FootprintNode>) {
        let nodes: Vec<_> = nodes.collect();
        self.count = nodes.len();
        self.tree = RTree::bulk_load(nodes);
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.count = 0;
    }

    /// Overlay under `point`, or within `tolerance` px of it.
    ///
    /// Closest footprint wins; on ties the most recently attached overlay
    /// (painted on top) wins.
    pub fn hit_test(&self, point: PixelPoint, tolerance: f64) -> Option<OverlayId> {
        let search = AABB::from_corners(
            [point.x - tolerance, point.y - tolerance],
            [point.x + tolerance, point.y + tolerance],
        );
        let p = point.to_array();
        self.tree
            .locate_in_envelope_intersecting(&search)
            .map(|node| (node.distance_2(&p), node.id))
            .filter(|(d2, _)| *d2 <= tolerance * tolerance)
            .min_by(|(da, ia), (db, ib)| {
                da.partial_cmp(db)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| ib.cmp(ia))
            })
            .map(|(_, id)| id)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
