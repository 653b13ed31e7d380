//! Proximity clustering in projected pixel space
//!
//! Greedy single pass, first seed wins:
//! 1. Project every marker to pixel space at the current zoom
//! 2. Walk markers in registry order, skipping ones already assigned
//! 3. Each unassigned marker seeds a cluster and absorbs every other
//!    unassigned marker strictly closer than `grid_size_px` to the seed
//! 4. Close the cluster and compute its centroid (mean lat/lng)
//!
//! An R-tree prunes the candidate set for step 3. Membership is identical to
//! the pairwise scan; only the candidate lookup changes.
//!
//! Above `max_zoom` every marker becomes its own cluster.

use rstar::primitives::GeomWithData;
use rstar::RTree;

use crate::error::ClusterError;
use crate::geo::{LatLng, PixelPoint};
use crate::marker::{Category, MarkerSpec};
use crate::projection::Projection;

type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// Clustering thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterParams {
    /// Absorb markers strictly closer than this to the seed
    pub grid_size_px: f64,
    /// Above this zoom nothing is grouped
    pub max_zoom: f64,
}

/// A transient group of markers, recomputed every pass
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Arithmetic mean of member positions
    pub center: LatLng,
    /// Members in registry order
    pub members: Vec<MarkerSpec>,
}

impl Cluster {
    fn from_members(members: Vec<MarkerSpec>) -> Self {
        let center = LatLng::mean(members.iter().map(|m| &m.position))
            .unwrap_or(LatLng::new(0.0, 0.0));
        Self { center, members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }

    /// Every member shares one category
    pub fn is_homogeneous(&self) -> bool {
        match self.members.split_first() {
            Some((first, rest)) => rest.iter().all(|m| m.category == first.category),
            None => true,
        }
    }

    /// Category of the first member, used as the dominant icon
    pub fn lead_category(&self) -> Option<&Category> {
        self.members.first().map(|m| &m.category)
    }
}

/// Partition `markers` into disjoint clusters at `zoom`
pub fn cluster<P: Projection + ?Sized>(
    markers: &[MarkerSpec],
    zoom: f64,
    params: ClusterParams,
    projection: &P,
) -> Result<Vec<Cluster>, ClusterError> {
    if zoom > params.max_zoom {
        return Ok(markers
            .iter()
            .map(|m| Cluster::from_members(vec![m.clone()]))
            .collect());
    }

    let points = project_all(markers, zoom, projection)?;
    let groups = group_indices(&points, params.grid_size_px);

    Ok(groups
        .into_iter()
        .map(|group| Cluster::from_members(group.into_iter().map(|i| markers[i].clone()).collect()))
        .collect())
}

fn project_all<P: Projection + ?Sized>(
    markers: &[MarkerSpec],
    zoom: f64,
    projection: &P,
) -> Result<Vec<PixelPoint>, ClusterError> {
    markers
        .iter()
        .map(|m| {
            projection
                .project(m.position, zoom)
                .ok_or(ClusterError::ProjectionUnavailable)
        })
        .collect()
}

/// Greedy grouping over projected points; returns member indices per cluster
fn group_indices(points: &[PixelPoint], grid_size_px: f64) -> Vec<Vec<usize>> {
    let tree = RTree::bulk_load(
        points
            .iter()
            .enumerate()
            .map(|(i, p)| IndexedPoint::new(p.to_array(), i))
            .collect(),
    );

    // Slightly widened so squared-distance rounding never drops a candidate;
    // the exact `<` check below decides membership.
    let search_radius = grid_size_px * (1.0 + 1e-9);
    let radius_sq = search_radius * search_radius;
    let mut assigned = vec![false; points.len()];
    let mut groups = Vec::new();

    for seed in 0..points.len() {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;

        let seed_point = points[seed];
        let mut absorbed: Vec<usize> = tree
            .locate_within_distance(seed_point.to_array(), radius_sq)
            .map(|entry| entry.data)
            .filter(|&j| !assigned[j] && points[j].distance_to(seed_point) < grid_size_px)
            .collect();
        absorbed.sort_unstable();

        let mut group = Vec::with_capacity(absorbed.len() + 1);
        group.push(seed);
        for j in absorbed {
            assigned[j] = true;
            group.push(j);
        }
        groups.push(group);
    }

    groups
}
