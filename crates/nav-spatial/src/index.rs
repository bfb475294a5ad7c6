//! R-tree nearest-vertex index over a route shape.
//!
//! Used by the simulator when it has no vertex hint from the previous tick
//! (first tick on a route, first tick after a reroute).

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use nav_core::GeoPoint;

use crate::Polyline;

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// A vertex projected to `[lat, lon * cos(lat)]` with the index it came from.
#[derive(Clone)]
struct VertexEntry {
    point: [f64; 2],
    index: usize,
}

/// Local equirectangular projection: one unit is roughly one degree of
/// latitude on both axes, so planar distances rank like ground distances.
fn project(p: GeoPoint) -> [f64; 2] {
    [p.lat, p.lon * p.lat.to_radians().cos()]
}

impl RTreeObject for VertexEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for VertexEntry {
    /// Squared Euclidean distance in projected space.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── VertexIndex ───────────────────────────────────────────────────────────────

/// Spatial index answering "which vertex of this shape is closest".
pub struct VertexIndex {
    tree: RTree<VertexEntry>,
}

impl VertexIndex {
    pub fn build(shape: &Polyline) -> Self {
        let entries = shape
            .points()
            .iter()
            .enumerate()
            .map(|(index, p)| VertexEntry { point: project(*p), index })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    /// Index of the vertex closest to `p`, or `None` for an empty shape.
    ///
    /// Ties between equidistant vertices resolve to the lowest index.
    pub fn nearest(&self, p: GeoPoint) -> Option<usize> {
        let query = project(p);
        let best = self.tree.nearest_neighbor(&query)?;
        let best_d2 = best.distance_2(&query);
        self.tree
            .locate_within_distance(query, best_d2)
            .map(|e| e.index)
            .min()
            .or(Some(best.index))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
