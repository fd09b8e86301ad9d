//! Nearest-neighbor index over node coordinates.
//!
//! Two backends share one contract. The planar backend is an R-tree over the
//! raw coordinates. The great-circle backend embeds each (longitude, latitude)
//! pair on a sphere of the configured radius and indexes the 3-D points: the
//! chord between two points on a sphere grows monotonically with their arc
//! length, so nearest-by-chord is nearest-by-great-circle.
//!
//! Queries return positions into the coordinate slice the index was built
//! from, nearest first. A point that is itself indexed comes back as its own
//! first neighbor; filtering that out is the caller's concern.

use gridplan_core::units::Degrees;
use gridplan_core::{Coord, DistanceMetric};
use rstar::primitives::GeomWithData;
use rstar::RTree;

type PlanarEntry = GeomWithData<[f64; 2], usize>;
type SphericalEntry = GeomWithData<[f64; 3], usize>;

enum Backend {
    Planar(RTree<PlanarEntry>),
    GreatCircle { tree: RTree<SphericalEntry>, radius: f64 },
}

pub struct SpatialIndex {
    backend: Backend,
    len: usize,
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.backend {
            Backend::Planar(_) => "planar",
            Backend::GreatCircle { .. } => "great-circle",
        };
        f.debug_struct("SpatialIndex")
            .field("backend", &kind)
            .field("len", &self.len)
            .finish()
    }
}

impl SpatialIndex {
    /// Bulk-load an index whose backend matches `metric`.
    pub fn build(coords: &[Coord], metric: DistanceMetric) -> Self {
        let backend = match metric {
            DistanceMetric::Planar => Backend::Planar(RTree::bulk_load(
                coords
                    .iter()
                    .enumerate()
                    .map(|(i, c)| GeomWithData::new(c.to_array(), i))
                    .collect(),
            )),
            DistanceMetric::GreatCircle { radius } => Backend::GreatCircle {
                tree: RTree::bulk_load(
                    coords
                        .iter()
                        .enumerate()
                        .map(|(i, c)| GeomWithData::new(embed(*c, radius), i))
                        .collect(),
                ),
                radius,
            },
        };
        Self {
            backend,
            len: coords.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Up to `k` indexed positions ordered by distance from `point`. Asking for
    /// more neighbors than are indexed returns all of them.
    pub fn k_nearest(&self, point: Coord, k: usize) -> Vec<usize> {
        match &self.backend {
            Backend::Planar(tree) => tree
                .nearest_neighbor_iter(&point.to_array())
                .take(k)
                .map(|entry| entry.data)
                .collect(),
            Backend::GreatCircle { tree, radius } => tree
                .nearest_neighbor_iter(&embed(point, *radius))
                .take(k)
                .map(|entry| entry.data)
                .collect(),
        }
    }
}

/// (longitude, latitude) in degrees to a point on a sphere of `radius`.
fn embed(coord: Coord, radius: f64) -> [f64; 3] {
    let lon = Degrees(coord.x).to_radians();
    let lat = Degrees(coord.y).to_radians();
    [
        radius * lat.cos() * lon.cos(),
        radius * lat.cos() * lon.sin(),
        radius * lat.sin(),
    ]
}
