//! Projection of demand nodes onto an existing network.
//!
//! Every existing segment goes into an R-tree of lines; the closest point of
//! the nearest line is where a demand node would tap into the network.
//! Closest points are computed in the build projection's coordinate space,
//! which is exact for planar projections and a local approximation for
//! longitude/latitude.

use gridplan_core::Coord;
use rstar::primitives::Line;
use rstar::RTree;

#[derive(Debug)]
pub struct ExistingProjector {
    tree: RTree<Line<[f64; 2]>>,
}

impl ExistingProjector {
    pub fn new(segments: impl IntoIterator<Item = (Coord, Coord)>) -> Self {
        let lines = segments
            .into_iter()
            .map(|(a, b)| Line::new(a.to_array(), b.to_array()))
            .collect();
        Self {
            tree: RTree::bulk_load(lines),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Closest point on any existing segment, or `None` without segments.
    pub fn nearest_point(&self, point: Coord) -> Option<Coord> {
        let query = point.to_array();
        self.tree
            .nearest_neighbor(&query)
            .map(|line| Coord::from(line.nearest_point(&query)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projector() -> ExistingProjector {
        ExistingProjector::new(vec![
            (Coord::new(0.0, 10.0), Coord::new(10.0, 10.0)),
            (Coord::new(10.0, 10.0), Coord::new(10.0, 20.0)),
        ])
    }

    #[test]
    fn test_projects_onto_segment_interior() {
        let p = projector().nearest_point(Coord::new(4.0, 7.0)).unwrap();
        assert_eq!(p, Coord::new(4.0, 10.0));
    }

    #[test]
    fn test_projects_onto_endpoint() {
        let p = projector().nearest_point(Coord::new(-3.0, 6.0)).unwrap();
        assert_eq!(p, Coord::new(0.0, 10.0));
    }

    #[test]
    fn test_picks_nearest_segment() {
        let p = projector().nearest_point(Coord::new(13.0, 15.0)).unwrap();
        assert_eq!(p, Coord::new(10.0, 15.0));
    }

    #[test]
    fn test_empty_network() {
        let empty = ExistingProjector::new(Vec::new());
        assert!(empty.is_empty());
        assert_eq!(empty.nearest_point(Coord::new(1.0, 1.0)), None);
    }
}
