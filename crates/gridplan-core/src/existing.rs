//! Pre-existing network input.
//!
//! An existing network arrives in its own projection as a flat list of
//! coordinate pairs (geometry simplification is the loader's job). Before it
//! can take part in a build its coordinates are mapped into the build
//! projection through a [`PointTransform`].

use crate::{Coord, Projection};
use serde::{Deserialize, Serialize};

/// Maps a point from one projection into another.
pub trait PointTransform {
    fn transform(&self, x: f64, y: f64) -> (f64, f64);

    fn transform_coord(&self, coord: Coord) -> Coord {
        self.transform(coord.x, coord.y).into()
    }
}

impl<F> PointTransform for F
where
    F: Fn(f64, f64) -> (f64, f64),
{
    fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        self(x, y)
    }
}

/// Identity transform, for networks already in the build projection.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl PointTransform for Identity {
    fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        (x, y)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExistingNetwork {
    /// Projection the coordinates are expressed in
    pub projection: Projection,
    pub segments: Vec<(Coord, Coord)>,
}

impl ExistingNetwork {
    pub fn new(projection: Projection, segments: Vec<(Coord, Coord)>) -> Self {
        Self {
            projection,
            segments,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Coordinate pairs mapped through `transform`.
    pub fn transformed<'a>(
        &'a self,
        transform: &'a dyn PointTransform,
    ) -> impl Iterator<Item = (Coord, Coord)> + 'a {
        self.segments
            .iter()
            .map(move |&(a, b)| (transform.transform_coord(a), transform.transform_coord(b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_transform() {
        let shift = |x: f64, y: f64| (x + 1.0, y - 1.0);
        let network = ExistingNetwork::new(
            Projection::from_proj4("+units=m"),
            vec![(Coord::new(0.0, 0.0), Coord::new(2.0, 2.0))],
        );
        let moved: Vec<_> = network.transformed(&shift).collect();
        assert_eq!(moved, vec![(Coord::new(1.0, -1.0), Coord::new(3.0, 1.0))]);
    }

    #[test]
    fn test_identity() {
        assert_eq!(Identity.transform(3.0, 4.0), (3.0, 4.0));
    }
}
