//! Distance metrics.
//!
//! The projection decides the metric: planar Euclidean distance when the
//! projection's linear unit is meters, great-circle (haversine) distance over
//! longitude/latitude degrees otherwise. A missing or unknown unit falls into
//! the spherical branch.

use crate::projection::Projection;
use crate::units::{Degrees, Meters};
use crate::Coord;
use serde::{Deserialize, Serialize};

/// Earth radius used for great-circle distances.
pub const EARTH_RADIUS_METERS: f64 = 6_371_010.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Euclidean distance over planar coordinates
    Planar,
    /// Haversine distance over (longitude, latitude) in degrees
    GreatCircle { radius: f64 },
}

impl DistanceMetric {
    pub fn for_projection(projection: &Projection) -> Self {
        if projection.is_metric() {
            DistanceMetric::Planar
        } else {
            DistanceMetric::GreatCircle {
                radius: EARTH_RADIUS_METERS,
            }
        }
    }

    pub fn is_planar(&self) -> bool {
        matches!(self, DistanceMetric::Planar)
    }

    /// Distance between two coordinates. Always nonnegative and symmetric.
    pub fn distance(&self, a: Coord, b: Coord) -> f64 {
        match *self {
            DistanceMetric::Planar => (a.x - b.x).hypot(a.y - b.y),
            DistanceMetric::GreatCircle { radius } => great_circle(a, b, radius).value(),
        }
    }
}

fn great_circle(a: Coord, b: Coord, radius: f64) -> Meters {
    let lat_a = Degrees(a.y).to_radians();
    let lat_b = Degrees(b.y).to_radians();
    let half_dlat = (lat_b - lat_a) / 2.0;
    let half_dlon = Degrees(b.x - a.x).to_radians() / 2.0;
    let h = half_dlat.sin().powi(2) + lat_a.cos() * lat_b.cos() * half_dlon.sin().powi(2);
    // rounding can push h a hair past 1 for antipodal points
    let central = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();
    Meters(radius * central)
}
