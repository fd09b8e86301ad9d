//! Coordinate transforms between supported projections.
//!
//! Only the pairs the planner actually meets are supported: identical
//! projections, and geographic longitude/latitude to and from spherical web
//! mercator. Anything else is a configuration error raised before the build.

use gridplan_core::units::{Degrees, Radians};
use gridplan_core::{GridplanError, GridplanResult, PointTransform, Projection, ProjectionKind};
use std::f64::consts::FRAC_PI_4;

/// Sphere radius of EPSG:3857.
pub const MERCATOR_RADIUS: f64 = 6_378_137.0;

/// Latitude where web mercator tiles are cut off.
const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reprojection {
    Identity,
    LongLatToMercator,
    MercatorToLongLat,
}

impl PointTransform for Reprojection {
    fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Reprojection::Identity => (x, y),
            Reprojection::LongLatToMercator => {
                let lat = y.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
                let lambda = Degrees::new(x).to_radians().value();
                let phi = Degrees::new(lat).to_radians().value();
                (
                    MERCATOR_RADIUS * lambda,
                    MERCATOR_RADIUS * (FRAC_PI_4 + phi / 2.0).tan().ln(),
                )
            }
            Reprojection::MercatorToLongLat => {
                let lambda = Radians::new(x / MERCATOR_RADIUS);
                let phi = Radians::new(2.0 * (y / MERCATOR_RADIUS).exp().atan() - 2.0 * FRAC_PI_4);
                (lambda.to_degrees().value(), phi.to_degrees().value())
            }
        }
    }
}

/// The transform taking coordinates in `from` into `to`.
pub fn transform_for(from: &Projection, to: &Projection) -> GridplanResult<Reprojection> {
    if from.descriptor().trim() == to.descriptor().trim() {
        return Ok(Reprojection::Identity);
    }
    match (from.kind(), to.kind()) {
        (ProjectionKind::LongLat, ProjectionKind::LongLat)
        | (ProjectionKind::WebMercator, ProjectionKind::WebMercator) => Ok(Reprojection::Identity),
        (ProjectionKind::LongLat, ProjectionKind::WebMercator) => {
            Ok(Reprojection::LongLatToMercator)
        }
        (ProjectionKind::WebMercator, ProjectionKind::LongLat) => {
            Ok(Reprojection::MercatorToLongLat)
        }
        _ => Err(GridplanError::Config(format!(
            "cannot reproject from '{from}' to '{to}'; supported: longlat and web mercator"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64), b: (f64, f64), tol: f64) -> bool {
        (a.0 - b.0).abs() < tol && (a.1 - b.1).abs() < tol
    }

    #[test]
    fn test_same_descriptor_is_identity() {
        let p = Projection::from_proj4("+proj=utm +zone=33 +units=m");
        assert_eq!(transform_for(&p, &p).unwrap(), Reprojection::Identity);
    }

    #[test]
    fn test_epsg_alias_is_identity() {
        let t = transform_for(&Projection::from_proj4("EPSG:4326"), &Projection::longlat());
        assert_eq!(t.unwrap(), Reprojection::Identity);
    }

    #[test]
    fn test_longlat_to_mercator_known_point() {
        let t = transform_for(&Projection::longlat(), &Projection::web_mercator()).unwrap();
        let (x, y) = t.transform(180.0, 0.0);
        assert!((x - 20_037_508.342_789_244).abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_mercator_inverts() {
        let forward = transform_for(&Projection::longlat(), &Projection::web_mercator()).unwrap();
        let back = transform_for(&Projection::web_mercator(), &Projection::longlat()).unwrap();
        let (x, y) = forward.transform(36.8, -1.3);
        assert!(close(back.transform(x, y), (36.8, -1.3), 1e-9));
    }

    #[test]
    fn test_unsupported_pair() {
        let utm = Projection::from_proj4("+proj=utm +zone=33 +units=m");
        let err = transform_for(&Projection::longlat(), &utm).unwrap_err();
        assert!(matches!(err, GridplanError::Config(_)));
    }
}
