//! Projection descriptors.
//!
//! Only the handful of facts the planner needs are extracted from a proj4
//! string: the linear unit (planar meters vs. angular coordinates) and whether
//! the projection is one of the two the built-in reprojection understands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Projection families recognised by [`Projection::kind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionKind {
    /// Geographic longitude/latitude in degrees
    LongLat,
    /// Spherical (web) mercator in meters
    WebMercator,
    /// Anything else, keyed by its `+proj=` value
    Other(String),
}

/// A proj4-style projection descriptor, e.g. `+proj=utm +zone=33 +units=m`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Projection {
    descriptor: String,
}

impl Projection {
    pub fn from_proj4(descriptor: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into().trim().to_string(),
        }
    }

    /// WGS84 longitude/latitude.
    pub fn longlat() -> Self {
        Self::from_proj4("+proj=longlat +datum=WGS84 +no_defs")
    }

    /// Spherical mercator as used by web map tiles (EPSG:3857).
    pub fn web_mercator() -> Self {
        Self::from_proj4(
            "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs",
        )
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Look up a `+key=value` parameter. Flags without a value yield `Some("")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.descriptor.split_whitespace().find_map(|token| {
            let token = token.strip_prefix('+')?;
            match token.split_once('=') {
                Some((k, v)) if k == key => Some(v),
                None if token == key => Some(""),
                _ => None,
            }
        })
    }

    /// Linear unit declared by `+units=`, if any.
    pub fn linear_unit(&self) -> Option<&str> {
        self.param("units")
    }

    /// True when coordinates are planar meters. Mercator descriptors
    /// without `+units=` (e.g. `EPSG:3857`) default to meters.
    pub fn is_metric(&self) -> bool {
        match self.linear_unit() {
            Some(unit) => unit == "m",
            None => self.kind() == ProjectionKind::WebMercator,
        }
    }

    pub fn kind(&self) -> ProjectionKind {
        if self.descriptor.eq_ignore_ascii_case("EPSG:3857") {
            return ProjectionKind::WebMercator;
        }
        if self.descriptor.eq_ignore_ascii_case("EPSG:4326") {
            return ProjectionKind::LongLat;
        }
        match self.param("proj") {
            Some("longlat") | Some("latlong") | Some("lonlat") | Some("latlon") => {
                ProjectionKind::LongLat
            }
            Some("merc") => ProjectionKind::WebMercator,
            Some(other) => ProjectionKind::Other(other.to_string()),
            None => ProjectionKind::Other(String::new()),
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::longlat()
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_detection() {
        let utm = Projection::from_proj4("+proj=utm +zone=33 +ellps=WGS84 +units=m +no_defs");
        assert!(utm.is_metric());
        assert_eq!(utm.kind(), ProjectionKind::Other("utm".into()));
        assert!(!Projection::longlat().is_metric());
        assert!(!Projection::from_proj4("+proj=utm +units=us-ft").is_metric());
    }

    #[test]
    fn test_missing_units_is_not_metric() {
        let bare = Projection::from_proj4("");
        assert_eq!(bare.linear_unit(), None);
        assert!(!bare.is_metric());
    }

    #[test]
    fn test_mercator_aliases_are_metric() {
        assert!(Projection::from_proj4("EPSG:3857").is_metric());
        assert!(Projection::from_proj4("epsg:3857").is_metric());
        assert!(Projection::from_proj4("+proj=merc +lon_0=0").is_metric());
        assert!(Projection::web_mercator().is_metric());
        assert!(!Projection::from_proj4("+proj=merc +units=ft").is_metric());
        assert!(!Projection::from_proj4("EPSG:4326").is_metric());
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Projection::longlat().kind(), ProjectionKind::LongLat);
        assert_eq!(Projection::web_mercator().kind(), ProjectionKind::WebMercator);
        assert_eq!(Projection::from_proj4("EPSG:3857").kind(), ProjectionKind::WebMercator);
        assert_eq!(Projection::from_proj4("+proj=latlong").kind(), ProjectionKind::LongLat);
    }

    #[test]
    fn test_flag_param() {
        let p = Projection::longlat();
        assert_eq!(p.param("no_defs"), Some(""));
        assert_eq!(p.param("datum"), Some("WGS84"));
        assert_eq!(p.param("zone"), None);
    }
}
