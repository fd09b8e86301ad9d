//! Existing-network loader.
//!
//! Accepts a `.zip` archive holding a GeoJSON payload, or a bare `.geojson`
//! / `.json` file. LineString and MultiLineString geometries are reduced to
//! consecutive coordinate pairs; other geometry types are ignored. The
//! source projection comes from a `.proj4` or `.prj` entry next to the
//! payload (inside the archive, or beside the bare file) and defaults to
//! longitude/latitude.

use gridplan_core::{Coord, ExistingNetwork, GridplanError, GridplanResult, Projection};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const PROJECTION_EXTENSIONS: [&str; 2] = ["proj4", "prj"];

/// Load the existing network at `path`.
///
/// A missing path, an archive without a GeoJSON payload, or an unsupported
/// file type is a configuration error.
pub fn load_existing_network(path: &Path) -> GridplanResult<ExistingNetwork> {
    if !path.exists() {
        return Err(GridplanError::Config(format!(
            "existing network '{}' does not exist",
            path.display()
        )));
    }
    let (geojson, projection) = match extension(path).as_deref() {
        Some("zip") => read_archive(path)?,
        Some("geojson") | Some("json") => {
            let text = fs::read_to_string(path)?;
            (text, sibling_projection(path)?)
        }
        _ => {
            return Err(GridplanError::Config(format!(
                "existing network '{}' must be a .zip, .geojson or .json file",
                path.display()
            )))
        }
    };
    let segments = parse_geojson(&geojson)?;
    info!(
        path = %path.display(),
        segments = segments.len(),
        projection = %projection,
        "existing network loaded"
    );
    Ok(ExistingNetwork::new(projection, segments))
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn sibling_projection(path: &Path) -> GridplanResult<Projection> {
    for ext in PROJECTION_EXTENSIONS {
        let candidate = path.with_extension(ext);
        if candidate.is_file() {
            return parse_projection(&fs::read_to_string(&candidate)?);
        }
    }
    Ok(Projection::default())
}

fn parse_projection(text: &str) -> GridplanResult<Projection> {
    let descriptor = text.trim();
    if descriptor.is_empty() {
        return Err(GridplanError::Config(
            "existing network projection file is empty".into(),
        ));
    }
    Ok(Projection::from_proj4(descriptor))
}

#[cfg(feature = "archive")]
fn read_archive(path: &Path) -> GridplanResult<(String, Projection)> {
    use std::io::Read;
    use zip::ZipArchive;

    let file = fs::File::open(path)?;
    let mut archive = ZipArchive::new(file).map_err(|err| {
        GridplanError::Config(format!("reading archive '{}': {err}", path.display()))
    })?;
    let mut geojson = None;
    let mut projection = None;
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|err| GridplanError::Config(format!("reading archive entry: {err}")))?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_ascii_lowercase();
        let is_geojson = name.ends_with(".geojson") || name.ends_with(".json");
        let is_projection = PROJECTION_EXTENSIONS
            .iter()
            .any(|ext| name.ends_with(&format!(".{ext}")));
        if (is_geojson && geojson.is_none()) || (is_projection && projection.is_none()) {
            let mut contents = String::new();
            entry.read_to_string(&mut contents)?;
            debug!(entry = %name, "archive entry read");
            if is_geojson {
                geojson = Some(contents);
            } else {
                projection = Some(parse_projection(&contents)?);
            }
        }
    }
    let geojson = geojson.ok_or_else(|| {
        GridplanError::Config(format!(
            "archive '{}' contains no .geojson payload",
            path.display()
        ))
    })?;
    Ok((geojson, projection.unwrap_or_default()))
}

#[cfg(not(feature = "archive"))]
fn read_archive(path: &Path) -> GridplanResult<(String, Projection)> {
    Err(GridplanError::Config(format!(
        "'{}' is an archive but gridplan-io was built without the `archive` feature",
        path.display()
    )))
}

/// Reduce GeoJSON line geometries to coordinate pairs.
pub fn parse_geojson(text: &str) -> GridplanResult<Vec<(Coord, Coord)>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|err| GridplanError::Parse(format!("existing network GeoJSON: {err}")))?;
    let mut segments = Vec::new();
    collect_geometry(&value, &mut segments)?;
    Ok(segments)
}

fn collect_geometry(value: &Value, out: &mut Vec<(Coord, Coord)>) -> GridplanResult<()> {
    let kind = value.get("type").and_then(Value::as_str).unwrap_or_default();
    match kind {
        "FeatureCollection" => {
            for feature in array(value, "features")? {
                collect_geometry(feature, out)?;
            }
        }
        "Feature" => match value.get("geometry") {
            Some(Value::Null) | None => {}
            Some(geometry) => collect_geometry(geometry, out)?,
        },
        "GeometryCollection" => {
            for geometry in array(value, "geometries")? {
                collect_geometry(geometry, out)?;
            }
        }
        "LineString" => push_line(array(value, "coordinates")?, out)?,
        "MultiLineString" => {
            for line in array(value, "coordinates")? {
                let points = line.as_array().ok_or_else(|| {
                    GridplanError::Parse("MultiLineString member is not an array".into())
                })?;
                push_line(points, out)?;
            }
        }
        other => debug!(kind = other, "ignoring non-line geometry"),
    }
    Ok(())
}

fn array<'a>(value: &'a Value, key: &str) -> GridplanResult<&'a Vec<Value>> {
    value
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| GridplanError::Parse(format!("GeoJSON object is missing `{key}` array")))
}

fn push_line(points: &[Value], out: &mut Vec<(Coord, Coord)>) -> GridplanResult<()> {
    let mut previous: Option<Coord> = None;
    for point in points {
        let coord = position(point)?;
        match previous {
            Some(prev) if prev.key() == coord.key() => continue,
            Some(prev) => out.push((prev, coord)),
            None => {}
        }
        previous = Some(coord);
    }
    Ok(())
}

fn position(value: &Value) -> GridplanResult<Coord> {
    let xy = value
        .as_array()
        .filter(|xy| xy.len() >= 2)
        .and_then(|xy| Some(Coord::new(xy[0].as_f64()?, xy[1].as_f64()?)));
    match xy {
        Some(coord) if coord.is_finite() => Ok(coord),
        _ => Err(GridplanError::Parse(format!(
            "invalid GeoJSON position: {value}"
        ))),
    }
}
