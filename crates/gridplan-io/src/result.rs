//! Result files: the built network plus its build report, as JSON.

use gridplan_algo::{BuildOutcome, BuildReport};
use gridplan_core::{BuiltNetwork, GridplanError, GridplanResult};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildResult {
    pub report: BuildReport,
    pub network: BuiltNetwork,
}

impl From<BuildOutcome> for BuildResult {
    fn from(outcome: BuildOutcome) -> Self {
        Self {
            report: outcome.report,
            network: outcome.network,
        }
    }
}

/// Write `result` as pretty-printed JSON, creating parent directories.
pub fn write_result(path: &Path, result: &BuildResult) -> GridplanResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, result)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(
        path = %path.display(),
        subnets = result.network.subnets.len(),
        "result written"
    );
    Ok(())
}

/// Read a result written by [`write_result`]. A bare serialized
/// [`BuiltNetwork`] is accepted too, with an empty report.
pub fn read_result(path: &Path) -> GridplanResult<BuildResult> {
    let file = File::open(path).map_err(|err| {
        GridplanError::Io(std::io::Error::new(
            err.kind(),
            format!("opening result '{}': {err}", path.display()),
        ))
    })?;
    let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;
    if value.get("network").is_some() {
        Ok(serde_json::from_value(value)?)
    } else {
        Ok(BuildResult {
            report: BuildReport::default(),
            network: serde_json::from_value(value)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridplan_core::{Coord, Node, NodeId, Projection, SegmentRecord, SubnetRecord};
    use tempfile::tempdir;

    fn sample() -> BuildResult {
        let node = |id: i64, x: f64| Node {
            id: NodeId::new(id),
            coord: Coord::new(x, 0.0),
            weight: 8.0,
            label: None,
        };
        BuildResult {
            report: BuildReport {
                demand_nodes: 2,
                accepted: 1,
                subnets_kept: 1,
                accepted_cost: 2.0,
                ..BuildReport::default()
            },
            network: BuiltNetwork {
                projection: Projection::from_proj4("+units=m"),
                subnets: vec![SubnetRecord {
                    weight: 8.0,
                    nodes: vec![node(0, 0.0), node(1, 2.0)],
                    segments: vec![SegmentRecord {
                        from: NodeId::new(0),
                        to: NodeId::new(1),
                        from_coord: Coord::new(0.0, 0.0),
                        to_coord: Coord::new(2.0, 0.0),
                        cost: 2.0,
                        is_existing: false,
                    }],
                }],
            },
        }
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/result.json");
        write_result(&path, &sample()).unwrap();
        assert_eq!(read_result(&path).unwrap(), sample());
    }

    #[test]
    fn test_reads_bare_network() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("network.json");
        fs::write(&path, serde_json::to_string(&sample().network).unwrap()).unwrap();
        let result = read_result(&path).unwrap();
        assert_eq!(result.report, BuildReport::default());
        assert_eq!(result.network.subnets.len(), 1);
    }
}
