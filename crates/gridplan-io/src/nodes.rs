//! Demand-node CSV loader.
//!
//! Expected header: `x,y,weight` with an optional `label` column. Rows are
//! kept in file order; rows that cannot be used are skipped and recorded in
//! the returned [`LoadDiagnostics`].

use csv::{ReaderBuilder, StringRecord, Trim};
use gridplan_core::{
    Coord, CoordKey, DemandNode, GridplanError, GridplanResult, LoadDiagnostics, Severity,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

const REQUIRED_COLUMNS: [&str; 3] = ["x", "y", "weight"];

#[derive(Debug, Deserialize)]
struct NodeRow {
    x: f64,
    y: f64,
    weight: f64,
    #[serde(default)]
    label: Option<String>,
}

/// Loaded demand nodes plus what happened to each row.
#[derive(Debug, Clone, Default)]
pub struct DemandLoad {
    pub nodes: Vec<DemandNode>,
    pub diagnostics: LoadDiagnostics,
}

pub fn load_demand_nodes(path: &Path) -> GridplanResult<DemandLoad> {
    let file = File::open(path).map_err(|err| {
        GridplanError::Io(std::io::Error::new(
            err.kind(),
            format!("opening demand nodes '{}': {err}", path.display()),
        ))
    })?;
    let load = read_demand_nodes(file)?;
    info!(
        path = %path.display(),
        nodes = load.nodes.len(),
        skipped = load.diagnostics.stats.rows_skipped,
        "demand nodes loaded"
    );
    Ok(load)
}

/// Parse demand nodes from any CSV source.
///
/// Missing required columns fail the whole load. Individual rows that do not
/// parse, or carry non-finite values, are skipped with a diagnostic. Negative
/// weights are kept but flagged. Repeated coordinates are kept (the builder
/// folds them) and counted as duplicates.
pub fn read_demand_nodes<R: Read>(reader: R) -> GridplanResult<DemandLoad> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|err| GridplanError::Parse(format!("reading demand node header: {err}")))?
        .clone();
    check_header(&headers)?;

    let mut load = DemandLoad::default();
    let mut seen: HashSet<CoordKey> = HashSet::new();
    for record in rdr.records() {
        load.diagnostics.stats.rows_read += 1;
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                let line = err.position().map_or(0, |p| p.line() as usize);
                load.diagnostics
                    .skip_row(Severity::Error, "csv", &err.to_string(), line);
                continue;
            }
        };
        let line = record.position().map_or(0, |p| p.line() as usize);
        let row: NodeRow = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(err) => {
                warn!(line, "skipping unreadable demand row: {err}");
                load.diagnostics
                    .skip_row(Severity::Error, "parse", &err.to_string(), line);
                continue;
            }
        };
        let coord = Coord::new(row.x, row.y);
        if !coord.is_finite() || !row.weight.is_finite() {
            warn!(line, "skipping demand row with non-finite values");
            load.diagnostics.skip_row(
                Severity::Warning,
                "non_finite",
                &format!("non-finite value in row ({}, {}, {})", row.x, row.y, row.weight),
                line,
            );
            continue;
        }
        if row.weight < 0.0 {
            load.diagnostics.flag(
                "negative_weight",
                &format!("weight {} is negative and can never afford a segment", row.weight),
                &coord.to_string(),
            );
        }
        if !seen.insert(coord.key()) {
            load.diagnostics.stats.duplicates += 1;
        }
        let node = DemandNode::new(row.x, row.y, row.weight);
        load.nodes.push(match row.label.filter(|l| !l.is_empty()) {
            Some(label) => node.with_label(label),
            None => node,
        });
        load.diagnostics.stats.rows_kept += 1;
    }
    Ok(load)
}

fn check_header(headers: &StringRecord) -> GridplanResult<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(GridplanError::Parse(format!(
            "demand node file is missing column(s): {}",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> DemandLoad {
        read_demand_nodes(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_reads_rows_in_order() {
        let load = read("x,y,weight,label\n0,0,10,a\n1.5,2,3,\n");
        assert_eq!(load.nodes.len(), 2);
        assert_eq!(load.nodes[0].label.as_deref(), Some("a"));
        assert_eq!(load.nodes[1].coord, Coord::new(1.5, 2.0));
        assert_eq!(load.nodes[1].label, None);
        assert!(!load.diagnostics.has_issues());
    }

    #[test]
    fn test_label_column_optional() {
        let load = read("x,y,weight\n0,0,1\n");
        assert_eq!(load.nodes.len(), 1);
        assert_eq!(load.nodes[0].weight, 1.0);
    }

    #[test]
    fn test_missing_column_fails() {
        let err = read_demand_nodes("x,y\n0,0\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("weight"));
    }

    #[test]
    fn test_non_finite_rows_skipped() {
        let load = read("x,y,weight\n0,0,1\nNaN,0,1\n1,1,inf\n2,2,2\n");
        assert_eq!(load.nodes.len(), 2);
        assert_eq!(load.diagnostics.stats.rows_read, 4);
        assert_eq!(load.diagnostics.stats.rows_skipped, 2);
        assert_eq!(load.diagnostics.issues_by_category("non_finite").count(), 2);
    }

    #[test]
    fn test_unparsable_row_is_an_error_issue() {
        let load = read("x,y,weight\n0,0,1\nabc,0,1\n");
        assert_eq!(load.nodes.len(), 1);
        assert_eq!(load.diagnostics.error_count(), 1);
        assert_eq!(load.diagnostics.issues[0].line, Some(3));
    }

    #[test]
    fn test_negative_weight_kept_with_warning() {
        let load = read("x,y,weight\n0,0,-4\n");
        assert_eq!(load.nodes.len(), 1);
        assert_eq!(load.diagnostics.warning_count(), 1);
        assert_eq!(load.diagnostics.stats.rows_skipped, 0);
    }

    #[test]
    fn test_duplicates_counted() {
        let load = read("x,y,weight\n0,0,1\n0,0,5\n");
        assert_eq!(load.nodes.len(), 2);
        assert_eq!(load.diagnostics.stats.duplicates, 1);
    }
}
