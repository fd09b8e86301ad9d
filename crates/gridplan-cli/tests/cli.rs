use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const METRIC: &str = "+proj=utm +zone=37 +south +datum=WGS84 +units=m +no_defs";

fn write_nodes(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("nodes.csv");
    fs::write(
        &path,
        "x,y,weight,label\n0,0,10,a\n1,0,10,b\n2,0,10,c\n10,10,1,far\n",
    )
    .unwrap();
    path
}

fn gridplan() -> Command {
    Command::cargo_bin("gridplan").unwrap()
}

#[test]
fn build_writes_json_result() {
    let dir = tempdir().unwrap();
    let nodes = write_nodes(dir.path());
    let out = dir.path().join("out/result.json");
    gridplan()
        .args([
            "build",
            "--nodes",
            nodes.to_str().unwrap(),
            "--proj",
            METRIC,
            "--neighbors",
            "2",
            "-o",
            out.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Built 1 subnet(s) with 3 node(s)"));

    let result: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(result["report"]["accepted"], 2);
    assert_eq!(result["report"]["subnets_pruned"], 1);
    let subnet = &result["network"]["subnets"][0];
    assert_eq!(subnet["weight"], 28.0);
    assert_eq!(subnet["nodes"].as_array().unwrap().len(), 3);
}

#[test]
fn build_reads_config_file() {
    let dir = tempdir().unwrap();
    let nodes = write_nodes(dir.path());
    let config = dir.path().join("plan.toml");
    fs::write(&config, "[algorithm]\nminimum_node_count_per_subnetwork = 1\n").unwrap();
    let out = dir.path().join("result.json");
    gridplan()
        .args([
            "build",
            "--nodes",
            nodes.to_str().unwrap(),
            "--proj",
            METRIC,
            "--config",
            config.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Built 2 subnet(s)"));
}

#[test]
fn build_emits_dot() {
    let dir = tempdir().unwrap();
    let nodes = write_nodes(dir.path());
    gridplan()
        .args([
            "build",
            "--nodes",
            nodes.to_str().unwrap(),
            "--proj",
            METRIC,
            "--format",
            "dot",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("graph gridplan_network {"));
}

#[test]
fn missing_existing_network_fails_before_build() {
    let dir = tempdir().unwrap();
    let nodes = write_nodes(dir.path());
    gridplan()
        .args([
            "build",
            "--nodes",
            nodes.to_str().unwrap(),
            "--proj",
            METRIC,
            "--existing",
            dir.path().join("missing.zip").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn zero_neighbors_rejected() {
    let dir = tempdir().unwrap();
    let nodes = write_nodes(dir.path());
    gridplan()
        .args([
            "build",
            "--nodes",
            nodes.to_str().unwrap(),
            "--neighbors",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nearest neighbor"));
}

#[test]
fn stats_and_export_read_result() {
    let dir = tempdir().unwrap();
    let nodes = write_nodes(dir.path());
    let out = dir.path().join("result.json");
    gridplan()
        .args([
            "build",
            "--nodes",
            nodes.to_str().unwrap(),
            "--proj",
            METRIC,
            "-o",
            out.to_str().unwrap(),
        ])
        .assert()
        .success();

    gridplan()
        .args(["stats", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nodes         : 3"))
        .stdout(predicate::str::contains("Components    : 1"));

    let dot = dir.path().join("network.dot");
    gridplan()
        .args([
            "export",
            out.to_str().unwrap(),
            "--out",
            dot.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Graph written to"));
    assert!(fs::read_to_string(&dot).unwrap().contains(" -- "));
}

#[test]
fn export_rejects_unknown_format() {
    let dir = tempdir().unwrap();
    let nodes = write_nodes(dir.path());
    let out = dir.path().join("result.json");
    gridplan()
        .args([
            "build",
            "--nodes",
            nodes.to_str().unwrap(),
            "--proj",
            METRIC,
            "-o",
            out.to_str().unwrap(),
        ])
        .assert()
        .success();
    gridplan()
        .args(["export", out.to_str().unwrap(), "--format", "gexf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported graph export format"));
}
