//! E2E CLI tests: `cnet analyze`, `cnet stats`, `cnet export`.
//!
//! Each test runs the `cnet` binary as a subprocess in an isolated temp
//! directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the cnet binary, rooted in `dir`.
fn cnet_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cnet"));
    cmd.current_dir(dir);
    cmd.env("CNET_LOG", "error");
    cmd.env_remove("CNET_FORMAT");
    // Keep the user's own config out of the picture.
    cmd.env("XDG_CONFIG_HOME", dir.join(".config"));
    cmd
}

const TWO_TEAMS: &str = "\
source,target,weight,count,tags
alice,bob,3,1,issue_comment:1
bob,carol,1,1,pr_review:1
carol,alice,2,1,pr_merged:1
dave,erin,1,1,issue_comment:1
erin,frank,1,1,pr_review:1
frank,dave,1,1,issue_closed:1
carol,dave,1,1,issue_comment:1
";

fn write_edges(dir: &Path) -> PathBuf {
    let path = dir.join("edges.csv");
    std::fs::write(&path, TWO_TEAMS).expect("write edges");
    path
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("cnet should not crash");
    assert!(
        output.status.success(),
        "cnet failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("--json should produce valid JSON")
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

#[test]
fn analyze_json_report() {
    let dir = TempDir::new().expect("tempdir");
    write_edges(dir.path());

    let json = json_output(
        cnet_cmd(dir.path()).args(["analyze", "edges.csv", "--splits", "1", "--json"]),
    );

    assert_eq!(json["backend"], "sparse");
    assert!(json["content_hash"].as_str().expect("hash").starts_with("blake3:"));
    assert_eq!(json["stats"]["vertex_count"], 6);
    assert_eq!(json["stats"]["edge_count"], 7);
    assert_eq!(json["communities"]["count"], 2);
    assert_eq!(json["communities"]["bridging_ties"][0]["source"], "carol");
    assert_eq!(json["communities"]["bridging_ties"][0]["target"], "dave");
    assert_eq!(json["rankings"]["pagerank"].as_array().expect("array").len(), 5);
}

#[test]
fn backends_produce_identical_reports() {
    let dir = TempDir::new().expect("tempdir");
    write_edges(dir.path());

    let analyze = |backend: &str| {
        json_output(cnet_cmd(dir.path()).args([
            "analyze",
            "edges.csv",
            "--backend",
            backend,
            "--json",
        ]))
    };
    let mut sparse = analyze("sparse");
    let mut dense = analyze("dense");
    sparse["backend"] = Value::Null;
    dense["backend"] = Value::Null;
    assert_eq!(sparse, dense);
}

#[test]
fn project_config_is_picked_up_and_flags_override() {
    let dir = TempDir::new().expect("tempdir");
    write_edges(dir.path());
    std::fs::write(
        dir.path().join("collabnet.toml"),
        "backend = \"dense\"\n[report]\ntop_k = 2\n",
    )
    .expect("write config");

    let json = json_output(cnet_cmd(dir.path()).args(["analyze", "edges.csv", "--json"]));
    assert_eq!(json["backend"], "dense");
    assert_eq!(json["top_k"], 2);

    let json = json_output(
        cnet_cmd(dir.path()).args(["analyze", "edges.csv", "--top", "3", "--json"]),
    );
    assert_eq!(json["top_k"], 3);
}

#[test]
fn analyze_pretty_sections() {
    let dir = TempDir::new().expect("tempdir");
    write_edges(dir.path());

    cnet_cmd(dir.path())
        .args(["analyze", "edges.csv", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Centrality (top 5)"))
        .stdout(predicate::str::contains("Communities (Girvan–Newman)"))
        .stdout(predicate::str::contains("average clustering:"));
}

#[test]
fn missing_file_fails_with_json_error() {
    let dir = TempDir::new().expect("tempdir");
    cnet_cmd(dir.path())
        .args(["analyze", "nope.csv", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error\""))
        .stderr(predicate::str::contains("nope.csv"));
}

#[test]
fn broken_config_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    write_edges(dir.path());
    std::fs::write(dir.path().join("collabnet.toml"), "backend = [").expect("write config");
    cnet_cmd(dir.path())
        .args(["analyze", "edges.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("collabnet.toml"));
}

// ---------------------------------------------------------------------------
// stats / export
// ---------------------------------------------------------------------------

#[test]
fn stats_reports_hash_and_components() {
    let dir = TempDir::new().expect("tempdir");
    write_edges(dir.path());

    let json = json_output(cnet_cmd(dir.path()).args(["stats", "edges.csv", "--json"]));
    assert_eq!(json["vertex_count"], 6);
    assert_eq!(json["interactions"], 7);
    assert_eq!(json["weak_component_count"], 1);
    assert_eq!(json["is_connected"], true);

    let again = json_output(cnet_cmd(dir.path()).args(["stats", "edges.csv", "--json"]));
    assert_eq!(json["content_hash"], again["content_hash"]);
}

#[test]
fn stats_text_mode_is_tab_separated() {
    let dir = TempDir::new().expect("tempdir");
    write_edges(dir.path());
    cnet_cmd(dir.path())
        .args(["stats", "edges.csv", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vertices\t6"));
}

#[test]
fn export_writes_gexf() {
    let dir = TempDir::new().expect("tempdir");
    write_edges(dir.path());

    let json = json_output(
        cnet_cmd(dir.path()).args(["export", "edges.csv", "out/graph.gexf", "--json"]),
    );
    assert_eq!(json["vertices"], 6);
    assert_eq!(json["edges"], 7);

    let gexf = std::fs::read_to_string(dir.path().join("out/graph.gexf")).expect("read gexf");
    assert!(gexf.contains("defaultedgetype=\"directed\""));
    assert!(gexf.contains("label=\"carol\""));
}

#[test]
fn kind_filter_builds_the_comment_graph() {
    let dir = TempDir::new().expect("tempdir");
    write_edges(dir.path());

    let json = json_output(cnet_cmd(dir.path()).args([
        "stats",
        "edges.csv",
        "--kind",
        "comments",
        "--json",
    ]));
    // alice → bob, dave → erin, carol → dave
    assert_eq!(json["edge_count"], 3);
    assert_eq!(json["vertex_count"], 5);
    assert_eq!(json["interactions"], 3);
    assert_eq!(json["tags"][0], "issue_comment");

    let integrated = json_output(cnet_cmd(dir.path()).args(["stats", "edges.csv", "--json"]));
    assert!(integrated.get("tags").is_none());
    assert_ne!(json["content_hash"], integrated["content_hash"]);
}

#[test]
fn headerless_input_needs_no_header_flag() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("raw.csv"), "ann,ben,1\nben,cat,2\n").expect("write");

    let with_flag =
        json_output(cnet_cmd(dir.path()).args(["stats", "raw.csv", "--no-header", "--json"]));
    assert_eq!(with_flag["edge_count"], 2);

    let without = json_output(cnet_cmd(dir.path()).args(["stats", "raw.csv", "--json"]));
    assert_eq!(without["edge_count"], 1, "first row read as the header");
}
