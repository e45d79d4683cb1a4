//! End-to-end tests for the `jet` binary.
//!
//! Every test runs against its own `TempDir` home so the user's real
//! `~/.jet` is never touched.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const COLOR_ID: &str = "0f8d6c52-4f7e-4a53-9a3e-8d0f6f1c2b11";

fn jet_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("jet"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env("RUST_LOG", "warn");
    cmd
}

fn write_models(dir: &TempDir) -> PathBuf {
    let models = dir.path().join("models");
    fs::create_dir_all(&models).expect("models dir");
    fs::write(
        models.join("color.yaml"),
        format!(
            "name: Color Picker\neditor: colorpicker.editor\nid: {COLOR_ID}\npre_values:\n  swatches: \"red,green\"\n"
        ),
    )
    .expect("write color");
    fs::write(
        models.join("count.json"),
        r#"{"name": "Count", "editor": "Umbraco.Integer", "type": "integer"}"#,
    )
    .expect("write count");
    models
}

fn cms_snapshot(home: &Path) -> serde_json::Value {
    let raw = fs::read_to_string(home.join(".jet").join("cms.json")).expect("read cms.json");
    serde_json::from_str(&raw).expect("parse cms.json")
}

// ---------------------------------------------------------------------------
// sync
// ---------------------------------------------------------------------------

#[test]
fn sync_creates_definitions_and_tracks_ids() {
    let home = TempDir::new().expect("home");
    let models = write_models(&home);

    jet_cmd(home.path())
        .args(["sync", "--models"])
        .arg(&models)
        .assert()
        .success()
        .stdout(contains("2 definition(s), 1 tracked id(s)"))
        .stdout(contains("Color Picker"))
        .stdout(contains("long text"));

    let snapshot = cms_snapshot(home.path());
    let definitions = snapshot["definitions"].as_object().expect("definitions map");
    assert_eq!(definitions.len(), 2);

    let ids = fs::read_to_string(home.path().join(".jet").join("ids.json")).expect("ids.json");
    assert!(ids.contains(COLOR_ID));
}

#[test]
fn second_sync_keeps_storage_ids() {
    let home = TempDir::new().expect("home");
    let models = write_models(&home);

    for _ in 0..2 {
        jet_cmd(home.path())
            .args(["sync", "--models"])
            .arg(&models)
            .assert()
            .success();
    }

    let snapshot = cms_snapshot(home.path());
    let mut keys: Vec<_> = snapshot["definitions"]
        .as_object()
        .expect("definitions map")
        .keys()
        .cloned()
        .collect();
    keys.sort();
    assert_eq!(keys, vec!["1", "2"]);
}

#[test]
fn sync_honours_explicit_home_and_cms_paths() {
    let home = TempDir::new().expect("home");
    let elsewhere = TempDir::new().expect("elsewhere");
    let models = write_models(&home);
    let cms = elsewhere.path().join("snapshot.json");

    jet_cmd(home.path())
        .args(["sync", "--models"])
        .arg(&models)
        .arg("--home")
        .arg(elsewhere.path())
        .arg("--cms")
        .arg(&cms)
        .assert()
        .success();

    assert!(cms.exists());
    assert!(elsewhere.path().join(".jet").join("ids.json").exists());
    assert!(!home.path().join(".jet").join("cms.json").exists());
}

#[test]
fn sync_skips_when_not_installed() {
    let home = TempDir::new().expect("home");
    let models = write_models(&home);
    fs::create_dir_all(home.path().join(".jet")).expect("jet dir");
    fs::write(home.path().join(".jet").join("config.yaml"), "installed: false\n")
        .expect("write config");

    jet_cmd(home.path())
        .args(["sync", "--models"])
        .arg(&models)
        .assert()
        .success()
        .stdout(contains("not installed"));

    let snapshot = cms_snapshot(home.path());
    assert!(snapshot["definitions"]
        .as_object()
        .expect("definitions map")
        .is_empty());
}

#[test]
fn sync_reports_disabled_data_types() {
    let home = TempDir::new().expect("home");
    let models = write_models(&home);
    fs::create_dir_all(home.path().join(".jet")).expect("jet dir");
    fs::write(
        home.path().join(".jet").join("config.yaml"),
        "synchronize: [document_types]\n",
    )
    .expect("write config");

    jet_cmd(home.path())
        .args(["sync", "--models"])
        .arg(&models)
        .assert()
        .success()
        .stdout(contains("disabled"));
}

#[test]
fn sync_rejects_conflicting_models_without_writing() {
    let home = TempDir::new().expect("home");
    let models = write_models(&home);
    fs::write(
        models.join("dupe.yaml"),
        format!("name: Other\neditor: other.editor\nid: {COLOR_ID}\n"),
    )
    .expect("write dupe");

    jet_cmd(home.path())
        .args(["sync", "--models"])
        .arg(&models)
        .assert()
        .failure()
        .stderr(contains("declared by"));

    let snapshot = cms_snapshot(home.path());
    assert!(snapshot["definitions"]
        .as_object()
        .expect("definitions map")
        .is_empty());
}

#[test]
fn sync_fails_on_missing_models_dir() {
    let home = TempDir::new().expect("home");

    jet_cmd(home.path())
        .args(["sync", "--models"])
        .arg(home.path().join("nope"))
        .assert()
        .failure()
        .stderr(contains("sync failed"));
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_clean_models() {
    let home = TempDir::new().expect("home");
    let models = write_models(&home);

    jet_cmd(home.path())
        .args(["validate", "--models"])
        .arg(&models)
        .assert()
        .success()
        .stdout(contains("2 data type model(s) are valid"));
}

#[test]
fn validate_lists_every_problem() {
    let home = TempDir::new().expect("home");
    let models = write_models(&home);
    fs::write(
        models.join("more.yaml"),
        format!(
            "data_types:\n  - name: Other\n    editor: other.editor\n    id: {COLOR_ID}\n  - name: Count\n    editor: Umbraco.Integer\n"
        ),
    )
    .expect("write more");

    jet_cmd(home.path())
        .args(["validate", "--models"])
        .arg(&models)
        .assert()
        .failure()
        .stdout(contains("declared by"))
        .stdout(contains("'Count'"))
        .stderr(contains("2 problem(s) found"));
}

// ---------------------------------------------------------------------------
// ids
// ---------------------------------------------------------------------------

#[test]
fn ids_without_store_says_so() {
    let home = TempDir::new().expect("home");

    jet_cmd(home.path())
        .arg("ids")
        .assert()
        .success()
        .stdout(contains("No tracked ids"));
}

#[test]
fn ids_table_and_json_show_tracked_definition() {
    let home = TempDir::new().expect("home");
    let models = write_models(&home);

    jet_cmd(home.path())
        .args(["sync", "--models"])
        .arg(&models)
        .assert()
        .success();

    jet_cmd(home.path())
        .arg("ids")
        .assert()
        .success()
        .stdout(contains(COLOR_ID).and(contains("Color Picker")));

    let output = jet_cmd(home.path())
        .args(["ids", "--json"])
        .output()
        .expect("run jet ids --json");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    let rows = report["definitions"].as_array().expect("definitions array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["stable_id"], COLOR_ID);
    assert_eq!(rows[0]["name"], "Color Picker");
    assert_eq!(rows[0]["storage_id"], 1);
}
