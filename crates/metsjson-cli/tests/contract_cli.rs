#![allow(deprecated)] // cargo_bin is deprecated but still supported by assert_cmd
//! Contract tests for the metsjson binary: exit codes, output placement and
//! the interactive fallback.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../metsjson-core/tests/fixtures")
        .join(name)
}

fn metsjson() -> Command {
    let mut cmd = Command::cargo_bin("metsjson").expect("metsjson binary");
    cmd.env_remove("METSJSON_METS")
        .env_remove("METSJSON_OUT")
        .env_remove("METSJSON_SCHEMA");
    cmd
}

fn read_json(path: &Path) -> Value {
    let content = std::fs::read_to_string(path).expect("read output");
    serde_json::from_str(&content).expect("Invalid JSON in output")
}

fn dir_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[test]
fn converts_with_flags() {
    let out = tempdir().unwrap();
    metsjson()
        .arg("--mets")
        .arg(fixture("sample_transfer.xml"))
        .arg("--out")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Success!"))
        .stdout(predicate::str::contains("sample-transfer_metadata.json"));

    let json = read_json(&out.path().join("sample-transfer_metadata.json"));
    assert_eq!(json["file_count"], 1);
    assert_eq!(json["schema_version"], "0.2.0");
    assert_eq!(json["manifest"]["files"][0]["filename"], "objects/image.tif");
}

#[test]
fn flags_fall_back_to_environment() {
    let out = tempdir().unwrap();
    metsjson()
        .env("METSJSON_METS", fixture("rich_transfer.xml"))
        .env("METSJSON_OUT", out.path())
        .assert()
        .success();
    assert!(out.path().join("field-notebooks_metadata.json").exists());
}

#[test]
fn legacy_schema_from_environment() {
    let out = tempdir().unwrap();
    metsjson()
        .env("METSJSON_SCHEMA", "legacy")
        .arg("--mets")
        .arg(fixture("sample_transfer.xml"))
        .arg("--out")
        .arg(out.path())
        .assert()
        .success();

    let json = read_json(&out.path().join("sample-transfer_metadata.json"));
    assert_eq!(json["schema_version"], "0.1.0");
    assert!(json.get("tar_techMD").is_some());
    assert!(json.get("manifest").is_none());
}

#[test]
fn unknown_schema_is_usage_error() {
    let out = tempdir().unwrap();
    metsjson()
        .env("METSJSON_SCHEMA", "0.3.0")
        .arg("--mets")
        .arg(fixture("sample_transfer.xml"))
        .arg("--out")
        .arg(out.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("fatal:"));
    assert_eq!(dir_entries(out.path()), 0);
}

#[test]
fn prompted_inputs_are_read_from_stdin() {
    let out = tempdir().unwrap();
    let answers = format!(
        "{}\n{}\n",
        fixture("sample_transfer.xml").display(),
        out.path().display()
    );
    metsjson().write_stdin(answers).assert().success();
    assert!(out.path().join("sample-transfer_metadata.json").exists());
}

#[test]
fn empty_prompt_answer_is_usage_error() {
    let out = tempdir().unwrap();
    metsjson()
        .arg("--out")
        .arg(out.path())
        .write_stdin("\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no METS file given"));
    assert_eq!(dir_entries(out.path()), 0);
}

#[test]
fn empty_size_fails_without_output() {
    let out = tempdir().unwrap();
    metsjson()
        .arg("--mets")
        .arg(fixture("empty_size.xml"))
        .arg("--out")
        .arg(out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("empty size"));
    assert_eq!(dir_entries(out.path()), 0);
}

#[test]
fn missing_descriptive_metadata_fails() {
    let out = tempdir().unwrap();
    metsjson()
        .arg("--mets")
        .arg(fixture("no_dmd_sec.xml"))
        .arg("--out")
        .arg(out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("dmdSec"));
    assert_eq!(dir_entries(out.path()), 0);
}

#[test]
fn missing_input_file_fails() {
    let out = tempdir().unwrap();
    metsjson()
        .arg("--mets")
        .arg(out.path().join("nope.xml"))
        .arg("--out")
        .arg(out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn missing_output_directory_is_output_failure() {
    let out = tempdir().unwrap();
    let gone = out.path().join("not-created");
    metsjson()
        .arg("--mets")
        .arg(fixture("sample_transfer.xml"))
        .arg("--out")
        .arg(&gone)
        .assert()
        .code(3);
    assert!(!gone.exists());
}
