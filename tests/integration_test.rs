//! Integration tests for the thermo-ledger CLI.
//!
//! These tests run the actual binary against a scratch data folder and
//! verify the ledger it leaves behind.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

const REGISTRY: &str = "Radiator Name,Radiator ID,Coefficient
Kitchen,0,1
Living Room,1,2
Gym,2,3
";

const LEDGER: &str = "radiators_usage_2025-2026.csv";

/// Welcome, first-time setup, data entry intro, valves, readings, no note,
/// do not open.
const FIRST_RUN: &str = "\n\n2025-2026\nyes\nEuropean\nyes\nAuto\nyes\n\n\n3\n2\nantifreeze\nno\n10\n7\n15\nno\nno\nno\n";

/// Welcome, keep settings, intro, keep all valves, readings, note, do not open.
const SECOND_RUN: &str =
    "\nno\n\n\nno\nno\nno\n20\n10\n30\nno\nyes\nBoiler serviced\nno\n";

fn data_folder() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("radiators_registry.csv"), REGISTRY).unwrap();
    dir
}

/// Run the binary on `folder` with `script` on stdin
fn run_ledger(folder: &Path, script: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("thermo-ledger")
        .unwrap()
        .arg(folder)
        .write_stdin(script)
        .assert()
}

/// Ledger rows split into fields
fn read_rows(folder: &Path) -> Vec<Vec<String>> {
    fs::read_to_string(folder.join(LEDGER))
        .unwrap()
        .lines()
        .map(|l| l.split(',').map(str::to_string).collect())
        .collect()
}

#[test]
fn test_first_run_creates_ledger() {
    let dir = data_folder();

    run_ledger(dir.path(), FIRST_RUN)
        .success()
        .stdout(predicate::str::contains("Usage file saved successfully"));

    let rows = read_rows(dir.path());
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[0][0], "Date");
    assert_eq!(rows[0][8], "Notes");
    assert_eq!(rows[1][1], "Kitchen");
    assert_eq!(rows[1][7], "'3");
    assert_eq!(rows[3][5], "45");
    assert_eq!(rows[3][7], "antifreeze");
    assert_eq!(rows[4][6], "69");
    assert_eq!(rows[4][0], rows[1][0]);
    assert_eq!(rows[1][8], "No additional notes.");
    assert!(rows[5..].iter().all(|r| r.iter().all(String::is_empty)));

    assert!(dir.path().join(format!("{}.layout.json", LEDGER)).exists());
    let config = fs::read_to_string(dir.path().join("config.json")).unwrap();
    assert!(config.contains("radiators_usage_2025-2026.csv"));
}

#[test]
fn test_second_run_appends_after_separator() {
    let dir = data_folder();
    run_ledger(dir.path(), FIRST_RUN).success();
    let first = read_rows(dir.path());

    run_ledger(dir.path(), SECOND_RUN).success();
    let rows = read_rows(dir.path());

    assert_eq!(rows.len(), 15);
    for (i, row) in first.iter().enumerate() {
        let width = row.len();
        assert_eq!(&rows[i][..width], &row[..]);
    }
    assert_eq!(rows[8][1], "Kitchen");
    assert_eq!(rows[8][7], "'3");
    assert_eq!(rows[9][7], "'2");
    assert_eq!(rows[10][7], "antifreeze");
    assert_eq!(rows[11][6], "130");
    assert_eq!(rows[8][8], "Boiler serviced");
}

#[test]
fn test_missing_argument() {
    Command::cargo_bin("thermo-ledger")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing data folder argument"));
}

#[test]
fn test_missing_registry_leaves_no_ledger() {
    let dir = tempfile::tempdir().unwrap();

    run_ledger(dir.path(), FIRST_RUN)
        .failure()
        .stderr(predicate::str::contains("Registry file not found"));

    assert!(!dir.path().join(LEDGER).exists());
    assert!(!dir.path().join("config.json").exists());
}

#[test]
fn test_closed_input_fails_without_saving() {
    let dir = data_folder();

    run_ledger(dir.path(), "\n\n2025-2026\nyes\n")
        .failure()
        .stderr(predicate::str::contains("Input closed"));

    assert!(!dir.path().join(LEDGER).exists());
}
