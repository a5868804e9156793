//! End-to-end tests for the statcsv binary
//!
//! These tests run the compiled binary against table dumps in temporary
//! directories and validate:
//! - data, metadata and progress files
//! - stdin/stdout streaming
//! - output naming rules
//! - configuration through environment variables
//! - error reporting and exit codes

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TABLE: &str = concat!(
    r#"{"name":"visits","row_count":4,"columns":[{"name":"id","label":"ID"},{"name":"seen","label":"Seen, first"},{"name":"score","label":null}]}"#,
    "\n",
    r#"[1, {"date": "2016-03-09"}, 0.0000001]"#,
    "\n",
    r#"[2, {"datetime": "2016-03-10T00:00:00"}, 12.5]"#,
    "\n",
    r#"[3, {"datetime": "2016-03-11T09:30:15"}, null]"#,
    "\n",
    r#"[4, null, "n/a, \"unknown\""]"#,
    "\n",
);

const EXPECTED_DATA: &str = "id,seen,score\r\n\
    1,2016-03-09,0.0000001\r\n\
    2,2016-03-10,12.5\r\n\
    3,2016-03-11 09:30:15,\r\n\
    4,,\"n/a, \"\"unknown\"\"\"\r\n";

const EXPECTED_META: &str = "id,seen,score\r\nID,\"Seen, first\",\r\n";

fn write_table(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path.to_string_lossy().into_owned()
}

fn statcsv() -> Command {
    let mut cmd = Command::cargo_bin("statcsv").unwrap();
    cmd.env_remove("STATCSV_LINE_TERMINATOR")
        .env_remove("STATCSV_PROGRESS_MODE")
        .env_remove("LOG_OUTPUT")
        .env_remove("LOG_LEVEL")
        .env_remove("LOG_FORMAT");
    cmd
}

// ============================================================================
// File Output Tests
// ============================================================================

#[test]
fn test_convert_to_files() {
    let dir = TempDir::new().unwrap();
    let input = write_table(dir.path(), "visits.jsonl", TABLE);
    let output = dir.path().join("visits.csv");
    let metadata = dir.path().join("visits-meta.csv");
    let progress = dir.path().join("visits.progress");

    statcsv()
        .arg(&input)
        .arg(&output)
        .arg(&metadata)
        .arg(&progress)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(fs::read_to_string(&output).unwrap(), EXPECTED_DATA);
    assert_eq!(fs::read_to_string(&metadata).unwrap(), EXPECTED_META);
    assert_eq!(fs::read_to_string(&progress).unwrap(), "100");
}

#[test]
fn test_atomic_progress_mode() {
    let dir = TempDir::new().unwrap();
    let input = write_table(dir.path(), "visits.jsonl", TABLE);
    let progress = dir.path().join("progress");

    statcsv()
        .arg(&input)
        .arg(dir.path().join("out.csv"))
        .arg(dir.path().join("meta.csv"))
        .arg(&progress)
        .arg("--progress-mode")
        .arg("atomic")
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&progress).unwrap(), "100");
}

#[test]
fn test_output_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let input = write_table(dir.path(), "visits.jsonl", TABLE);

    for run in ["a", "b"] {
        statcsv()
            .arg(&input)
            .arg(dir.path().join(format!("{}.csv", run)))
            .arg(dir.path().join(format!("{}.meta.csv", run)))
            .assert()
            .success();
    }

    assert_eq!(
        fs::read(dir.path().join("a.csv")).unwrap(),
        fs::read(dir.path().join("b.csv")).unwrap()
    );
    assert_eq!(
        fs::read(dir.path().join("a.meta.csv")).unwrap(),
        fs::read(dir.path().join("b.meta.csv")).unwrap()
    );
}

// ============================================================================
// Streaming and Naming Tests
// ============================================================================

#[test]
fn test_stdout_output_with_derived_metadata() {
    let dir = TempDir::new().unwrap();
    let input = write_table(dir.path(), "visits.jsonl", TABLE);

    statcsv()
        .arg(&input)
        .assert()
        .success()
        .stdout(EXPECTED_DATA);

    assert_eq!(
        fs::read_to_string(dir.path().join("visits.meta.csv")).unwrap(),
        EXPECTED_META
    );
}

#[test]
fn test_stdin_input() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    let metadata = dir.path().join("meta.csv");

    statcsv()
        .arg("stdin")
        .arg(&output)
        .arg(&metadata)
        .write_stdin(TABLE)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&output).unwrap(), EXPECTED_DATA);
    assert_eq!(fs::read_to_string(&metadata).unwrap(), EXPECTED_META);
}

#[test]
fn test_auto_create_csv() {
    let dir = TempDir::new().unwrap();
    let input = write_table(dir.path(), "visits.jsonl", TABLE);

    statcsv()
        .arg(&input)
        .arg("--auto-create-csv")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(
        fs::read_to_string(dir.path().join("visits.csv")).unwrap(),
        EXPECTED_DATA
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("visits.meta.csv")).unwrap(),
        EXPECTED_META
    );
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn test_line_terminator_from_env() {
    let dir = TempDir::new().unwrap();
    let input = write_table(dir.path(), "visits.jsonl", TABLE);
    let metadata = dir.path().join("meta.csv");

    statcsv()
        .env("STATCSV_LINE_TERMINATOR", "lf")
        .arg(&input)
        .arg("stdout")
        .arg(&metadata)
        .assert()
        .success()
        .stdout(EXPECTED_DATA.replace("\r\n", "\n"));

    assert_eq!(
        fs::read_to_string(&metadata).unwrap(),
        EXPECTED_META.replace("\r\n", "\n")
    );
}

#[test]
fn test_flag_overrides_env() {
    let dir = TempDir::new().unwrap();
    let input = write_table(dir.path(), "visits.jsonl", TABLE);

    statcsv()
        .env("STATCSV_LINE_TERMINATOR", "lf")
        .arg(&input)
        .arg("stdout")
        .arg(dir.path().join("meta.csv"))
        .arg("--line-terminator")
        .arg("crlf")
        .assert()
        .success()
        .stdout(EXPECTED_DATA);
}

#[test]
fn test_invalid_env_value() {
    let dir = TempDir::new().unwrap();
    let input = write_table(dir.path(), "visits.jsonl", TABLE);

    statcsv()
        .env("STATCSV_PROGRESS_MODE", "append")
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("STATCSV_PROGRESS_MODE"));
}

#[test]
fn test_invalid_log_env_value() {
    let dir = TempDir::new().unwrap();
    let input = write_table(dir.path(), "visits.jsonl", TABLE);

    statcsv()
        .env("LOG_LEVEL", "chatty")
        .arg(&input)
        .arg("-v")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("LOG_LEVEL"));
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[test]
fn test_remote_location_rejected() {
    statcsv()
        .arg("gs://bucket/visits.sas7bdat")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unsupported location"));
}

#[test]
fn test_missing_input() {
    let dir = TempDir::new().unwrap();

    statcsv()
        .arg(dir.path().join("missing.jsonl"))
        .arg(dir.path().join("out.csv"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Cannot open"));
}

#[test]
fn test_input_is_never_overwritten() {
    let dir = TempDir::new().unwrap();
    let input = write_table(dir.path(), "visits.csv", TABLE);

    statcsv()
        .arg(&input)
        .arg("--auto-create-csv")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("is the input"));

    assert_eq!(fs::read_to_string(&input).unwrap(), TABLE);
}

#[test]
fn test_schema_violation() {
    let dir = TempDir::new().unwrap();
    let body = concat!(
        r#"{"name":"bad","row_count":2,"columns":[{"name":"a"},{"name":"b"}]}"#,
        "\n[1, 2]\n[3]\n",
    );
    let input = write_table(dir.path(), "bad.jsonl", body);

    statcsv()
        .arg(&input)
        .arg(dir.path().join("bad.csv"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Row 2 has 1 cells but the schema has 2 columns"));
}

#[test]
fn test_unsupported_cell() {
    let dir = TempDir::new().unwrap();
    let body = concat!(
        r#"{"name":"bad","row_count":1,"columns":[{"name":"flag"}]}"#,
        "\n[true]\n",
    );
    let input = write_table(dir.path(), "bad.jsonl", body);

    statcsv()
        .arg(&input)
        .arg(dir.path().join("bad.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported cell kind"));
}

#[test]
fn test_usage_error() {
    statcsv().assert().failure().code(2);
}
