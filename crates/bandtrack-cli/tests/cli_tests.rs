//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `bandtrack` command isolated in `dir`: state, config search and HOME
/// all point inside it.
fn bandtrack(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("bandtrack").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("BANDTRACK_DATA_DIR", dir.path().join("data"))
        .env_remove("RUST_LOG");
    cmd
}

fn score_b5_t1(dir: &TempDir) {
    bandtrack(dir)
        .args([
            "score",
            "b5-t1",
            "--listening",
            "31",
            "--reading",
            "35",
            "--task1",
            "6",
            "--task2",
            "7",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved B5T1: overall 7.0"))
        .stdout(predicate::str::contains("writing 6.5"));
}

#[test]
fn status_on_fresh_data() {
    let dir = TempDir::new().unwrap();
    bandtrack(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress: 0/64 tests"))
        .stdout(predicate::str::contains("Next up: Book 5 Test 1 (b5-t1)"))
        .stdout(predicate::str::contains("Estimated finish: Mon 01 Jun 2026"));
}

#[test]
fn score_updates_book_detail() {
    let dir = TempDir::new().unwrap();
    score_b5_t1(&dir);

    bandtrack(&dir)
        .args(["books", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Book 5 (1/4 completed)"))
        .stdout(predicate::str::contains("7.0"));
}

#[test]
fn score_is_persisted_to_the_data_dir() {
    let dir = TempDir::new().unwrap();
    score_b5_t1(&dir);

    let blob = std::fs::read_to_string(dir.path().join("data/ielts_tracker_data_v4.json")).unwrap();
    let state: serde_json::Value = serde_json::from_str(&blob).unwrap();
    let first = &state["records"][0];
    assert_eq!(first["id"], "b5-t1");
    assert_eq!(first["isCompleted"], true);
    assert_eq!(first["calculatedBand"]["overall"], 7.0);
}

#[test]
fn score_rejects_out_of_range_raw() {
    let dir = TempDir::new().unwrap();
    bandtrack(&dir)
        .args([
            "score",
            "b5-t1",
            "--listening",
            "41",
            "--reading",
            "35",
            "--task1",
            "6",
            "--task2",
            "7",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("listening raw score"));
}

#[test]
fn score_rejects_unknown_record_and_bad_id() {
    let dir = TempDir::new().unwrap();
    let scores = ["--listening", "30", "--reading", "30", "--task1", "6", "--task2", "6"];

    bandtrack(&dir)
        .args(["score", "b99-t1"])
        .args(scores)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no test record with id 'b99-t1'"));

    bandtrack(&dir)
        .args(["score", "book5"])
        .args(scores)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot use 'book5' as a test id"));
}

#[test]
fn resolve_toggles() {
    let dir = TempDir::new().unwrap();
    bandtrack(&dir)
        .args(["resolve", "b6-t2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("B6T2 marked as resolved"));
    bandtrack(&dir)
        .args(["resolve", "b6-t2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("B6T2 marked as not resolved"));
}

#[test]
fn export_reset_import_round_trip() {
    let dir = TempDir::new().unwrap();
    score_b5_t1(&dir);
    let backup = dir.path().join("backup.json");

    bandtrack(&dir)
        .arg("export")
        .arg("--output")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 64 records"));

    bandtrack(&dir)
        .args(["reset", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All progress erased"));
    bandtrack(&dir)
        .arg("status")
        .assert()
        .stdout(predicate::str::contains("Progress: 0/64 tests"));

    bandtrack(&dir)
        .arg("import")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 64 records (1 completed)"))
        .stdout(predicate::str::contains("Mon 05 Jan 2026"));
    bandtrack(&dir)
        .arg("status")
        .assert()
        .stdout(predicate::str::contains("Progress: 1/64 tests"));
}

#[test]
fn export_uses_dated_default_name() {
    let dir = TempDir::new().unwrap();
    bandtrack(&dir).arg("export").assert().success();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(names
        .iter()
        .any(|n| n.starts_with("ielts_tracker_backup_") && n.ends_with(".json")));
}

#[test]
fn import_rejects_backup_without_records() {
    let dir = TempDir::new().unwrap();
    score_b5_t1(&dir);
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, r#"{"startDate": "2026-01-05T00:00:00Z"}"#).unwrap();

    bandtrack(&dir)
        .arg("import")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing records array"));

    bandtrack(&dir)
        .arg("status")
        .assert()
        .stdout(predicate::str::contains("Progress: 1/64 tests"));
}

#[test]
fn reset_without_confirmation_keeps_progress() {
    let dir = TempDir::new().unwrap();
    score_b5_t1(&dir);

    bandtrack(&dir)
        .arg("reset")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reset cancelled."));

    bandtrack(&dir)
        .arg("status")
        .assert()
        .stdout(predicate::str::contains("Progress: 1/64 tests"));
}

#[test]
fn bare_command_reopens_last_view() {
    let dir = TempDir::new().unwrap();

    bandtrack(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Library"));

    bandtrack(&dir).args(["books", "7"]).assert().success();
    bandtrack(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Book 7 (0/4 completed)"));

    bandtrack(&dir).arg("stats").assert().success();
    bandtrack(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No completed tests yet."));
}

#[test]
fn books_rejects_book_outside_library() {
    let dir = TempDir::new().unwrap();
    bandtrack(&dir)
        .args(["books", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("book 4 is outside the library"));
}

#[test]
fn schedule_lists_pending_tests() {
    let dir = TempDir::new().unwrap();
    score_b5_t1(&dir);

    bandtrack(&dir)
        .arg("schedule")
        .assert()
        .success()
        .stdout(predicate::str::contains("b5-t2"))
        .stdout(predicate::str::contains("Mon 01 Jun 2026"))
        .stdout(predicate::str::contains("b5-t1").not());

    bandtrack(&dir)
        .args(["schedule", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("b5-t1"));
}

#[test]
fn stats_shows_targets_after_a_test() {
    let dir = TempDir::new().unwrap();
    score_b5_t1(&dir);

    bandtrack(&dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Targets"))
        .stdout(predicate::str::contains("B5T1"))
        .stdout(predicate::str::contains("1 tests on 1 days"));
}

#[test]
fn report_writes_html() {
    let dir = TempDir::new().unwrap();
    score_b5_t1(&dir);
    let output = dir.path().join("out/report.html");

    bandtrack(&dir)
        .arg("report")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let html = std::fs::read_to_string(&output).unwrap();
    assert!(html.contains("<polyline"));
    assert!(html.contains("B5T1"));
}

#[test]
fn watch_stops_after_requested_ticks() {
    let dir = TempDir::new().unwrap();
    let assert = bandtrack(&dir)
        .args(["watch", "--ticks", "1"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.starts_with('['));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    bandtrack(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created bandtrack.toml"));
    assert!(dir.path().join("bandtrack.toml").exists());

    bandtrack(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn local_config_targets_are_used() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("bandtrack.toml"),
        "[targets]\nlistening = 7.0\n",
    )
    .unwrap();
    score_b5_t1(&dir);

    // listening 31 -> 7.0 meets the lowered target
    bandtrack(&dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("met"));
}

#[test]
fn missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    bandtrack(&dir)
        .args(["status", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}
