use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const FAMILY: &str = r##"[
  {"id": "11111111-1111-4111-8111-111111111111", "date": "1976-09-18T14:30:00", "text": "Brady was born (my brother)", "tags": ["brother"]},
  {"id": "22222222-2222-4222-8222-222222222222", "date": "1982-08-26T08:45:00", "text": "I was born in Rayne, Louisiana", "pinned": true},
  {"id": "33333333-3333-4333-8333-333333333333", "date": "2013-01-26T16:20:00", "text": "Married Kelly", "tags": ["@kelly", "wedding", "#start marriage"]},
  {"id": "44444444-4444-4444-8444-444444444444", "date": "2016-09-05T14:00:00", "text": "Evan was born", "pinned": true}
]"##;

fn fixture(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("events.json");
    fs::write(&path, contents).expect("write fixture");
    (dir, path)
}

fn contextime() -> Command {
    let mut cmd = Command::cargo_bin("contextime").expect("binary built");
    cmd.env_remove("CONTEXTIME_LOG_DIR");
    cmd
}

#[test]
fn search_unions_matches_with_pins() {
    let (_dir, path) = fixture(FAMILY);
    contextime()
        .arg(&path)
        .args(["search", "wedding", "+", "brother"])
        .assert()
        .success()
        .stdout(predicate::str::contains("brady was born (my brother)"))
        .stdout(predicate::str::contains("married kelly"))
        .stdout(predicate::str::contains("evan was born  (pinned)"))
        .stdout(predicate::str::contains("2 matching event(s)"));
}

#[test]
fn search_pins_only_requires_match() {
    let (_dir, path) = fixture(FAMILY);
    contextime()
        .arg(&path)
        .args(["search", "--pins-only", "born"])
        .assert()
        .success()
        .stdout(predicate::str::contains("i was born in rayne"))
        .stdout(predicate::str::contains("brady").not());
}

#[test]
fn upcoming_reports_anniversary_countdown() {
    let (_dir, path) = fixture(FAMILY);
    contextime()
        .arg(&path)
        .args(["upcoming", "--now", "2024-01-01T09:30"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "august 26 - i was born in rayne, louisiana (in 238 days it will be 42 years)",
        ));
}

#[test]
fn upcoming_rejects_unknown_sort_mode() {
    let (_dir, path) = fixture(FAMILY);
    contextime()
        .arg(&path)
        .args(["upcoming", "--sort", "sideways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sideways"));
}

#[test]
fn stats_prints_summary_and_pins() {
    let (_dir, path) = fixture(FAMILY);
    contextime()
        .arg(&path)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "4 events spanning 39 years (september 18, 1976 - september 5, 2016)",
        ))
        .stdout(predicate::str::contains("2 pinned"));
}

#[test]
fn suggest_tags_offers_duration_completion() {
    let (_dir, path) = fixture(FAMILY);
    contextime()
        .arg(&path)
        .args(["suggest", "--tags", "marr"])
        .assert()
        .success()
        .stdout(predicate::str::diff("#start marriage\n"));
    contextime()
        .arg(&path)
        .args(["suggest", "--tags", "#stop marr"])
        .assert()
        .success()
        .stdout(predicate::str::diff("#stop marriage\n"));
}

#[test]
fn timeline_inserts_today_and_labels() {
    let (_dir, path) = fixture(FAMILY);
    contextime()
        .arg(&path)
        .args(["timeline", "--now", "2016-01-01T12:00"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("-- History starts here --"))
        .stdout(predicate::str::contains(
            "-- Into the future --\njanuary 1, 2016 12:00 pm  today\nseptember 5, 2016 2:00 pm  evan was born",
        ));
}

#[test]
fn bad_rows_are_skipped_with_warning() {
    let (_dir, path) = fixture(
        r#"[
          {"date": "1982-08-26", "text": "i was born"},
          {"date": "someday", "text": "broken date"},
          {"date": 42, "text": "wrong type"}
        ]"#,
    );
    contextime()
        .arg(&path)
        .args(["--json", "search"])
        .assert()
        .success()
        .stdout(predicate::str::contains("i was born"))
        .stdout(predicate::str::contains("broken date").not())
        .stderr(predicate::str::contains("invalid_date"))
        .stderr(predicate::str::contains("skipping row 2"));
}

#[test]
fn missing_file_fails() {
    contextime()
        .args(["/definitely/not/here.json", "stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read events file"));
}
