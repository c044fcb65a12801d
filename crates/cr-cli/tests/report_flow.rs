//! End-to-end tests for the `calreport` binary.
//!
//! Each test runs the real binary against a JSON Lines event file in a
//! temporary HOME, so no user configuration leaks in.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn calreport_binary() -> String {
    env!("CARGO_BIN_EXE_calreport").to_string()
}

/// A week of events: a Monday holiday, a meeting on that holiday,
/// and overlapping focus and meeting blocks on Tuesday.
const HOLIDAY_WEEK: &str = r#"{"subject":"Day off","start":"2024-01-15T00:00:00","end":"2024-01-16T00:00:00","categories":"Holiday/Vacation","busy_status":"free"}
{"subject":"Planning","start":"2024-01-15T10:00:00","end":"2024-01-15T11:00:00","categories":"Collaboration"}
{"subject":"Deep work","start":"2024-01-16T10:00:00","end":"2024-01-16T11:00:00","categories":"Focus Time"}
{"subject":"Sync","start":"2024-01-16T18:30:00Z","end":"2024-01-16T19:30:00Z","categories":"Work Meeting"}
{"subject":"Sync","start":"2024-01-16T10:30:00","end":"2024-01-16T11:30:00","categories":"Work Meeting"}
{"subject":"Lunch","start":"2024-01-16T12:00:00","end":"2024-01-16T13:00:00","busy_status":"free"}
{"subject":"Moved","start":"2024-01-17T14:00:00","end":"2024-01-17T15:00:00","cancelled":true}
not json at all
"#;

fn write_events(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("events.jsonl");
    std::fs::write(&path, contents).unwrap();
    path
}

fn calreport(home: &Path) -> Command {
    let mut cmd = Command::new(calreport_binary());
    cmd.env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("RUST_LOG")
        .stdin(Stdio::null());
    cmd
}

fn run_report(home: &Path, extra: &[&str]) -> Output {
    let events = write_events(home, HOLIDAY_WEEK);
    calreport(home)
        .arg("report")
        .arg("--events")
        .arg(&events)
        .args(["--start", "2024-01-15", "--end", "2024-01-19"])
        .args(extra)
        .output()
        .expect("failed to run calreport report")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "calreport should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_report_week_with_holiday() {
    let temp = TempDir::new().unwrap();
    let out = stdout(&run_report(temp.path(), &[]));

    assert!(out.contains("===== Markdown Format ====="));
    assert!(out.contains("Date range: 2024-01-15 to 2024-01-19"));
    assert!(out.contains("Events analyzed: 4"));
    assert!(out.contains("Total planned meeting time (raw): 2.00 h"));
    assert!(out.contains("Busy time (union): 1.50 h"));
    assert!(out.contains("Work hours reduced by holidays: 8.00 h"));
    assert!(out.contains("Adjusted total work hours: 34.00 h"));
    assert!(out.contains("Free time remaining: 32.50 h"));
    assert!(out.contains("| Focus Time | 12-15 hours | 1.00 | 14.00 | Below min |"));
    assert!(out.contains("| Holiday/Vacation |  | 8.00 |  |  |"));
    assert!(out.contains("===== Weekly Calendar Usage Report ====="));
    assert!(!out.contains("DEBUG"));
}

#[test]
fn test_report_json() {
    let temp = TempDir::new().unwrap();
    let out = stdout(&run_report(temp.path(), &["--json"]));

    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["events_analyzed"], 4);
    assert_eq!(value["busy_hours_total"], 1.5);
    assert_eq!(value["holiday_reduction_hours"], 8.0);
    assert_eq!(value["adjusted_work_hours_total"], 34.0);
    assert_eq!(value["free_hours"], 32.5);
    assert_eq!(value["per_category_hours"]["Work Meeting"], 1.0);
    assert_eq!(value["per_category_status"]["Focus Time"], "below_min");
    assert_eq!(value["per_category_hours"]["Communication"], 0.0);
    assert_eq!(value["per_category_status"]["Communication"], "ok");
}

#[test]
fn test_report_verbose_lists_events() {
    let temp = TempDir::new().unwrap();
    let out = stdout(&run_report(temp.path(), &["--verbose"]));

    assert!(out.contains("#### Weekly Calendar Usage Report (debug)"));
    assert!(out.contains("===== DEBUG: All calendar items (processed) ====="));
    assert!(out.contains("Day off [ALL-DAY HOLIDAY/VACATION]"));
    assert!(out.contains("Planning [FILTERED]"));
    assert!(out.contains(r#"Sync (unrecognized label "Work Meeting")"#));
    assert!(out.contains(
        "Skipped: 0 malformed, 1 unreadable, 1 cancelled, 1 free, 0 out of range, 1 duplicate"
    ));
}

#[test]
fn test_report_reads_stdin() {
    let temp = TempDir::new().unwrap();
    let mut child = calreport(temp.path())
        .args(["report", "--start", "2024-01-15", "--end", "2024-01-19"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(HOLIDAY_WEEK.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let out = stdout(&output);
    assert!(out.contains("Busy time (union): 1.50 h"));
}

#[test]
fn test_start_alone_selects_work_week() {
    let temp = TempDir::new().unwrap();
    let events = write_events(temp.path(), HOLIDAY_WEEK);
    let output = calreport(temp.path())
        .arg("report")
        .arg("--events")
        .arg(&events)
        .args(["--start", "2024-01-17"])
        .output()
        .unwrap();

    let out = stdout(&output);
    assert!(out.contains("Date range: 2024-01-15 to 2024-01-19"));
}

#[test]
fn test_end_without_start_fails() {
    let temp = TempDir::new().unwrap();
    let output = calreport(temp.path())
        .args(["report", "--end", "2024-01-19"])
        .output()
        .unwrap();

    assert!(!output.status.success());
}

#[test]
fn test_end_before_start_fails() {
    let temp = TempDir::new().unwrap();
    let events = write_events(temp.path(), "");
    let output = calreport(temp.path())
        .arg("report")
        .arg("--events")
        .arg(&events)
        .args(["--start", "2024-01-19", "--end", "2024-01-15"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot precede"), "stderr: {stderr}");
}

#[test]
fn test_config_file_changes_calendar_and_budgets() {
    let temp = TempDir::new().unwrap();
    let events = write_events(temp.path(), HOLIDAY_WEEK);
    let config_path = temp.path().join("calreport.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
events_path = "{}"

[calendar.monday]
start_hour = 9
duration_hours = 4

[budgets."Focus Time"]
min = 0
warn = 0.5
max = 0.75
"#,
            events.display()
        ),
    )
    .unwrap();

    let output = calreport(temp.path())
        .arg("--config")
        .arg(&config_path)
        .args(["report", "--start", "2024-01-15", "--end", "2024-01-19"])
        .output()
        .unwrap();

    let out = stdout(&output);
    assert!(out.contains("Work hours reduced by holidays: 4.00 h"));
    assert!(out.contains("Adjusted total work hours: 34.00 h"));
    assert!(out.contains("| Focus Time | <= 0.75 hours | 1.00 | -0.25 | Exceeded |"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("calreport.toml");
    std::fs::write(
        &config_path,
        "[budgets.\"Unavailable\"]\nmin = 3\nwarn = 2\nmax = 6\n",
    )
    .unwrap();

    let output = calreport(temp.path())
        .arg("--config")
        .arg(&config_path)
        .arg("config")
        .output()
        .unwrap();

    assert!(!output.status.success());
}

#[test]
fn test_config_command_prints_defaults() {
    let temp = TempDir::new().unwrap();
    let output = calreport(temp.path()).arg("config").output().unwrap();

    let out = stdout(&output);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["timezone"], "America/Los_Angeles");
    assert_eq!(value["calendar"]["monday"]["duration_hours"], 8);
    assert_eq!(value["budgets"]["Focus Time"]["max"], 15.0);
}
