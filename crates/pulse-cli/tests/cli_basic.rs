//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_pulse-cli"))
        .args(args)
        .env("PULSE_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter(|l| l.starts_with('{'))
        .map(|l| serde_json::from_str(l).expect("event line is JSON"))
        .collect()
}

#[test]
fn test_routine_list() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["routine", "list"]);
    assert_eq!(code, 0);
    let routines: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let ids: Vec<_> = routines
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["morning", "evening", "sleep"]);
}

#[test]
fn test_routine_show_unknown_id_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["routine", "show", "noon"]);
    assert_ne!(code, 0);
}

#[test]
fn test_routine_play_quick_auto_finishes() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &["routine", "play", "sleep", "--quick", "--auto", "--tick-ms", "5"],
    );
    assert_eq!(code, 0);
    let events = json_lines(&stdout);
    let kinds: Vec<_> = events.iter().map(|e| e["type"].as_str().unwrap()).collect();
    assert_eq!(kinds.first(), Some(&"sequence_started"));
    assert_eq!(kinds.iter().filter(|k| **k == "phase_entered").count(), 3);
    assert!(kinds.contains(&"sequence_finished"));
    assert_eq!(kinds.last(), Some(&"session_closed"));
}

#[test]
fn test_flow_show_is_deterministic_with_seed() {
    let dir = tempfile::tempdir().unwrap();
    let (code_a, a, _) = run_cli(dir.path(), &["flow", "--show", "--seed", "3", "--release", "hug"]);
    let (code_b, b, _) = run_cli(dir.path(), &["flow", "--show", "--seed", "3", "--release", "hug"]);
    assert_eq!(code_a, 0);
    assert_eq!(code_b, 0);
    assert_eq!(a, b);
    assert!(a.contains("Self-hug"));
}

#[test]
fn test_breathe_stops_after_cycles() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &["breathe", "--inhale", "1", "--hold", "0", "--exhale", "1", "--lead-in", "0", "--cycles", "2", "--tick-ms", "5"],
    );
    assert_eq!(code, 0);
    let events = json_lines(&stdout);
    assert_eq!(events.last().unwrap()["type"], "session_closed");
    let last_step = events
        .iter()
        .rev()
        .find(|e| e["type"] == "breath_step_changed")
        .unwrap();
    assert_eq!(last_step["cycles_completed"], 2);
}

#[test]
fn test_mood_set_get_and_insight() {
    let dir = tempfile::tempdir().unwrap();
    for (date, score) in [
        ("2025-01-06", "1"),
        ("2025-01-13", "2"),
        ("2025-01-07", "5"),
        ("2025-01-14", "4"),
        ("2025-01-08", "3"),
    ] {
        let (code, stdout, stderr) = run_cli(dir.path(), &["mood", "set", score, "--date", date]);
        assert_eq!(code, 0, "mood set failed: {stderr}");
        assert!(stdout.contains("mood_logged"));
    }

    let (code, stdout, _) = run_cli(dir.path(), &["mood", "get", "--date", "2025-01-07"]);
    assert_eq!(code, 0);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["score"], 5);

    let (code, stdout, _) = run_cli(dir.path(), &["mood", "insight"]);
    assert_eq!(code, 0);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["insight"]["weekday"], "Tue");
    assert!(value["message"].as_str().unwrap().contains("Tuesday"));
}

#[test]
fn test_mood_set_rejects_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["mood", "set", "6", "--date", "2025-01-06"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_mood_clear() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["mood", "set", "3", "--date", "2025-01-06"]);
    let (code, stdout, _) = run_cli(dir.path(), &["mood", "clear", "--date", "2025-01-06"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("mood_cleared"));
    let (_, stdout, _) = run_cli(dir.path(), &["mood", "list"]);
    assert_eq!(stdout.trim(), "{}");
}

#[test]
fn test_mood_calendar_json() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["mood", "set", "2", "--date", "2025-01-06"]);
    let (code, stdout, _) = run_cli(dir.path(), &["mood", "calendar", "--month", "2025-01", "--json"]);
    assert_eq!(code, 0);
    let grid: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(grid["title"], "January 2025");
    assert_eq!(grid["leading_blanks"], 2);
    assert_eq!(grid["days"][5]["mood"], 2);
}

#[test]
fn test_sound_toggle_and_status() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["sound", "play", "rain"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("sound_started"));

    let (_, stdout, _) = run_cli(dir.path(), &["sound", "status"]);
    let status: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(status["current"]["id"], "rain");

    let (_, stdout, _) = run_cli(dir.path(), &["sound", "play", "rain"]);
    assert!(stdout.contains("sound_stopped"));

    let (_, stdout, _) = run_cli(dir.path(), &["sound", "random", "--seed", "1"]);
    let event: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_ne!(event["sound_id"], "rain");
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "breathing.exhale"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "6");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "breathing.exhale", "8"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "breathing.exhale"]);
    assert_eq!(stdout.trim(), "8");

    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "breathing.nope", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_affirmation_and_completions() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["affirmation", "--seed", "4"]);
    assert_eq!(code, 0);
    assert!(!stdout.trim().is_empty());

    let (code, stdout, _) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("pulse-cli"));
}

#[test]
fn test_article_list_and_show() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["article", "list"]);
    assert_eq!(code, 0);
    let cards: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(cards.as_array().unwrap().len(), 3);
    assert_eq!(cards[0]["id"], 1);

    let (code, stdout, _) = run_cli(dir.path(), &["article", "show", "2"]);
    assert_eq!(code, 0);
    let article: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(article["paragraphs"].as_array().unwrap().len(), 3);
    assert_eq!(article["sources"][0]["label"], "Mayo Clinic");

    let (code, _, stderr) = run_cli(dir.path(), &["article", "show", "9"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown article '9'"));
}
