//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against a throwaway data
//! directory and verify outputs.

use std::path::Path;
use std::process::Command;
use std::thread::sleep;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Run a CLI command with `STUDYROOM_DATA_DIR` pointing at `data_dir`.
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "studyroom-cli", "--"])
        .args(args)
        .env("STUDYROOM_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_timer_lifecycle() {
    let dir = TempDir::new().unwrap();

    let (out, _, code) = run_cli(dir.path(), &["timer", "status"]);
    assert_eq!(code, 0);
    assert_eq!(json(&out)["state"], "IDLE");

    let (out, _, code) = run_cli(dir.path(), &["timer", "start"]);
    assert_eq!(code, 0);
    let snapshot = json(&out);
    assert_eq!(snapshot["state"], "RUNNING");
    assert_eq!(snapshot["phase"], "WORK");

    let (out, _, code) = run_cli(dir.path(), &["timer", "pause"]);
    assert_eq!(code, 0);
    assert_eq!(json(&out)["state"], "PAUSED");

    let (out, _, code) = run_cli(dir.path(), &["timer", "skip"]);
    assert_eq!(code, 0);
    let snapshot = json(&out);
    assert_eq!(snapshot["phase"], "SHORT_BREAK");
    assert_eq!(snapshot["completedSessions"], 1);

    let (out, _, code) = run_cli(dir.path(), &["timer", "reset"]);
    assert_eq!(code, 0);
    let snapshot = json(&out);
    assert_eq!(snapshot["state"], "IDLE");
    assert_eq!(snapshot["remainingTime"], 1500);
}

#[test]
fn test_timer_status_polling_keeps_wall_time() {
    let dir = TempDir::new().unwrap();

    let (_, _, code) = run_cli(dir.path(), &["timer", "start"]);
    assert_eq!(code, 0);
    let started = Instant::now();

    let mut remaining = 1500;
    let mut waited = 0;
    for _ in 0..4 {
        sleep(Duration::from_millis(1600));
        // The status call reads the clock no earlier than this.
        waited = started.elapsed().as_secs();
        let (out, _, code) = run_cli(dir.path(), &["timer", "status"]);
        assert_eq!(code, 0);
        remaining = json(&out)["remainingTime"].as_u64().unwrap();
    }

    let ticked = 1500 - remaining;
    assert!(
        ticked >= waited,
        "only {ticked} ticks after at least {waited}s"
    );
}

#[test]
fn test_timer_illegal_transition_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["timer", "pause"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error: Cannot pause when idle"));
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "pomodoro.work_duration", "50"]);
    assert_eq!(code, 0);
    let (out, _, code) = run_cli(dir.path(), &["config", "get", "pomodoro.work_duration"]);
    assert_eq!(code, 0);
    assert_eq!(out.trim(), "50");

    let (out, _, _) = run_cli(dir.path(), &["timer", "start"]);
    assert_eq!(json(&out)["remainingTime"], 3000);
}

#[test]
fn test_config_rejects_unknown_key_and_zero_duration() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key"));

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "pomodoro.work_duration", "0"]);
    assert_eq!(code, 1);
    let (out, _, _) = run_cli(dir.path(), &["config", "get", "pomodoro.work_duration"]);
    assert_eq!(out.trim(), "25");
}

#[test]
fn test_quiz_generate_and_grade_offline() {
    let dir = TempDir::new().unwrap();
    let content = dir.path().join("aula.html");
    std::fs::write(
        &content,
        "<p>A Constituição Federal é a lei fundamental do Brasil.</p>\n\
         <p>O Poder Legislativo é exercido pelo Congresso Nacional.</p>\n\
         <p>A Constituição foi promulgada em 1988 pela Assembleia Constituinte.</p>",
    )
    .unwrap();

    let (out, _, code) = run_cli(
        dir.path(),
        &[
            "quiz",
            "generate",
            "--file",
            content.to_str().unwrap(),
            "--kind",
            "true-false",
            "--count",
            "2",
            "--offline",
        ],
    );
    assert_eq!(code, 0);
    let quiz = json(&out);
    assert_eq!(quiz["title"], "aula");
    assert_eq!(quiz["questions"].as_array().unwrap().len(), 2);

    let quiz_file = dir.path().join("quiz.json");
    std::fs::write(&quiz_file, &out).unwrap();
    let (out, _, code) = run_cli(
        dir.path(),
        &[
            "quiz",
            "grade",
            "--file",
            quiz_file.to_str().unwrap(),
            "--answers",
            "0,1",
        ],
    );
    assert_eq!(code, 0);
    let result = json(&out);
    assert_eq!(result["score"], 50);
    assert_eq!(result["totalQuestions"], 2);
}

#[test]
fn test_plan_generate_show_complete_delete() {
    let dir = TempDir::new().unwrap();
    let topics = dir.path().join("topics.json");
    std::fs::write(
        &topics,
        r#"[
            {"id": "t1", "title": "Direito Constitucional", "estimatedHours": 2, "priority": "HIGH"},
            {"id": "t2", "title": "Português", "estimatedHours": 1, "priority": "LOW"}
        ]"#,
    )
    .unwrap();

    let (out, _, code) = run_cli(
        dir.path(),
        &[
            "plan",
            "generate",
            "--topics",
            topics.to_str().unwrap(),
            "--strategy",
            "light",
            "--user",
            "ana",
        ],
    );
    assert_eq!(code, 0);
    let plan = json(&out);
    assert_eq!(plan["userId"], "ana");
    let sessions = plan["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 3);
    let first = sessions[0]["id"].as_str().unwrap().to_string();

    let (out, _, code) = run_cli(
        dir.path(),
        &["plan", "complete", "--session", &first, "--user", "ana"],
    );
    assert_eq!(code, 0);
    assert_eq!(json(&out)["completedSessions"], 1);

    let (out, _, code) = run_cli(dir.path(), &["plan", "show", "--user", "ana"]);
    assert_eq!(code, 0);
    assert_eq!(json(&out)["progress"]["percentageComplete"], 33);

    let (_, _, code) = run_cli(dir.path(), &["plan", "delete", "--user", "ana"]);
    assert_eq!(code, 0);
    let (_, stderr, code) = run_cli(dir.path(), &["plan", "show", "--user", "ana"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no study plan for user ana"));
}
