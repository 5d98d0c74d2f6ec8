use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn boxbreath(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("boxbreath").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("BOXBREATH_CONFIG")
        .env_remove("BOXBREATH_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn simulate_prints_stage_changes() {
    let home = TempDir::new().unwrap();
    boxbreath(&home)
        .args(["simulate", "--seconds", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Idle → Preparing"))
        .stdout(predicate::str::contains("Countdown → Running"))
        .stdout(predicate::str::contains("ended Running"));
}

#[test]
fn simulate_json_lines_parse() {
    let home = TempDir::new().unwrap();
    let output = boxbreath(&home)
        .args(["simulate", "--seconds", "10", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    let stages: Vec<&str> = events
        .iter()
        .filter(|e| e["event"] == "stage_changed")
        .map(|e| e["to"].as_str().unwrap())
        .collect();
    assert_eq!(stages, ["preparing", "countdown", "running"]);

    let last = events.last().unwrap();
    assert_eq!(last["snapshot"]["elapsed_ms"], 10_000);
}

#[test]
fn simulate_rejects_restart_without_stop() {
    let home = TempDir::new().unwrap();
    boxbreath(&home)
        .args(["simulate", "--seconds", "20", "--restart-at", "5"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--restart-at requires --stop-at"));
}

#[test]
fn simulate_rejects_bad_volume() {
    let home = TempDir::new().unwrap();
    boxbreath(&home)
        .args(["simulate", "--with-audio", "--volume", "3"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--volume"));
}

#[test]
fn config_path_defaults_to_home() {
    let home = TempDir::new().unwrap();
    boxbreath(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".boxbreath"))
        .stdout(predicate::str::contains("config.yaml"));
}

#[test]
fn config_show_reads_explicit_file() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("custom.yaml");
    std::fs::write(&path, "audio:\n  volume: 0.9\n  muted: true\n").unwrap();

    boxbreath(&home)
        .env("BOXBREATH_CONFIG", &path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.yaml"))
        .stdout(predicate::str::contains("volume: 0.9"))
        .stdout(predicate::str::contains("muted: true"));
}

#[test]
fn broken_config_fails_with_config_error() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("broken.yaml");
    std::fs::write(&path, "audio:\n  volume: 7\n").unwrap();

    boxbreath(&home)
        .args(["--config", path.to_str().unwrap(), "config", "show"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("audio.volume"));
}

#[test]
fn completions_for_bash() {
    let home = TempDir::new().unwrap();
    boxbreath(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_boxbreath"));
}
