//! End-to-end CLI scenarios (§8), driven against the built `covplan` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn header_line(mission_path: &Path) -> String {
    let content = fs::read_to_string(mission_path).expect("mission file should be readable");
    content.lines().next().unwrap_or_default().to_string()
}

#[test]
fn unit_square_single_agent_plans_successfully() {
    let out_dir = tempdir().unwrap();
    Command::cargo_bin("covplan")
        .unwrap()
        .args([
            fixture("unit_square_one_agent.txt").to_str().unwrap(),
            "--dim",
            "1",
            "--out-dir",
            out_dir.path().to_str().unwrap(),
        ])
        .assert()
        .success();

    let mission_path = out_dir.path().join("mission_0.txt");
    assert!(mission_path.exists());
    assert_eq!(header_line(&mission_path), "QGC WPL 110");
}

#[test]
fn square_with_central_hole_excludes_the_center_cell() {
    let out_dir = tempdir().unwrap();
    Command::cargo_bin("covplan")
        .unwrap()
        .args([
            fixture("square_with_hole.txt").to_str().unwrap(),
            "--dim",
            "1",
            "--out-dir",
            out_dir.path().to_str().unwrap(),
        ])
        .assert()
        .success();

    assert!(out_dir.path().join("mission_0.txt").exists());
}

#[test]
fn two_symmetric_agents_each_get_a_mission_file() {
    let out_dir = tempdir().unwrap();
    Command::cargo_bin("covplan")
        .unwrap()
        .args([
            fixture("two_agents_symmetric.txt").to_str().unwrap(),
            "--dim",
            "1",
            "--out-dir",
            out_dir.path().to_str().unwrap(),
        ])
        .assert()
        .success();

    assert!(out_dir.path().join("mission_0.txt").exists());
    assert!(out_dir.path().join("mission_1.txt").exists());
}

#[test]
fn mission_with_no_agent_starts_fails_before_writing_any_mission() {
    let out_dir = tempdir().unwrap();
    Command::cargo_bin("covplan")
        .unwrap()
        .args([
            fixture("no_agents.txt").to_str().unwrap(),
            "--dim",
            "1",
            "--out-dir",
            out_dir.path().to_str().unwrap(),
        ])
        .assert()
        .failure();

    assert!(!out_dir.path().join("mission_0.txt").exists());
}

#[test]
fn unsupported_waypoint_version_fails_fast_with_no_planning() {
    let out_dir = tempdir().unwrap();
    Command::cargo_bin("covplan")
        .unwrap()
        .args([
            fixture("unsupported_version.txt").to_str().unwrap(),
            "--out-dir",
            out_dir.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("109"));

    assert!(!out_dir.path().join("mission_0.txt").exists());
}

#[test]
fn missing_input_file_fails_with_an_io_error() {
    let out_dir = tempdir().unwrap();
    Command::cargo_bin("covplan")
        .unwrap()
        .args([
            "/nonexistent/path/to/mission.txt",
            "--out-dir",
            out_dir.path().to_str().unwrap(),
        ])
        .assert()
        .failure();
}
