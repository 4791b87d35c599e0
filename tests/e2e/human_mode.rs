//! Human-mode end-to-end tests.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::common::cli::CliRunner;
use crate::common::{init_test_logging, ranges_path};

fn dotstar() -> Command {
    let mut cmd = Command::cargo_bin("dotstar").expect("binary is built");
    cmd.env("RUST_LOG", "off").env("NO_COLOR", "1");
    cmd
}

#[test]
fn human_quick_start_lists_commands() {
    dotstar()
        .assert()
        .success()
        .stdout(predicate::str::contains("QUICK START"))
        .stdout(predicate::str::contains("dotstar off-all"))
        .stdout(predicate::str::contains("photon_ring"));
}

#[test]
fn human_dry_run_shows_request_line() {
    dotstar()
        .args(["color", "00ff00", "-g", "right", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY RUN"))
        .stdout(predicate::str::contains("POST /set_color"))
        .stdout(predicate::str::contains("group3"));
}

#[test]
fn human_invalid_color_fails_with_hint() {
    dotstar()
        .args(["color", "zzzzzz", "-g", "top"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("zzzzzz"));
}

#[test]
fn human_unknown_group_is_rejected() {
    dotstar()
        .args(["off", "-g", "attic", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("attic"));
}

#[test]
fn human_groups_output_is_not_json() {
    init_test_logging();
    let result = CliRunner::new().with_env("NO_COLOR", "1").run(&["groups"]);
    result
        .assert_success()
        .assert_stdout_contains("Shelf Top")
        .assert_stdout_contains("(no range)");

    assert!(
        serde_json::from_str::<serde_json::Value>(result.stdout.trim()).is_err(),
        "Human mode output should not be JSON"
    );
}

#[test]
fn human_range_show_uses_defaults() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let ranges = ranges_path(&dir);
    CliRunner::new()
        .with_env("NO_COLOR", "1")
        .run(&["--ranges", &ranges, "range", "show"])
        .assert_success()
        .assert_stdout_contains("Shelf Left")
        .assert_stdout_contains("109 - 130");
}

#[test]
fn human_range_set_requires_a_field() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let ranges = ranges_path(&dir);
    CliRunner::new()
        .run(&["--ranges", &ranges, "range", "set", "top"])
        .assert_failure()
        .assert_stderr_contains("--from");
}

#[test]
fn shell_reads_commands_from_stdin() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let ranges = ranges_path(&dir);
    let result = CliRunner::new()
        .with_env("NO_COLOR", "1")
        .with_stdin("help\ntoggle effects\nquit\n")
        .run(&["--ranges", &ranges, "--url", "http://127.0.0.1:9", "--timeout", "5", "shell"]);

    // The initial favorites fetch fails against a closed port; the shell carries on.
    result
        .assert_success()
        .assert_stdout_contains("range update <group>")
        .assert_stdout_contains("Effects collapsed");
}
