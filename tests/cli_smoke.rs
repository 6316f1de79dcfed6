use assert_cmd::prelude::*;
use std::process::Command;
use tempfile::tempdir;

fn stat_cards() -> Command {
    let mut cmd = Command::cargo_bin("stat-cards").unwrap();
    cmd.env_remove("ACCESS_TOKEN")
        .env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_ACTOR")
        .env_remove("STATS_OUTPUT_DIR")
        .env_remove("STATS_UTC_OFFSET");
    cmd
}

#[test]
fn help_lists_cards_and_options() {
    let output = stat_cards().arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("commits"));
    assert!(stdout.contains("--utc-offset"));
    assert!(stdout.contains("--excluded-repos"));
}

#[test]
fn missing_token_fails_without_output() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("cards");

    let output = stat_cards()
        .args(["commits", "--username", "octocat", "--output"])
        .arg(&out)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("ACCESS_TOKEN is not defined"));
    assert!(!out.exists());
}

#[test]
fn invalid_offset_is_rejected() {
    let dir = tempdir().unwrap();

    let output = stat_cards()
        .args(["all", "--token", "t", "--utc-offset", "Mars/Olympus"])
        .arg("--output")
        .arg(dir.path().join("cards"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(!dir.path().join("cards").exists());
}
