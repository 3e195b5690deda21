//! Smoke tests for the armctl binary
//!
//! These exercise argument parsing and the profile store against an
//! isolated config file; nothing here talks to the network.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn armctl() -> Command {
    Command::cargo_bin("armctl").unwrap()
}

#[test]
fn help_lists_services() {
    armctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("managed-app"))
        .stdout(predicate::str::contains("redis-enterprise"))
        .stdout(predicate::str::contains("openshift"));
}

#[test]
fn version_prints() {
    armctl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("armctl"));
}

#[test]
fn profile_set_and_list_round_trip() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");

    armctl()
        .args([
            "--config-file",
            config.to_str().unwrap(),
            "profile",
            "set",
            "test",
            "--subscription-id",
            "00000000-0000-0000-0000-000000000000",
            "--tenant-id",
            "tenant-1",
            "--client-id",
            "client-1",
            "--client-secret",
            "secret-1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile 'test' saved."));

    // The secret must never appear in listing output.
    armctl()
        .args([
            "--config-file",
            config.to_str().unwrap(),
            "profile",
            "list",
            "-o",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"test\""))
        .stdout(predicate::str::contains("tenant-1"))
        .stdout(predicate::str::contains("secret-1").not());
}

#[test]
fn profile_remove_unknown_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");

    armctl()
        .args([
            "--config-file",
            config.to_str().unwrap(),
            "profile",
            "remove",
            "ghost",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn cluster_show_without_profile_explains_setup() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");

    // --config-file isolates the run from real profiles and env vars.
    armctl()
        .args([
            "--config-file",
            config.to_str().unwrap(),
            "redis-enterprise",
            "cluster",
            "show",
            "cache-1",
            "-g",
            "rg-1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("subscription_id"));
}

#[test]
fn database_create_rejects_bad_eviction_policy() {
    armctl()
        .args([
            "redis-enterprise",
            "database",
            "create",
            "--cluster",
            "cache-1",
            "-g",
            "rg-1",
            "--eviction-policy",
            "SometimesMaybe",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("eviction policy"));
}

#[test]
fn completions_generate() {
    armctl()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("armctl"));
}
