//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("contactsync").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("contactsync").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--cors-permissive"))
        .stdout(predicate::str::contains("--bind"));
}

#[test]
fn test_serve_without_credentials_fails_loudly() {
    let dir = std::env::temp_dir();
    let mut cmd = Command::cargo_bin("contactsync").unwrap();
    cmd.current_dir(dir).env_clear().arg("serve");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("PRIMARY_DB_USER"));
}

#[test]
fn test_check_rejects_invalid_port() {
    let dir = std::env::temp_dir();
    let mut cmd = Command::cargo_bin("contactsync").unwrap();
    cmd.current_dir(dir)
        .env_clear()
        .env("PRIMARY_DB_USER", "crm")
        .env("PRIMARY_DB_PASSWORD", "crm-pass")
        .env("PRIMARY_DB_NAME", "suitecrm")
        .env("PRIMARY_DB_PORT", "not-a-port")
        .arg("check");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("PRIMARY_DB_PORT"));
}
