#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn clientapi_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("clientapi"));
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("CLIENTS_FILE")
        .env_remove("LOG_LEVEL")
        .env_remove("HOST")
        .env_remove("PORT");
    cmd
}

#[test]
fn test_check_on_fresh_directory() {
    let temp = TempDir::new().unwrap();

    clientapi_cmd(&temp)
        .args(["--check", "--clients-file", "clients.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 clients in clients.json"));

    // Checking never creates the file
    assert!(!temp.path().join("clients.json").exists());
}

#[test]
fn test_check_counts_existing_records() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("data.json"),
        r#"{"clients": [
            {"id": "0b5a3a8e-64a4-4f3e-9d0b-0d6f1d1c2a77", "name": "A", "last_name": "B",
             "age": 1, "created_at": "2024-01-01T00:00:00Z"},
            {"id": "6f1c1a0e-8d1e-4d7b-9a55-3c1f2f7f4b11", "name": "C", "last_name": "D",
             "age": 2, "created_at": "2024-01-02T00:00:00Z"}
        ]}"#,
    )
    .unwrap();

    clientapi_cmd(&temp)
        .args(["--check", "--clients-file", "data.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 clients in data.json"));
}

#[test]
fn test_check_reads_path_from_config_file() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("clientapi.toml"),
        "clients_file = \"from-config.json\"\n",
    )
    .unwrap();

    clientapi_cmd(&temp)
        .arg("--check")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 clients in from-config.json"));
}

#[test]
fn test_check_fails_loudly_on_corrupt_store() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("clients.json"), "{ nope").unwrap();

    clientapi_cmd(&temp)
        .args(["--check", "--clients-file", "clients.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Corrupt store"));

    assert_eq!(
        fs::read_to_string(temp.path().join("clients.json")).unwrap(),
        "{ nope"
    );
}

#[test]
fn test_missing_config_file_fails() {
    let temp = TempDir::new().unwrap();

    clientapi_cmd(&temp)
        .args(["--check", "--config", "missing.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_print_config_template() {
    let temp = TempDir::new().unwrap();

    clientapi_cmd(&temp)
        .arg("--print-config-template")
        .assert()
        .success()
        .stdout(predicate::str::contains("clients_file"))
        .stdout(predicate::str::contains("port"));
}
