use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// The binary run in an empty directory with no credentials in the environment
fn isolated(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("issuescout").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .env_remove("ASTRA_DB_API_ENDPOINT")
        .env_remove("ASTRA_DB_APPLICATION_TOKEN")
        .env_remove("ASTRA_DB_KEYSPACE")
        .env_remove("MISTRAL_API_KEY")
        .env_remove("ISSUESCOUT_LOG_LEVEL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_flags() {
    Command::cargo_bin("issuescout")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--no-update"))
        .stdout(predicate::str::contains("--notes"))
        .stdout(predicate::str::contains("ask"));
}

#[test]
fn test_config_prints_example() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[vector_store]"))
        .stdout(predicate::str::contains("nomic-embed-text"));
}

#[test]
fn test_missing_credentials_fail_fast() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["--no-update", "ask", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ASTRA_DB_API_ENDPOINT is not set"));
}

#[test]
fn test_missing_explicit_config_file() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["--config", "absent.toml", "ask", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_broken_config_on_search_path_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("issuescout.toml"), "[tracker\nowner = ").unwrap();

    isolated(&dir)
        .args(["--no-update", "ask", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Skipped config file"))
        .stderr(predicate::str::contains("issuescout.toml"))
        .stderr(predicate::str::contains("ASTRA_DB_API_ENDPOINT is not set"));
}
