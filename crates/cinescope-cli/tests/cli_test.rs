#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::path::Path;

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

fn cinescope(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("cinescope");
    cmd.arg("--dir")
        .arg(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .env_remove("CINESCOPE_CATALOG_API_KEY")
        .env_remove("CINESCOPE_ENRICHMENT_API_KEY");
    cmd
}

#[test]
fn test_help_lists_commands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinescope");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("watchlist"));
}

#[test]
fn test_discover_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinescope");
    cmd.args(["discover", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--min-rating"));
}

#[test]
fn test_trending_rejects_unknown_window() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinescope");
    cmd.args(["trending", "--window", "month"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--window"));
}

#[test]
fn test_missing_catalog_key_is_fatal() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    cinescope(dir.path())
        .args(["popular"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CINESCOPE_CATALOG_API_KEY"));
}

#[test]
fn test_missing_enrichment_key_is_fatal() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    cinescope(dir.path())
        .env("CINESCOPE_CATALOG_API_KEY", "catalog-key")
        .args(["search", "batman"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CINESCOPE_ENRICHMENT_API_KEY"));
}

#[test]
fn test_invalid_config_file_is_fatal() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[catalog\n").unwrap();

    // Act & Assert
    cinescope(dir.path())
        .args(["genres"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));
}

#[test]
fn test_watchlist_round_trip() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    cinescope(dir.path())
        .args([
            "watchlist",
            "add",
            "268",
            "--title",
            "Batman",
            "--release-date",
            "1989-06-23",
            "--priority",
            "high",
            "--rating",
            "8",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added movie-268"));

    cinescope(dir.path())
        .args(["watchlist", "add", "268", "--title", "Batman"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already on the watchlist"));

    cinescope(dir.path())
        .args(["watchlist", "add", "2098", "--tv", "--title", "Batman: The Animated Series"])
        .assert()
        .success();

    cinescope(dir.path())
        .args(["watchlist", "toggle", "movie-268"])
        .assert()
        .success()
        .stdout(predicate::str::contains("movie-268 marked as watched"));

    cinescope(dir.path())
        .args(["watchlist", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Batman: The Animated Series"))
        .stdout(predicate::str::contains("Total: 2 titles"));

    let saved = std::fs::read_to_string(dir.path().join("watchlist.toml")).unwrap();
    assert!(saved.contains("watched = true"));
    assert!(saved.contains("priority = \"high\""));

    cinescope(dir.path())
        .args(["watchlist", "remove", "tv-2098"])
        .assert()
        .success();

    cinescope(dir.path())
        .args(["watchlist", "remove", "tv-2098"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tv-2098 is not on the watchlist"));
}

#[test]
fn test_watchlist_list_empty() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    cinescope(dir.path())
        .args(["watchlist", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Watchlist is empty"));
}

#[test]
fn test_init_writes_default_config() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    // Act & Assert
    cinescope(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"))
        .stdout(predicate::str::contains("CINESCOPE_CATALOG_API_KEY"));

    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.contains("duration_ms = 300000"));
    assert!(saved.contains("[rate_limit.catalog]"));
    assert!(saved.contains("timeout_ms = 10000"));
}

#[test]
fn test_init_refuses_to_overwrite_without_force() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[catalog]\napi_key = \"keep-me\"\n").unwrap();

    // Act & Assert
    cinescope(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    assert!(std::fs::read_to_string(&path).unwrap().contains("keep-me"));

    cinescope(dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
    assert!(!std::fs::read_to_string(&path).unwrap().contains("keep-me"));
}
