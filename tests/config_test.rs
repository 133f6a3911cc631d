//! Integration tests for Settings config loading.
//!
//! Note: these tests pass an explicit local config file, so they do not depend
//! on the working directory. A global config on the test machine would still be
//! merged underneath.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use rsenroll::config::{local_config_path, Settings, LOCAL_CONFIG_FILE};

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join(LOCAL_CONFIG_FILE);
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn given_local_config_with_institute_when_load_then_overrides_default() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "institute_name = \"Ferris Institute\"\n");

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.institute_name, "Ferris Institute");
}

#[test]
fn given_local_config_disabling_file_logging_when_load_then_no_record_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "file_logging = false\n");

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert!(settings.record_file().is_none());
}

#[test]
fn given_log_file_with_home_var_when_load_then_expands() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "log_file = \"$HOME/enroll/record.txt\"\n");

    let settings = Settings::load(Some(&path)).expect("load settings");

    let home = std::env::var("HOME").expect("HOME should be set");
    assert_eq!(
        settings.log_file,
        PathBuf::from(format!("{home}/enroll/record.txt"))
    );
}

#[test]
fn given_malformed_config_when_load_then_returns_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "institute_name = [unterminated\n");

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(err.to_string().starts_with("config error: parse"), "{err}");
}

#[test]
fn given_missing_explicit_config_when_load_then_returns_config_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let err = Settings::load(Some(&missing)).unwrap_err();

    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn given_directory_when_building_local_path_then_appends_file_name() {
    let dir = TempDir::new().unwrap();
    assert_eq!(
        local_config_path(dir.path()),
        dir.path().join(".rsenroll.toml")
    );
}
