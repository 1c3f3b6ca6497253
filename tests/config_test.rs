//! Integration tests for Settings loading from TOML files.
//!
//! These tests only use files in temporary directories, so the assertions
//! stick to values set by the explicit file. The environment layer is covered
//! in `config_env_test.rs`.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use guesser::application::ApplicationError;
use guesser::config::Settings;
use guesser::domain::{ParseLimits, WriteOptions, MAX_VALUE_LENGTH};

// ============================================================
// Settings::from_file()
// ============================================================

#[test]
fn given_partial_file_when_loading_then_unspecified_fields_default() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("guesser.toml");
    fs::write(&path, "indent = 2\ndatabase = \"animals.db\"\n").unwrap();

    // Act
    let settings = Settings::from_file(&path).expect("load settings");

    // Assert
    assert_eq!(settings.indent, 2);
    assert_eq!(settings.database, PathBuf::from("animals.db"));
    assert_eq!(settings.max_value_length, MAX_VALUE_LENGTH);
    assert_eq!(settings.write_options(), WriteOptions { indent: 2 });
}

#[test]
fn given_limits_in_file_when_loading_then_parse_limits_follow() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("guesser.toml");
    fs::write(&path, "max_value_length = 64\nmax_tree_depth = 12\n").unwrap();

    let settings = Settings::from_file(&path).unwrap();

    assert_eq!(
        settings.limits(),
        ParseLimits {
            max_value_length: 64,
            max_depth: 12,
        }
    );
}

#[test]
fn given_zero_limit_in_file_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("guesser.toml");
    fs::write(&path, "max_value_length = 0\n").unwrap();

    let result = Settings::from_file(&path);

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_malformed_toml_when_loading_then_config_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "indent = [").unwrap();

    let err = Settings::from_file(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn given_missing_file_when_loading_explicitly_then_config_error() {
    let dir = TempDir::new().unwrap();

    let result = Settings::load(Some(&dir.path().join("absent.toml")));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_settings_when_rendering_toml_then_reads_back_equal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("guesser.toml");
    let settings = Settings {
        indent: 3,
        ..Default::default()
    };

    fs::write(&path, settings.to_toml().unwrap()).unwrap();

    assert_eq!(Settings::from_file(&path).unwrap(), settings);
}
