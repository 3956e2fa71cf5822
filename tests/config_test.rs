//! Settings loading with layered precedence.
//!
//! These tests only use explicit config files in temp directories; the
//! environment layer is covered in `config_env_test.rs` so that no test here
//! races with a process-wide variable.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;

use dragtree::application::ApplicationError;
use dragtree::config::{Settings, DEFAULT_EXPAND_DELAY_MS};
use dragtree::domain::{Color, DEFAULT_INDENT_PER_LEVEL};

#[test]
fn given_no_files_when_using_defaults_then_matches_documented_values() {
    // Act
    let settings = Settings::default();

    // Assert
    assert_eq!(settings.indent_per_level, DEFAULT_INDENT_PER_LEVEL);
    assert_eq!(settings.expand_delay(), Duration::from_millis(DEFAULT_EXPAND_DELAY_MS));
    assert_eq!(settings.default_color, Color::Gray);
    assert_eq!(settings.seed_file, None);
}

#[test]
fn given_partial_config_file_when_loading_then_overrides_only_given_keys() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dragtree.toml");
    fs::write(&path, "expand_delay_ms = 750\ndefault_color = \"indigo\"\n").unwrap();

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(settings.expand_delay_ms, 750);
    assert_eq!(settings.default_color, Color::Indigo);
    assert_eq!(settings.indent_per_level, DEFAULT_INDENT_PER_LEVEL);
}

#[test]
fn given_seed_path_with_variable_when_loading_then_is_expanded() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dragtree.toml");
    fs::write(&path, "seed_file = \"$CARGO_MANIFEST_DIR/tests/resources/seed.toml\"\n").unwrap();

    // Act
    let settings = Settings::load(Some(&path)).unwrap();

    // Assert
    let expected = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/resources/seed.toml");
    assert_eq!(settings.seed_file, Some(expected));
}

#[test]
fn given_invalid_toml_when_loading_then_config_error() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dragtree.toml");
    fs::write(&path, "expand_delay_ms = \"soon\"\n").unwrap();

    // Act
    let err = Settings::load(Some(&path)).unwrap_err();

    // Assert
    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_missing_explicit_file_when_loading_then_config_error() {
    let temp = TempDir::new().unwrap();
    let err = Settings::load(Some(&temp.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_settings_when_rendering_toml_then_round_trips() {
    // Arrange
    let settings = Settings {
        expand_delay_ms: 42,
        ..Settings::default()
    };

    // Act
    let text = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&text).unwrap();

    // Assert
    assert_eq!(parsed, settings);
}
