//! Integration tests for Settings loading with layered precedence.
//!
//! These tests only write local configs into temp directories; a global
//! config on the machine running them would sit underneath.

use std::fs;

use tempfile::TempDir;

use tspdraw::config::{local_config_path, Settings};
use tspdraw::domain::Region;

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        r#"
step_interval_ms = 250
seed = 9

[region]
width = 100
height = 50
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(dir.path())).unwrap();

    // Assert
    assert_eq!(settings.step_interval_ms, 250);
    assert_eq!(settings.seed, Some(9));
    assert_eq!(settings.region(), Region::new(0, 0, 100, 50));
}

#[test]
fn given_local_config_with_zero_interval_when_load_then_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "step_interval_ms = 0\n").unwrap();

    let result = Settings::load(Some(dir.path()));

    assert!(result.is_err());
}

#[test]
fn given_malformed_local_config_when_load_then_error_names_file() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "step_interval_ms = \"fast\"\n").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(err.to_string().contains(".tspdraw.toml"), "{err}");
}

#[test]
fn given_no_local_config_when_write_template_then_created_and_loadable() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = local_config_path(&dir.path().join("nested"));

    // Act
    Settings::write_template(&path).unwrap();

    // Assert
    assert!(path.exists());
    let settings = Settings::load(path.parent()).unwrap();
    assert!(settings.step_interval_ms > 0);
}

#[test]
fn given_existing_config_when_write_template_then_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = local_config_path(dir.path());
    fs::write(&path, "seed = 1\n").unwrap();

    let result = Settings::write_template(&path);

    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), "seed = 1\n");
}

#[test]
fn given_settings_when_rendered_as_toml_then_round_trips() {
    let settings = Settings {
        seed: Some(3),
        ..Default::default()
    };

    let text = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&text).unwrap();

    assert_eq!(parsed, settings);
}
