//! Configuration resolution tests
//!
//! Tests that manipulate DEEDLEAD_ROOT_FOLDER are marked #[serial] so they do
//! not race on the process environment.

use deedlead_common::config::{
    resolve_root_folder, RootFolderInitializer, ServerSettings, TomlConfig, DATABASE_FILE_NAME,
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

#[test]
fn test_toml_defaults_when_sections_missing() {
    let config = TomlConfig::from_toml_str("").unwrap();
    assert!(config.root_folder.is_none());
    assert!(config.port.is_none());
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.upload.max_bytes, DEFAULT_MAX_UPLOAD_BYTES);
}

#[test]
fn test_toml_full_document() {
    let config = TomlConfig::from_toml_str(
        r#"
        root_folder = "/srv/deedlead"
        host = "0.0.0.0"
        port = 8080

        [logging]
        level = "debug"

        [upload]
        max_bytes = 1024
        "#,
    )
    .unwrap();

    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/deedlead")));
    assert_eq!(config.host.as_deref(), Some("0.0.0.0"));
    assert_eq!(config.port, Some(8080));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.upload.max_bytes, 1024);
}

#[test]
fn test_toml_invalid_is_config_error() {
    let result = TomlConfig::from_toml_str("port = \"not a number\"");
    assert!(matches!(result, Err(deedlead_common::Error::Config(_))));
}

#[test]
fn test_load_explicit_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = TomlConfig::load(Some(&dir.path().join("absent.toml")));
    assert!(result.is_err());
}

#[test]
fn test_load_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = 6000\n").unwrap();

    let config = TomlConfig::load(Some(&path)).unwrap();
    assert_eq!(config.port, Some(6000));
}

#[test]
#[serial]
fn test_cli_argument_has_highest_priority() {
    env::set_var(ROOT_FOLDER_ENV, "/from/env");
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let resolved = resolve_root_folder(Some(Path::new("/from/cli")), &toml);
    assert_eq!(resolved, PathBuf::from("/from/cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/from/env");
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    assert_eq!(resolve_root_folder(None, &toml), PathBuf::from("/from/env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_then_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };
    assert_eq!(resolve_root_folder(None, &toml), PathBuf::from("/from/toml"));

    let fallback = resolve_root_folder(None, &TomlConfig::default());
    assert!(fallback.to_string_lossy().contains("deedlead"));
}

#[test]
fn test_root_folder_initializer_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("a").join("b");

    let initializer = RootFolderInitializer::new(root.clone());
    initializer.ensure_directory_exists().unwrap();

    assert!(root.is_dir());
    assert_eq!(initializer.database_path(), root.join(DATABASE_FILE_NAME));
}

#[test]
fn test_server_settings_priority() {
    let toml = TomlConfig {
        host: Some("0.0.0.0".to_string()),
        port: Some(7000),
        ..Default::default()
    };

    let from_toml = ServerSettings::resolve(None, None, &toml);
    assert_eq!(from_toml.bind_address(), "0.0.0.0:7000");

    let from_cli = ServerSettings::resolve(Some("127.0.0.1"), Some(7100), &toml);
    assert_eq!(from_cli.bind_address(), "127.0.0.1:7100");

    let defaults = ServerSettings::resolve(None, None, &TomlConfig::default());
    assert_eq!(defaults.port, DEFAULT_PORT);
    assert_eq!(defaults.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
}
