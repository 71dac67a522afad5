//! Loading-focused tests for configuration

use std::{collections::HashMap, io::Write};

use serial_test::serial;

use super::{load_config, load_toml_file, ConfigError, DatabaseConfig, PepeConfig};

fn write_config(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    let written = std::fs::File::create(&path).and_then(|mut f| f.write_all(content.as_bytes()));
    assert!(written.is_ok(), "failed to write test config");
    path
}

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults() {
    let config = PepeConfig::default();
    assert_eq!(config.database.url, "sqlite:pepe.db?mode=rwc");
    assert_eq!(config.database.max_connections, 5);
    assert!(!config.features.delete_pet);
    assert_eq!(config.log.filter, "info");
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_file_keeps_other_defaults() -> Result<(), ConfigError> {
    let dir = tempfile::tempdir().map_err(|source| ConfigError::Io {
        path: std::env::temp_dir(),
        source,
    })?;
    let path = write_config(&dir, "[features]\ndelete_pet = true\n");

    let config = PepeConfig::default().merge(load_toml_file(&path)?);

    assert!(config.features.delete_pet);
    assert_eq!(config.database, DatabaseConfig::default());
    Ok(())
}

#[test]
fn test_later_file_overrides_with_default_values() -> Result<(), ConfigError> {
    let global_dir = tempfile::tempdir().map_err(|source| ConfigError::Io {
        path: std::env::temp_dir(),
        source,
    })?;
    let explicit_dir = tempfile::tempdir().map_err(|source| ConfigError::Io {
        path: std::env::temp_dir(),
        source,
    })?;
    let global = write_config(
        &global_dir,
        "[database]\nurl = \"sqlite:other.db\"\nmax_connections = 8\n\n[features]\ndelete_pet = true\n",
    );
    let explicit = write_config(
        &explicit_dir,
        "[database]\nurl = \"sqlite:pepe.db?mode=rwc\"\n\n[features]\ndelete_pet = false\n",
    );

    let config = PepeConfig::default()
        .merge(load_toml_file(&global)?)
        .merge(load_toml_file(&explicit)?);

    assert!(!config.features.delete_pet);
    assert_eq!(config.database.url, "sqlite:pepe.db?mode=rwc");
    assert_eq!(config.database.max_connections, 8);
    Ok(())
}

#[test]
fn test_empty_file_changes_nothing() -> Result<(), ConfigError> {
    let dir = tempfile::tempdir().map_err(|source| ConfigError::Io {
        path: std::env::temp_dir(),
        source,
    })?;
    let path = write_config(&dir, "");

    let mut base = PepeConfig::default();
    base.features.delete_pet = true;
    base.log.filter = "debug".to_string();

    assert_eq!(base.clone().merge(load_toml_file(&path)?), base);
    Ok(())
}

#[test]
fn test_malformed_toml_returns_parse_error() -> Result<(), ConfigError> {
    let dir = tempfile::tempdir().map_err(|source| ConfigError::Io {
        path: std::env::temp_dir(),
        source,
    })?;
    let path = write_config(&dir, "[database\nurl = ");

    let result = load_toml_file(&path);
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
    Ok(())
}

#[test]
fn test_missing_explicit_file_is_io_error() {
    let result = load_toml_file(std::path::Path::new("/nonexistent/pepe/config.toml"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_env_overrides_file_values() -> Result<(), ConfigError> {
    let config = PepeConfig::default().apply_env_from(env(&[
        ("PEPE_DATABASE_URL", "sqlite::memory:"),
        ("PEPE_DATABASE_MAX_CONNECTIONS", "1"),
        ("PEPE_FEATURES_DELETE_PET", "true"),
        ("PEPE_LOG", "pepe_core=debug"),
    ]))?;

    assert_eq!(config.database.url, "sqlite::memory:");
    assert_eq!(config.database.max_connections, 1);
    assert!(config.features.delete_pet);
    assert_eq!(config.log.filter, "pepe_core=debug");
    Ok(())
}

#[test]
fn test_env_can_switch_feature_off() -> Result<(), ConfigError> {
    let mut config = PepeConfig::default();
    config.features.delete_pet = true;

    let config = config.apply_env_from(env(&[("PEPE_FEATURES_DELETE_PET", "false")]))?;
    assert!(!config.features.delete_pet);
    Ok(())
}

#[test]
fn test_invalid_env_value_names_the_key() {
    let result =
        PepeConfig::default().apply_env_from(env(&[("PEPE_DATABASE_MAX_CONNECTIONS", "many")]));

    assert!(matches!(
        &result,
        Err(ConfigError::Invalid { key, .. }) if key == "PEPE_DATABASE_MAX_CONNECTIONS"
    ));
}

#[test]
fn test_validation_rejects_non_sqlite_url_and_zero_pool() {
    let mut config = PepeConfig::default();
    config.database.url = "postgres://localhost/pepe".to_string();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

    let mut config = PepeConfig::default();
    config.database.max_connections = 0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
}

#[test]
#[serial]
fn test_load_config_reads_process_environment() -> Result<(), ConfigError> {
    let dir = tempfile::tempdir().map_err(|source| ConfigError::Io {
        path: std::env::temp_dir(),
        source,
    })?;
    let path = write_config(&dir, "[database]\nurl = \"sqlite:from-file.db\"\n");

    std::env::set_var("PEPE_DATABASE_URL", "sqlite::memory:");
    let result = load_config(Some(&path));
    std::env::remove_var("PEPE_DATABASE_URL");

    assert_eq!(result?.database.url, "sqlite::memory:");
    Ok(())
}

#[test]
#[serial]
fn test_load_config_explicit_file_without_env() -> Result<(), ConfigError> {
    let dir = tempfile::tempdir().map_err(|source| ConfigError::Io {
        path: std::env::temp_dir(),
        source,
    })?;
    let path = write_config(&dir, "[database]\nurl = \"sqlite:from-file.db\"\n");

    std::env::remove_var("PEPE_DATABASE_URL");
    let config = load_config(Some(&path))?;

    assert_eq!(config.database.url, "sqlite:from-file.db");
    Ok(())
}
