//! Configuration loading from files and environment

use std::path::{Path, PathBuf};

use super::{
    types::{ConfigLayer, PepeConfig},
    ConfigError,
};

/// Load configuration from all sources with hierarchy
///
/// `explicit` is the file named on the command line, if any. Unlike the
/// global file it must exist.
///
/// # Errors
///
/// Returns error if:
/// - A config file cannot be read or is malformed TOML
/// - An environment variable holds an unparsable value
/// - The merged values fail validation
pub fn load_config(explicit: Option<&Path>) -> Result<PepeConfig, ConfigError> {
    let config = PepeConfig::default();

    let config = match global_config_path() {
        Some(path) if path.is_file() => config.merge(load_toml_file(&path)?),
        _ => config,
    };

    let config = match explicit {
        Some(path) => config.merge(load_toml_file(path)?),
        None => config,
    };

    let config = config.apply_env_vars()?;
    config.validate()?;

    tracing::debug!(url = %config.database.url, "configuration loaded");
    Ok(config)
}

/// Get path to global config file
#[must_use]
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "pepe")
        .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
}

/// Load a TOML file into a config layer
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML for
/// [`ConfigLayer`].
pub fn load_toml_file(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

impl PepeConfig {
    /// Apply `PEPE_*` environment variable overrides
    ///
    /// # Errors
    ///
    /// Returns error if environment variable values are invalid
    pub fn apply_env_vars(self) -> Result<Self, ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides using `lookup` in place of the process environment.
    ///
    /// # Errors
    ///
    /// Returns error if a looked-up value is invalid
    pub fn apply_env_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup("PEPE_DATABASE_URL") {
            self.database.url = value;
        }

        if let Some(value) = lookup("PEPE_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = value.trim().parse().map_err(|e| {
                ConfigError::invalid("PEPE_DATABASE_MAX_CONNECTIONS", format!("'{value}': {e}"))
            })?;
        }

        if let Some(value) = lookup("PEPE_FEATURES_DELETE_PET") {
            self.features.delete_pet = value.trim().parse().map_err(|e| {
                ConfigError::invalid("PEPE_FEATURES_DELETE_PET", format!("'{value}': {e}"))
            })?;
        }

        if let Some(value) = lookup("PEPE_LOG") {
            self.log.filter = value;
        }

        Ok(self)
    }
}
