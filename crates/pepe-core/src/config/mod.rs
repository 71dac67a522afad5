//! Configuration loading and management
//!
//! # Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config: `<config dir>/pepe/config.toml`
//! 3. Explicit file (`--config FILE`)
//! 4. Environment variables: `PEPE_*`
//!
//! # Example Config
//!
//! ```toml
//! [database]
//! url = "sqlite:pepe.db?mode=rwc"
//! max_connections = 5
//!
//! [features]
//! delete_pet = false
//!
//! [log]
//! filter = "info"
//! ```

mod error;
mod load;
mod merge;
mod types;
mod validate;

#[cfg(test)]
mod tests_loading;

pub use error::ConfigError;
pub use load::{global_config_path, load_config, load_toml_file};
pub use types::{
    ConfigLayer, DatabaseConfig, DatabaseLayer, FeatureConfig, FeatureLayer, LogConfig, LogLayer,
    PepeConfig,
};
