use super::{types::PepeConfig, ConfigError};

impl PepeConfig {
    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if the database url is not a `SQLite` url, the pool
    /// size is zero, or the log filter is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.database.url.starts_with("sqlite:") {
            return Err(ConfigError::invalid(
                "database.url",
                format!("'{}' is not a sqlite: url", self.database.url),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::invalid(
                "database.max_connections",
                "must be at least 1",
            ));
        }

        if self.log.filter.trim().is_empty() {
            return Err(ConfigError::invalid("log.filter", "cannot be empty"));
        }

        Ok(())
    }
}
