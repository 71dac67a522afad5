//! Configuration merging
//!
//! Later layers override earlier ones. Only the fields a layer actually
//! names replace the value from `self`.

use super::types::{
    ConfigLayer, DatabaseConfig, DatabaseLayer, FeatureConfig, FeatureLayer, LogConfig, LogLayer,
    PepeConfig,
};

impl PepeConfig {
    /// Merge a file layer into this config (the layer takes precedence)
    #[must_use]
    pub fn merge(self, layer: ConfigLayer) -> Self {
        Self {
            database: self.database.merge(layer.database),
            features: self.features.merge(layer.features),
            log: self.log.merge(layer.log),
        }
    }
}

impl DatabaseConfig {
    fn merge(self, layer: DatabaseLayer) -> Self {
        Self {
            url: layer.url.unwrap_or(self.url),
            max_connections: layer.max_connections.unwrap_or(self.max_connections),
        }
    }
}

impl FeatureConfig {
    const fn merge(self, layer: FeatureLayer) -> Self {
        Self {
            delete_pet: match layer.delete_pet {
                Some(delete_pet) => delete_pet,
                None => self.delete_pet,
            },
        }
    }
}

impl LogConfig {
    fn merge(self, layer: LogLayer) -> Self {
        Self {
            filter: layer.filter.unwrap_or(self.filter),
        }
    }
}
