//! Database schema definitions and initialization

use std::{str::FromStr, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use super::{StoreError, StoreResult};
use crate::config::DatabaseConfig;

/// Database schema as SQL string - executed once on init
///
/// `person_pets.pet_id` is unique on its own: a pet has at most one owner.
/// Deleting a person cascades to its links; deleting a linked pet is refused.
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS persons (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,
    address TEXT NOT NULL,
    UNIQUE (first_name, last_name)
);

CREATE TABLE IF NOT EXISTS pets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    age INTEGER NOT NULL CHECK (age BETWEEN 1 AND 199)
);

CREATE TABLE IF NOT EXISTS person_pets (
    person_id INTEGER NOT NULL REFERENCES persons(id) ON DELETE CASCADE,
    pet_id INTEGER NOT NULL UNIQUE REFERENCES pets(id) ON DELETE RESTRICT,
    position INTEGER NOT NULL,
    PRIMARY KEY (person_id, pet_id)
);

CREATE INDEX IF NOT EXISTS idx_person_pets_person ON person_pets(person_id, position);
CREATE INDEX IF NOT EXISTS idx_persons_last_name ON persons(last_name);
";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Create `SQLite` connection pool
///
/// In-memory databases live only as long as their connection, so they get a
/// single connection that is never recycled.
pub(crate) async fn create_connection_pool(config: &DatabaseConfig) -> StoreResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| StoreError::database(format!("Invalid database url '{}': {e}", config.url)))?
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    let pool_options = if is_in_memory(&config.url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
    };

    pool_options
        .connect_with(options)
        .await
        .map_err(|e| StoreError::database(format!("Failed to connect to database: {e}")))
}

/// Initialize database schema
pub(crate) async fn init_schema(pool: &SqlitePool) -> StoreResult<()> {
    sqlx::query(SCHEMA)
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| StoreError::database(format!("Failed to initialize schema: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite:file:pepe?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite:pepe.db?mode=rwc"));
    }
}
