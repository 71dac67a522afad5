#![allow(dead_code)]

use std::path::Path;

use chrono::NaiveDate;
use pepe_core::{
    AssociationManager, DatabaseConfig, FeatureConfig, NewPerson, NewPet, PersonId,
    PersonService, PetId, PetService, SqliteStore,
};

pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// All three services over one database.
pub struct Harness {
    pub persons: PersonService<SqliteStore>,
    pub pets: PetService<SqliteStore>,
    pub links: AssociationManager<SqliteStore>,
}

impl Harness {
    pub async fn new() -> TestResult<Self> {
        Self::with_features(FeatureConfig::default()).await
    }

    pub async fn with_features(features: FeatureConfig) -> TestResult<Self> {
        Self::over(&DatabaseConfig::in_memory(), features).await
    }

    /// A database file in `dir` behind a pool of several connections.
    pub async fn on_file(dir: &Path) -> TestResult<Self> {
        let config = DatabaseConfig {
            url: format!("sqlite:{}?mode=rwc", dir.join("pepe.db").display()),
            max_connections: 5,
        };
        Self::over(&config, FeatureConfig::default()).await
    }

    async fn over(config: &DatabaseConfig, features: FeatureConfig) -> TestResult<Self> {
        let store = SqliteStore::open(config).await?;
        Ok(Self {
            persons: PersonService::new(store.clone()),
            pets: PetService::new(store.clone(), features),
            links: AssociationManager::new(store),
        })
    }

    pub async fn person(&self, first: &str, last: &str) -> TestResult<PersonId> {
        let birth = NaiveDate::from_ymd_opt(1980, 6, 18).ok_or("bad date")?;
        let person = NewPerson::new(first, last, birth, "Kalverhoeve 41, 3992 NX Houten")?;
        Ok(self.persons.create_person(person).await?)
    }

    pub async fn pet(&self, name: &str, age: i64) -> TestResult<PetId> {
        Ok(self.pets.create_pet(NewPet::new(name, age)?).await?)
    }
}
