//! Entity Store seam.
//!
//! # Repository Pattern
//!
//! The services depend on the [`EntityStore`] / [`StoreTx`] traits, not on
//! `SQLite`. Every service operation runs inside exactly one transaction:
//!
//! 1. [`EntityStore::begin`]
//! 2. point lookups, scans and writes on the [`StoreTx`]
//! 3. [`StoreTx::commit`] on success, [`StoreTx::rollback`] on any error
//!
//! A transaction dropped without commit rolls back.
//!
//! # Error Conditions
//!
//! - `IntegrityViolation`: a unique, foreign-key, check or not-null
//!   constraint rejected a write. Raised at the write that violates it
//!   (`insert_*`, `save_and_flush_*`, `delete_*`).
//! - `Database`: anything else (connection lost, malformed row, I/O).
//!
//! The store is the authority on constraints. Transactions are serialized,
//! so of two writers racing for the same link the later one sees the
//! earlier one's link in its pre-check, or gets `IntegrityViolation`.

mod rows;
mod schema;
mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

pub use schema::SCHEMA;
pub use sqlite::{SqliteStore, SqliteTx};

use crate::domain::{
    NewPerson, NewPet, Person, PersonAggregate, PersonId, PersonPetLink, PersonPredicate, Pet,
    PetId,
};

/// Errors raised by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A constraint rejected the write.
    #[error("integrity violation: {0}")]
    IntegrityViolation(String),

    /// Any other storage failure.
    #[error("database error: {0}")]
    Database(String),
}

impl StoreError {
    #[must_use]
    pub fn integrity_violation(reason: impl Into<String>) -> Self {
        Self::IntegrityViolation(reason.into())
    }

    #[must_use]
    pub fn database(reason: impl Into<String>) -> Self {
        Self::Database(reason.into())
    }

    /// Classify a `sqlx` error, prefixing it with what was being attempted.
    #[must_use]
    pub fn from_sqlx(context: &str, err: &sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) if is_constraint(db.kind()) => {
                Self::IntegrityViolation(format!("{context}: {db}"))
            }
            other => Self::Database(format!("{context}: {other}")),
        }
    }

    #[must_use]
    pub const fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::IntegrityViolation(_))
    }
}

const fn is_constraint(kind: sqlx::error::ErrorKind) -> bool {
    matches!(
        kind,
        sqlx::error::ErrorKind::UniqueViolation
            | sqlx::error::ErrorKind::ForeignKeyViolation
            | sqlx::error::ErrorKind::NotNullViolation
            | sqlx::error::ErrorKind::CheckViolation
    )
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A transactional store of persons, pets and their links.
#[async_trait]
pub trait EntityStore: Send + Sync {
    type Tx: StoreTx;

    /// Open a transaction. Reads inside it see one consistent snapshot, and
    /// no other transaction writes until it ends.
    async fn begin(&self) -> StoreResult<Self::Tx>;
}

/// Operations available inside one store transaction.
#[async_trait]
pub trait StoreTx: Send {
    /// Load a person together with its links, in insertion order.
    async fn find_person_by_id(&mut self, id: PersonId) -> StoreResult<Option<PersonAggregate>>;

    async fn find_pet_by_id(&mut self, id: PetId) -> StoreResult<Option<Pet>>;

    async fn find_link_by_person_and_pet(
        &mut self,
        person_id: PersonId,
        pet_id: PetId,
    ) -> StoreResult<Option<PersonPetLink>>;

    /// Links of one person in insertion order. Unknown persons have none.
    async fn find_links_by_person(&mut self, person_id: PersonId)
        -> StoreResult<Vec<PersonPetLink>>;

    /// Persons matching `predicate`, ordered by id.
    async fn scan_persons(&mut self, predicate: &PersonPredicate) -> StoreResult<Vec<Person>>;

    /// All pets, ordered by id.
    async fn scan_pets(&mut self) -> StoreResult<Vec<Pet>>;

    /// Insert a person; the store assigns the id.
    ///
    /// # Errors
    ///
    /// `IntegrityViolation` if a person with the same first and last name
    /// exists.
    async fn insert_person(&mut self, person: &NewPerson) -> StoreResult<Person>;

    /// Write the person row and make the stored links equal to the
    /// aggregate's collection: missing links are deleted, new ones inserted.
    ///
    /// # Errors
    ///
    /// `IntegrityViolation` if the person vanished, the name collides, a
    /// linked pet does not exist, or a pet is already linked elsewhere.
    async fn save_and_flush_person(&mut self, person: &PersonAggregate) -> StoreResult<()>;

    /// Delete a person and, by cascade, its links. `false` if absent.
    async fn delete_person(&mut self, id: PersonId) -> StoreResult<bool>;

    /// Insert a pet; the store assigns the id.
    async fn insert_pet(&mut self, pet: &NewPet) -> StoreResult<Pet>;

    /// Write name and age of an existing pet.
    async fn save_and_flush_pet(&mut self, pet: &Pet) -> StoreResult<()>;

    /// Delete a pet. `false` if absent.
    ///
    /// # Errors
    ///
    /// `IntegrityViolation` while the pet is still linked to a person.
    async fn delete_pet(&mut self, id: PetId) -> StoreResult<bool>;

    async fn commit(self) -> StoreResult<()>;

    async fn rollback(self) -> StoreResult<()>;
}
