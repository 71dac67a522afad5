//! # Pepe Core
//!
//! Persons, pets, and the ownership links between them.
//!
//! ## Laws (Compiler Enforced)
//!
//! - No `unwrap()` - returns `Result` instead
//! - No `expect()` - returns `Result` instead
//! - No `panic!()` - returns `Result` instead
//! - No `unsafe` - safe Rust only
//!
//! ## Layout
//!
//! - [`domain`] - identifiers, validated inputs, the `Person` aggregate and
//!   the search predicate builder. Pure, no I/O.
//! - [`store`] - the `EntityStore` transaction seam and its `SQLite` adapter.
//! - [`service`] - association manager plus person and pet services. Every
//!   operation runs in one transaction and reports [`ServiceError`].
//! - [`config`] - layered configuration (defaults, files, `PEPE_*` env vars).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod domain;
mod error;
pub mod service;
pub mod store;

pub use config::{ConfigError, DatabaseConfig, FeatureConfig, LogConfig, PepeConfig};
pub use domain::{
    NewPerson, NewPet, Person, PersonAggregate, PersonId, PersonPetLink, PersonPredicate,
    PersonSearchCriteria, PersonUpdate, Pet, PetAge, PetId, ValidationError,
};
pub use error::{Result, ServiceError};
pub use service::{AssociationManager, PersonService, PetService};
pub use store::{EntityStore, SqliteStore, StoreError, StoreTx};
