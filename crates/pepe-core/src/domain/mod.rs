//! # Domain Layer
//!
//! Pure types and rules, no I/O:
//!
//! - [`PersonId`] / [`PetId`] - store-assigned surrogate ids
//! - [`Person`], [`NewPerson`], [`PersonUpdate`] - person records and inputs
//! - [`Pet`], [`NewPet`], [`PetAge`] - pet records and inputs
//! - [`PersonPetLink`] - the `(person_id, pet_id)` ownership value
//! - [`PersonAggregate`] - a person with its links; `attach` / `detach`
//! - [`PersonSearchCriteria`] / [`PersonPredicate`] - optional filters folded
//!   into one conjunctive predicate
//!
//! Inputs are parsed once at the boundary; a `NewPet` or `PersonId` that
//! exists is valid.

mod aggregate;
mod criteria;
mod identifiers;
mod link;
mod person;
mod pet;
mod validation;

pub use aggregate::PersonAggregate;
pub use criteria::{PersonClause, PersonField, PersonPredicate, PersonSearchCriteria};
pub use identifiers::{PersonId, PetId};
pub use link::PersonPetLink;
pub use person::{
    parse_date_of_birth, NewPerson, Person, PersonUpdate, DATE_FORMAT, MAX_ADDRESS_LEN,
    MAX_NAME_LEN,
};
pub use pet::{NewPet, Pet, PetAge, MAX_PET_NAME_LEN};
pub use validation::ValidationError;
