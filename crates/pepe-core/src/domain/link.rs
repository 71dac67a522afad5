//! Ownership link between a person and a pet.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{PersonId, PetId};

/// "Pet `pet_id` is currently owned by person `person_id`."
///
/// A plain value pair. Identity is the pair itself; the store additionally
/// keeps `pet_id` unique so a pet has at most one owner at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonPetLink {
    pub person_id: PersonId,
    pub pet_id: PetId,
}

impl PersonPetLink {
    #[must_use]
    pub const fn new(person_id: PersonId, pet_id: PetId) -> Self {
        Self { person_id, pet_id }
    }
}

impl fmt::Display for PersonPetLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PersonPet {{personId={}, petId={}}}",
            self.person_id, self.pet_id
        )
    }
}
