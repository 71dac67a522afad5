//! The `Person` aggregate: a person plus the links it owns.
//!
//! Links are stored as `(person_id, pet_id)` values, never as references to
//! `Pet` objects, so there is no reference cycle to untangle. Navigating from
//! a person to its pets is a lookup on `pet_id`.
//!
//! The aggregate is a transient copy loaded inside one transaction and
//! written back with `save_and_flush_person`. Whatever is in `links` at that
//! point is what the store keeps; links missing from the collection are
//! deleted (orphan removal).

use im::Vector;

use super::{Person, PersonId, PersonPetLink, PersonUpdate, Pet, PetId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonAggregate {
    person: Person,
    links: Vector<PersonPetLink>,
}

impl PersonAggregate {
    #[must_use]
    pub fn new(person: Person, links: impl IntoIterator<Item = PersonPetLink>) -> Self {
        Self {
            person,
            links: links.into_iter().collect(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> PersonId {
        self.person.id
    }

    #[must_use]
    pub const fn person(&self) -> &Person {
        &self.person
    }

    /// Links in insertion order.
    #[must_use]
    pub const fn links(&self) -> &Vector<PersonPetLink> {
        &self.links
    }

    pub fn pet_ids(&self) -> impl Iterator<Item = PetId> + '_ {
        self.links.iter().map(|link| link.pet_id)
    }

    #[must_use]
    pub fn owns(&self, pet_id: PetId) -> bool {
        self.links.iter().any(|link| link.pet_id == pet_id)
    }

    /// Append a link to `pet` and return it.
    ///
    /// No duplicate check: callers verify absence first.
    pub fn attach(&mut self, pet: &Pet) -> PersonPetLink {
        let link = PersonPetLink::new(self.person.id, pet.id);
        self.links.push_back(link);
        link
    }

    /// Remove the link to `pet` and return it, or `None` if there is none.
    ///
    /// Links are plain id pairs, so removing it from the collection is all
    /// there is to detach.
    pub fn detach(&mut self, pet: &Pet) -> Option<PersonPetLink> {
        self.links
            .iter()
            .position(|link| link.pet_id == pet.id)
            .map(|index| self.links.remove(index))
    }

    pub fn update(&mut self, update: PersonUpdate) {
        self.person.update(update);
    }

    #[must_use]
    pub fn into_person(self) -> Person {
        self.person
    }
}
