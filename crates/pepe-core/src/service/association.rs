//! Association Manager: the lifecycle of person/pet links.

use crate::{
    domain::{PersonId, PersonPetLink, PetId},
    error::{Result, ServiceError},
    store::{EntityStore, StoreError, StoreTx},
};

use super::{begin, classify, conflict, finish, internal};

/// Creates, removes and lists links between persons and pets.
///
/// Uniqueness and existence are checked up front for precise messages;
/// the store's constraints have the final word when the aggregate is
/// flushed, so two callers racing for the same link cannot both win.
#[derive(Debug, Clone)]
pub struct AssociationManager<S> {
    store: S,
}

impl<S: EntityStore> AssociationManager<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Link `pet_id` to `person_id`.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the link already exists, either endpoint is missing,
    ///   or the store rejects the write (e.g. the pet has another owner)
    /// - `Internal` on any other store failure
    pub async fn add_link(&self, person_id: PersonId, pet_id: PetId) -> Result<()> {
        tracing::debug!(%person_id, %pet_id, "try add person pet link");

        let context = add_context(person_id, pet_id);
        let mut tx = begin(&self.store, &context).await?;
        let result = add_link_in(&mut tx, person_id, pet_id).await;
        finish(tx, result, &context).await
    }

    /// Unlink `pet_id` from `person_id`.
    ///
    /// # Errors
    ///
    /// - `Conflict` if there is no such link, either endpoint is missing, or
    ///   the store rejects the write
    /// - `Internal` on any other store failure
    pub async fn remove_link(&self, person_id: PersonId, pet_id: PetId) -> Result<()> {
        tracing::debug!(%person_id, %pet_id, "try remove person pet link");

        let context = remove_context(PersonPetLink::new(person_id, pet_id));
        let mut tx = begin(&self.store, &context).await?;
        let result = remove_link_in(&mut tx, person_id, pet_id).await;
        finish(tx, result, &context).await
    }

    /// Pet ids linked to `person_id`, in the order they were linked.
    ///
    /// An unknown person or one without pets yields an empty list.
    ///
    /// # Errors
    ///
    /// `Internal` on any store failure
    pub async fn list_links(&self, person_id: PersonId) -> Result<Vec<PetId>> {
        let context = format!("Could not retrieve pets of person with id '{person_id}'");
        let mut tx = begin(&self.store, &context).await?;
        let result = tx
            .find_links_by_person(person_id)
            .await
            .map(|links| links.into_iter().map(|link| link.pet_id).collect::<Vec<_>>())
            .map_err(|e| internal(&e, format!("{context}, unexpected error")));

        if let Ok(pet_ids) = &result {
            tracing::debug!(%person_id, ?pet_ids, "found linked pets");
        }
        finish(tx, result, &context).await
    }
}

fn add_context(person_id: PersonId, pet_id: PetId) -> String {
    format!("Could not add pet with Id {pet_id} to the person with Id {person_id}")
}

fn remove_context(link: PersonPetLink) -> String {
    format!("Could not delete personPet '{link}'")
}

fn add_failed(person_id: PersonId, pet_id: PetId) -> impl Fn(StoreError) -> ServiceError {
    move |e| {
        let context = add_context(person_id, pet_id);
        classify(
            &e,
            format!("{context}, db error"),
            format!("{context}, unexpected error"),
        )
    }
}

fn remove_failed(link: PersonPetLink) -> impl Fn(StoreError) -> ServiceError {
    move |e| {
        classify(
            &e,
            format!("Could not delete personPet {link}, db error"),
            format!("Could not delete personPet '{link}', unexpected error"),
        )
    }
}

async fn add_link_in<T: StoreTx>(tx: &mut T, person_id: PersonId, pet_id: PetId) -> Result<()> {
    let failed = add_failed(person_id, pet_id);

    if let Some(existing) = tx
        .find_link_by_person_and_pet(person_id, pet_id)
        .await
        .map_err(&failed)?
    {
        tracing::debug!(%existing, "link already present");
        return Err(conflict(format!(
            "Person with id '{person_id}' already has Pet with id '{pet_id}'"
        )));
    }

    let mut person = tx
        .find_person_by_id(person_id)
        .await
        .map_err(&failed)?
        .ok_or_else(|| conflict(format!("Person with id '{person_id}' does not exist")))?;

    let pet = tx
        .find_pet_by_id(pet_id)
        .await
        .map_err(&failed)?
        .ok_or_else(|| conflict(format!("Pet with id '{pet_id}' does not exist")))?;

    let link = person.attach(&pet);
    tracing::info!(person = %person.person(), %pet, "save person with linked pet");

    tx.save_and_flush_person(&person).await.map_err(|e| {
        tracing::error!(%link, error = %e, "failed to create link");
        failed(e)
    })
}

async fn remove_link_in<T: StoreTx>(tx: &mut T, person_id: PersonId, pet_id: PetId) -> Result<()> {
    let failed = remove_failed(PersonPetLink::new(person_id, pet_id));
    let not_linked = || {
        conflict(format!(
            "Person with id '{person_id}' does not have Pet with id '{pet_id}'"
        ))
    };

    tx.find_link_by_person_and_pet(person_id, pet_id)
        .await
        .map_err(&failed)?
        .ok_or_else(not_linked)?;

    let mut person = tx
        .find_person_by_id(person_id)
        .await
        .map_err(&failed)?
        .ok_or_else(|| conflict(format!("Person with id '{person_id}' does not exist")))?;

    let pet = tx
        .find_pet_by_id(pet_id)
        .await
        .map_err(&failed)?
        .ok_or_else(|| conflict(format!("Pet with id '{pet_id}' does not exist")))?;

    let link = person.detach(&pet).ok_or_else(not_linked)?;
    tracing::info!(person = %person.person(), %pet, "save person with unlinked pet");

    tx.save_and_flush_person(&person).await.map_err(|e| {
        tracing::error!(%link, error = %e, "failed to delete link");
        failed(e)
    })
}
