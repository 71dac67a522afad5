//! Pet service.

use crate::{
    config::FeatureConfig,
    domain::{NewPet, Pet, PetId},
    error::{Result, ServiceError},
    store::{EntityStore, StoreError, StoreTx},
};

use super::{begin, classify, conflict, finish, internal};

/// Pet CRUD. Deletion is gated by [`FeatureConfig::delete_pet`].
#[derive(Debug, Clone)]
pub struct PetService<S> {
    store: S,
    features: FeatureConfig,
}

impl<S: EntityStore> PetService<S> {
    pub const fn new(store: S, features: FeatureConfig) -> Self {
        Self { store, features }
    }

    /// # Errors
    ///
    /// - `Conflict` if the store rejects the pet
    /// - `Internal` on any other store failure
    pub async fn create_pet(&self, pet: NewPet) -> Result<PetId> {
        tracing::debug!(name = pet.name(), age = %pet.age(), "create pet");

        let context = format!("Could not create pet with the name '{}'", pet.name());
        let mut tx = begin(&self.store, &context).await?;
        let result = tx.insert_pet(&pet).await.map_err(|e| {
            classify(
                &e,
                format!("{context}, db error"),
                format!("{context}, unexpected error"),
            )
        });

        if let Ok(created) = &result {
            tracing::info!(pet = %created, "pet created");
        }
        finish(tx, result.map(|created| created.id), &context).await
    }

    /// Replace name and age of an existing pet.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the pet does not exist or the store rejects the write
    /// - `Internal` on any other store failure
    pub async fn update_pet(&self, id: PetId, update: NewPet) -> Result<()> {
        let context = format!("Could not update pet with id '{id}'");
        let mut tx = begin(&self.store, &context).await?;
        let result = update_pet_in(&mut tx, id, update).await;
        finish(tx, result, &context).await
    }

    /// # Errors
    ///
    /// - `Conflict` if the pet does not exist
    /// - `Internal` on any store failure
    pub async fn retrieve_pet(&self, id: PetId) -> Result<Pet> {
        self.find_pet(id)
            .await?
            .ok_or_else(|| conflict(format!("Pet with id '{id}' not found")))
    }

    /// # Errors
    ///
    /// `Internal` on any store failure
    pub async fn find_pet(&self, id: PetId) -> Result<Option<Pet>> {
        let context = format!("Could not retrieve pet with id '{id}'");
        let mut tx = begin(&self.store, &context).await?;
        let result = tx
            .find_pet_by_id(id)
            .await
            .map_err(|e| internal(&e, format!("{context}, unexpected error")));

        tracing::debug!(%id, found = matches!(result, Ok(Some(_))), "retrieved pet");
        finish(tx, result, &context).await
    }

    /// All pets, ordered by id.
    ///
    /// # Errors
    ///
    /// `Internal` on any store failure
    pub async fn retrieve_all_pets(&self) -> Result<Vec<Pet>> {
        let context = "Could not retrieve pets";
        let mut tx = begin(&self.store, context).await?;
        let result = tx
            .scan_pets()
            .await
            .map_err(|e| internal(&e, format!("{context}, unexpected error")));
        finish(tx, result, context).await
    }

    /// Delete a pet that no person owns.
    ///
    /// # Errors
    ///
    /// - `Conflict` if deleting pets is disabled, the pet does not exist, or
    ///   it is still linked to a person
    /// - `Internal` on any other store failure
    pub async fn delete_pet(&self, id: PetId) -> Result<()> {
        if !self.features.delete_pet {
            tracing::warn!(%id, "delete pet rejected, feature disabled");
            return Err(ServiceError::conflict("Deleting pets is disabled"));
        }

        let context = format!("Could not delete pet with id '{id}'");
        let mut tx = begin(&self.store, &context).await?;
        let result = delete_pet_in(&mut tx, id).await;
        finish(tx, result, &context).await
    }
}

async fn update_pet_in<T: StoreTx>(tx: &mut T, id: PetId, update: NewPet) -> Result<()> {
    let mut pet = tx
        .find_pet_by_id(id)
        .await
        .map_err(|e| {
            internal(
                &e,
                format!("Could not update pet with the id '{id}', unexpected error"),
            )
        })?
        .ok_or_else(|| conflict(format!("Pet with id '{id}' not found")))?;

    pet.update(update);
    tracing::debug!(%pet, "update pet before save");

    tx.save_and_flush_pet(&pet).await.map_err(|e| {
        classify(
            &e,
            format!("Could not update pet with the id '{id}', db error"),
            format!("Could not update pet with the id '{id}', unexpected error"),
        )
    })
}

async fn delete_pet_in<T: StoreTx>(tx: &mut T, id: PetId) -> Result<()> {
    let not_found = || conflict(format!("Pet with id '{id}' not found"));
    let failed = |e: StoreError| {
        classify(
            &e,
            format!("Could not delete pet with id '{id}'"),
            format!("Could not delete pet with id '{id}', unexpected error"),
        )
    };

    tx.find_pet_by_id(id)
        .await
        .map_err(failed)?
        .ok_or_else(not_found)?;

    tracing::debug!(%id, "delete pet");
    if tx.delete_pet(id).await.map_err(failed)? {
        tracing::info!(%id, "pet deleted");
        Ok(())
    } else {
        Err(not_found())
    }
}
