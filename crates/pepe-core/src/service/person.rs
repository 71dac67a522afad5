//! Person service.

use crate::{
    domain::{
        NewPerson, Person, PersonAggregate, PersonId, PersonPredicate, PersonSearchCriteria,
        PersonUpdate,
    },
    error::Result,
    store::{EntityStore, StoreError, StoreTx},
};

use super::{begin, classify, conflict, finish, internal};

#[derive(Debug, Clone)]
pub struct PersonService<S> {
    store: S,
}

impl<S: EntityStore> PersonService<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Store a new person and return its id.
    ///
    /// # Errors
    ///
    /// - `Conflict` if a person with the same first and last name exists
    /// - `Internal` on any other store failure
    pub async fn create_person(&self, person: NewPerson) -> Result<PersonId> {
        tracing::debug!(name = %person.full_name(), "create person");

        let context = format!("Could not create person with the name '{}'", person.full_name());
        let mut tx = begin(&self.store, &context).await?;
        let result = tx.insert_person(&person).await.map_err(|e| {
            let name = person.full_name();
            classify(
                &e,
                format!(
                    "Could not create person, another person with the same name '{name}' already exists"
                ),
                format!("Could not create person with the name '{name}', unexpected error"),
            )
        });

        if let Ok(created) = &result {
            tracing::info!(person = %created, "person created");
        }
        finish(tx, result.map(|created| created.id), &context).await
    }

    /// Replace the address of an existing person.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the person does not exist or the store rejects the write
    /// - `Internal` on any other store failure
    pub async fn update_person(&self, id: PersonId, update: PersonUpdate) -> Result<()> {
        let context = format!("Could not update person with id '{id}'");
        let mut tx = begin(&self.store, &context).await?;
        let result = update_person_in(&mut tx, id, update).await;
        finish(tx, result, &context).await
    }

    /// # Errors
    ///
    /// - `Conflict` if the person does not exist
    /// - `Internal` on any store failure
    pub async fn retrieve_person(&self, id: PersonId) -> Result<Person> {
        self.find_person(id)
            .await?
            .ok_or_else(|| conflict(format!("Person with id '{id}' not found")))
    }

    /// Like [`Self::retrieve_person`], but absence is not an error.
    ///
    /// # Errors
    ///
    /// `Internal` on any store failure
    pub async fn find_person(&self, id: PersonId) -> Result<Option<Person>> {
        let context = format!("Could not retrieve person with id '{id}'");
        let mut tx = begin(&self.store, &context).await?;
        let result = tx
            .find_person_by_id(id)
            .await
            .map(|found| found.map(PersonAggregate::into_person))
            .map_err(|e| internal(&e, format!("{context}, unexpected error")));

        tracing::debug!(%id, found = matches!(result, Ok(Some(_))), "retrieved person");
        finish(tx, result, &context).await
    }

    /// Persons matching every present filter of `criteria`, ordered by id.
    /// Empty criteria returns everyone.
    ///
    /// # Errors
    ///
    /// `Internal` on any store failure
    pub async fn find_persons(&self, criteria: &PersonSearchCriteria) -> Result<Vec<Person>> {
        let predicate = PersonPredicate::from_criteria(criteria);
        tracing::debug!(%criteria, %predicate, "retrieve persons using search criteria");

        let context = "Could not retrieve persons";
        let mut tx = begin(&self.store, context).await?;
        let result = tx
            .scan_persons(&predicate)
            .await
            .map_err(|e| internal(&e, format!("{context}, unexpected error")));
        finish(tx, result, context).await
    }

    /// Delete a person together with its links.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the person does not exist or the store refuses
    /// - `Internal` on any other store failure
    pub async fn delete_person(&self, id: PersonId) -> Result<()> {
        let context = format!("Could not delete person with id '{id}'");
        let mut tx = begin(&self.store, &context).await?;
        let result = match tx.delete_person(id).await {
            Ok(true) => {
                tracing::info!(%id, "person deleted");
                Ok(())
            }
            Ok(false) => Err(conflict(format!("Person with id '{id}' not found"))),
            Err(e) => Err(classify(
                &e,
                context.clone(),
                format!("{context}, unexpected error"),
            )),
        };
        finish(tx, result, &context).await
    }
}

async fn update_person_in<T: StoreTx>(tx: &mut T, id: PersonId, update: PersonUpdate) -> Result<()> {
    let failed = |e: StoreError| {
        internal(
            &e,
            format!("Could not update person with the id '{id}', unexpected error"),
        )
    };

    let mut person = tx
        .find_person_by_id(id)
        .await
        .map_err(failed)?
        .ok_or_else(|| conflict(format!("Person with id '{id}' not found")))?;

    person.update(update);
    tracing::debug!(person = %person.person(), "update person before save");

    tx.save_and_flush_person(&person).await.map_err(|e| {
        classify(
            &e,
            format!(
                "Could not update person, another person with the name '{}' equal to updated name already exists",
                person.person().full_name()
            ),
            format!("Could not update person with the id '{id}', unexpected error"),
        )
    })
}
