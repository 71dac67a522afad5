//! `SQLite` implementation of the entity store.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::{
    rows::{
        build_person_scan, format_date, parse_link_row, parse_person_row, parse_pet_row,
        PERSON_COLUMNS, PET_COLUMNS,
    },
    schema::{create_connection_pool, init_schema},
    EntityStore, StoreError, StoreResult, StoreTx,
};
use crate::{
    config::DatabaseConfig,
    domain::{
        NewPerson, NewPet, Person, PersonAggregate, PersonId, PersonPetLink, PersonPredicate, Pet,
        PetId,
    },
};

/// Transactions take the write lock when they begin. Concurrent writers
/// queue on the busy timeout instead of failing a lock upgrade.
const BEGIN_IMMEDIATE: &str = "BEGIN IMMEDIATE";

/// Entity store backed by a `SQLite` connection pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect using `config` and create the schema if missing.
    ///
    /// # Errors
    ///
    /// Returns error if the url is invalid, the database cannot be opened,
    /// or schema creation fails.
    pub async fn open(config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = create_connection_pool(config).await?;
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and create the schema if missing.
    ///
    /// # Errors
    ///
    /// Returns error if schema creation fails.
    pub async fn from_pool(pool: SqlitePool) -> StoreResult<Self> {
        init_schema(&pool).await?;
        tracing::debug!("entity store schema ready");
        Ok(Self { pool })
    }

    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl EntityStore for SqliteStore {
    type Tx = SqliteTx;

    async fn begin(&self) -> StoreResult<SqliteTx> {
        self.pool
            .begin_with(BEGIN_IMMEDIATE)
            .await
            .map(|tx| SqliteTx { tx })
            .map_err(|e| StoreError::from_sqlx("Failed to begin transaction", &e))
    }
}

/// One open `SQLite` transaction. Rolled back on drop unless committed.
#[derive(Debug)]
pub struct SqliteTx {
    tx: Transaction<'static, Sqlite>,
}

impl SqliteTx {
    async fn stored_pet_ids(&mut self, person_id: PersonId) -> StoreResult<HashSet<PetId>> {
        self.find_links_by_person(person_id)
            .await
            .map(|links| links.into_iter().map(|link| link.pet_id).collect())
    }

    async fn insert_link(&mut self, link: PersonPetLink) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO person_pets (person_id, pet_id, position)
             VALUES (?, ?, (SELECT COALESCE(MAX(position), 0) + 1 FROM person_pets WHERE person_id = ?))",
        )
        .bind(link.person_id.get())
        .bind(link.pet_id.get())
        .bind(link.person_id.get())
        .execute(&mut *self.tx)
        .await
        .map(|_| ())
        .map_err(|e| StoreError::from_sqlx(&format!("Failed to insert {link}"), &e))
    }

    async fn delete_link(&mut self, person_id: PersonId, pet_id: PetId) -> StoreResult<()> {
        sqlx::query("DELETE FROM person_pets WHERE person_id = ? AND pet_id = ?")
            .bind(person_id.get())
            .bind(pet_id.get())
            .execute(&mut *self.tx)
            .await
            .map(|_| ())
            .map_err(|e| {
                StoreError::from_sqlx(
                    &format!("Failed to delete {}", PersonPetLink::new(person_id, pet_id)),
                    &e,
                )
            })
    }
}

#[async_trait]
impl StoreTx for SqliteTx {
    async fn find_person_by_id(&mut self, id: PersonId) -> StoreResult<Option<PersonAggregate>> {
        let person = sqlx::query(&format!("SELECT {PERSON_COLUMNS} FROM persons WHERE id = ?"))
            .bind(id.get())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| StoreError::from_sqlx("Failed to query person", &e))?
            .map(|row| parse_person_row(&row))
            .transpose()?;

        match person {
            Some(person) => {
                let links = self.find_links_by_person(id).await?;
                Ok(Some(PersonAggregate::new(person, links)))
            }
            None => Ok(None),
        }
    }

    async fn find_pet_by_id(&mut self, id: PetId) -> StoreResult<Option<Pet>> {
        sqlx::query(&format!("SELECT {PET_COLUMNS} FROM pets WHERE id = ?"))
            .bind(id.get())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| StoreError::from_sqlx("Failed to query pet", &e))
            .and_then(|opt_row| opt_row.map_or(Ok(None), |row| parse_pet_row(&row).map(Some)))
    }

    async fn find_link_by_person_and_pet(
        &mut self,
        person_id: PersonId,
        pet_id: PetId,
    ) -> StoreResult<Option<PersonPetLink>> {
        sqlx::query("SELECT person_id, pet_id FROM person_pets WHERE person_id = ? AND pet_id = ?")
            .bind(person_id.get())
            .bind(pet_id.get())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| StoreError::from_sqlx("Failed to query link", &e))
            .and_then(|opt_row| opt_row.map_or(Ok(None), |row| parse_link_row(&row).map(Some)))
    }

    async fn find_links_by_person(
        &mut self,
        person_id: PersonId,
    ) -> StoreResult<Vec<PersonPetLink>> {
        let rows = sqlx::query(
            "SELECT person_id, pet_id FROM person_pets WHERE person_id = ? ORDER BY position",
        )
        .bind(person_id.get())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| StoreError::from_sqlx("Failed to query links", &e))?;

        rows.iter().map(parse_link_row).collect()
    }

    async fn scan_persons(&mut self, predicate: &PersonPredicate) -> StoreResult<Vec<Person>> {
        let (sql, values) = build_person_scan(predicate);
        tracing::debug!(%predicate, "scanning persons");

        let mut query = sqlx::query(&sql);
        for value in values {
            query = query.bind(value);
        }

        let rows = query
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| StoreError::from_sqlx("Failed to query persons", &e))?;

        rows.iter().map(parse_person_row).collect()
    }

    async fn scan_pets(&mut self) -> StoreResult<Vec<Pet>> {
        let rows = sqlx::query(&format!("SELECT {PET_COLUMNS} FROM pets ORDER BY id"))
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| StoreError::from_sqlx("Failed to query pets", &e))?;

        rows.iter().map(parse_pet_row).collect()
    }

    async fn insert_person(&mut self, person: &NewPerson) -> StoreResult<Person> {
        let id = sqlx::query(
            "INSERT INTO persons (first_name, last_name, date_of_birth, address)
             VALUES (?, ?, ?, ?)",
        )
        .bind(person.first_name())
        .bind(person.last_name())
        .bind(format_date(person.date_of_birth()))
        .bind(person.address())
        .execute(&mut *self.tx)
        .await
        .map(|result| result.last_insert_rowid())
        .map_err(|e| StoreError::from_sqlx("Failed to create person", &e))?;

        Ok(person.clone().into_person(PersonId::new(id)))
    }

    async fn save_and_flush_person(&mut self, aggregate: &PersonAggregate) -> StoreResult<()> {
        let person = aggregate.person();
        let updated = sqlx::query(
            "UPDATE persons SET first_name = ?, last_name = ?, date_of_birth = ?, address = ?
             WHERE id = ?",
        )
        .bind(&person.first_name)
        .bind(&person.last_name)
        .bind(format_date(person.date_of_birth))
        .bind(&person.address)
        .bind(person.id.get())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| StoreError::from_sqlx("Failed to update person", &e))?
        .rows_affected();

        if updated == 0 {
            return Err(StoreError::integrity_violation(format!(
                "Person {} no longer exists",
                person.id
            )));
        }

        let stored = self.stored_pet_ids(person.id).await?;
        let wanted: HashSet<PetId> = aggregate.pet_ids().collect();

        // Orphans first so a pet moved within the same flush cannot collide.
        for pet_id in stored.difference(&wanted) {
            self.delete_link(person.id, *pet_id).await?;
        }
        for link in aggregate.links().iter().filter(|l| !stored.contains(&l.pet_id)) {
            self.insert_link(*link).await?;
        }
        Ok(())
    }

    async fn delete_person(&mut self, id: PersonId) -> StoreResult<bool> {
        sqlx::query("DELETE FROM persons WHERE id = ?")
            .bind(id.get())
            .execute(&mut *self.tx)
            .await
            .map(|result| result.rows_affected() > 0)
            .map_err(|e| StoreError::from_sqlx("Failed to delete person", &e))
    }

    async fn insert_pet(&mut self, pet: &NewPet) -> StoreResult<Pet> {
        let id = sqlx::query("INSERT INTO pets (name, age) VALUES (?, ?)")
            .bind(pet.name())
            .bind(i64::from(pet.age()))
            .execute(&mut *self.tx)
            .await
            .map(|result| result.last_insert_rowid())
            .map_err(|e| StoreError::from_sqlx("Failed to create pet", &e))?;

        Ok(pet.clone().into_pet(PetId::new(id)))
    }

    async fn save_and_flush_pet(&mut self, pet: &Pet) -> StoreResult<()> {
        let updated = sqlx::query("UPDATE pets SET name = ?, age = ? WHERE id = ?")
            .bind(&pet.name)
            .bind(i64::from(pet.age))
            .bind(pet.id.get())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| StoreError::from_sqlx("Failed to update pet", &e))?
            .rows_affected();

        if updated == 0 {
            return Err(StoreError::integrity_violation(format!(
                "Pet {} no longer exists",
                pet.id
            )));
        }
        Ok(())
    }

    async fn delete_pet(&mut self, id: PetId) -> StoreResult<bool> {
        sqlx::query("DELETE FROM pets WHERE id = ?")
            .bind(id.get())
            .execute(&mut *self.tx)
            .await
            .map(|result| result.rows_affected() > 0)
            .map_err(|e| StoreError::from_sqlx("Failed to delete pet", &e))
    }

    async fn commit(self) -> StoreResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| StoreError::from_sqlx("Failed to commit transaction", &e))
    }

    async fn rollback(self) -> StoreResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| StoreError::from_sqlx("Failed to roll back transaction", &e))
    }
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::domain::PersonUpdate;

    async fn store() -> StoreResult<SqliteStore> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| StoreError::database(e.to_string()))?;
        SqliteStore::from_pool(pool).await
    }

    fn jan() -> NewPerson {
        NewPerson::new_as_of(
            "Jan",
            "Jansen",
            chrono::NaiveDate::from_ymd_opt(1980, 6, 18).unwrap_or_default(),
            "Kalverhoeve 41, 3992 NX Houten",
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        )
        .unwrap_or_else(|e| unreachable!("{e}"))
    }

    fn caesar() -> NewPet {
        NewPet::new("Caesar", 3).unwrap_or_else(|e| unreachable!("{e}"))
    }

    #[tokio::test]
    async fn test_insert_and_find_person() -> StoreResult<()> {
        let store = store().await?;
        let mut tx = store.begin().await?;
        let person = tx.insert_person(&jan()).await?;
        let found = tx.find_person_by_id(person.id).await?;
        tx.commit().await?;

        assert_eq!(found.map(PersonAggregate::into_person), Some(person));
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_name_is_integrity_violation() -> StoreResult<()> {
        let store = store().await?;
        let mut tx = store.begin().await?;
        tx.insert_person(&jan()).await?;
        let result = tx.insert_person(&jan()).await;

        assert!(matches!(result, Err(StoreError::IntegrityViolation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_flush_syncs_links_in_order() -> StoreResult<()> {
        let store = store().await?;
        let mut tx = store.begin().await?;
        let person = tx.insert_person(&jan()).await?;
        let first = tx.insert_pet(&caesar()).await?;
        let second = tx.insert_pet(&caesar()).await?;

        let mut aggregate = PersonAggregate::new(person.clone(), []);
        aggregate.attach(&second);
        aggregate.attach(&first);
        tx.save_and_flush_person(&aggregate).await?;

        let links = tx.find_links_by_person(person.id).await?;
        assert_eq!(
            links.iter().map(|l| l.pet_id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );

        aggregate.detach(&second);
        aggregate.update(PersonUpdate::new("Elsewhere 2").unwrap_or_else(|e| unreachable!("{e}")));
        tx.save_and_flush_person(&aggregate).await?;

        let reloaded = tx.find_person_by_id(person.id).await?;
        tx.commit().await?;

        let reloaded = reloaded.ok_or_else(|| StoreError::database("person vanished"))?;
        assert_eq!(reloaded.person().address, "Elsewhere 2");
        assert_eq!(reloaded.pet_ids().collect::<Vec<_>>(), vec![first.id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_second_owner_is_integrity_violation() -> StoreResult<()> {
        let store = store().await?;
        let mut tx = store.begin().await?;
        let pet = tx.insert_pet(&caesar()).await?;
        let one = tx.insert_person(&jan()).await?;
        let other = NewPerson::new_as_of(
            "Laura",
            "Ramos",
            chrono::NaiveDate::from_ymd_opt(1991, 2, 3).unwrap_or_default(),
            "Somewhere 1",
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        )
        .unwrap_or_else(|e| unreachable!("{e}"));
        let two = tx.insert_person(&other).await?;

        let mut first = PersonAggregate::new(one, []);
        first.attach(&pet);
        tx.save_and_flush_person(&first).await?;

        let mut second = PersonAggregate::new(two, []);
        second.attach(&pet);
        let result = tx.save_and_flush_person(&second).await;

        assert!(matches!(result, Err(StoreError::IntegrityViolation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_linked_pet_cannot_be_deleted_but_cascades_with_person() -> StoreResult<()> {
        let store = store().await?;
        let mut tx = store.begin().await?;
        let person = tx.insert_person(&jan()).await?;
        let pet = tx.insert_pet(&caesar()).await?;
        let mut aggregate = PersonAggregate::new(person.clone(), []);
        aggregate.attach(&pet);
        tx.save_and_flush_person(&aggregate).await?;

        let refused = tx.delete_pet(pet.id).await;
        assert!(matches!(refused, Err(StoreError::IntegrityViolation(_))));

        assert!(tx.delete_person(person.id).await?);
        assert!(tx
            .find_link_by_person_and_pet(person.id, pet.id)
            .await?
            .is_none());
        assert!(tx.delete_pet(pet.id).await?);
        tx.commit().await
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() -> StoreResult<()> {
        let store = store().await?;
        let mut tx = store.begin().await?;
        let pet = tx.insert_pet(&caesar()).await?;
        tx.rollback().await?;

        let mut tx = store.begin().await?;
        assert!(tx.find_pet_by_id(pet.id).await?.is_none());
        Ok(())
    }
}
