//! Row parsing and predicate translation

use chrono::NaiveDate;
use sqlx::{sqlite::SqliteRow, Row};

use super::{StoreError, StoreResult};
use crate::domain::{
    Person, PersonField, PersonId, PersonPetLink, PersonPredicate, Pet, PetAge, PetId, DATE_FORMAT,
};

pub(super) const PERSON_COLUMNS: &str = "id, first_name, last_name, date_of_birth, address";
pub(super) const PET_COLUMNS: &str = "id, name, age";

fn read<'r, T>(row: &'r SqliteRow, column: &str) -> StoreResult<T>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column)
        .map_err(|e| StoreError::database(format!("Failed to read {column}: {e}")))
}

/// Parse a database row into a Person
pub(super) fn parse_person_row(row: &SqliteRow) -> StoreResult<Person> {
    let id: i64 = read(row, "id")?;
    let first_name: String = read(row, "first_name")?;
    let last_name: String = read(row, "last_name")?;
    let date_text: String = read(row, "date_of_birth")?;
    let address: String = read(row, "address")?;

    let date_of_birth = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|e| {
        StoreError::database(format!("Invalid date_of_birth '{date_text}' for person {id}: {e}"))
    })?;

    Ok(Person {
        id: PersonId::new(id),
        first_name,
        last_name,
        date_of_birth,
        address,
    })
}

/// Parse a database row into a Pet
pub(super) fn parse_pet_row(row: &SqliteRow) -> StoreResult<Pet> {
    let id: i64 = read(row, "id")?;
    let name: String = read(row, "name")?;
    let age: i64 = read(row, "age")?;

    let age = PetAge::new(age)
        .map_err(|e| StoreError::database(format!("Invalid age for pet {id}: {e}")))?;

    Ok(Pet {
        id: PetId::new(id),
        name,
        age,
    })
}

pub(super) fn parse_link_row(row: &SqliteRow) -> StoreResult<PersonPetLink> {
    let person_id: i64 = read(row, "person_id")?;
    let pet_id: i64 = read(row, "pet_id")?;
    Ok(PersonPetLink::new(PersonId::new(person_id), PetId::new(pet_id)))
}

pub(super) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

const fn column_of(field: PersonField) -> &'static str {
    match field {
        PersonField::FirstName => "first_name",
        PersonField::LastName => "last_name",
    }
}

/// Build the person scan for `predicate`: SQL text plus values to bind in
/// order. Match-all produces no WHERE clause.
pub(super) fn build_person_scan(predicate: &PersonPredicate) -> (String, Vec<String>) {
    let (conditions, values): (Vec<String>, Vec<String>) = predicate
        .clauses()
        .iter()
        .map(|clause| {
            (
                format!("{} = ?", column_of(clause.field())),
                clause.value().to_string(),
            )
        })
        .unzip();

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    (
        format!("SELECT {PERSON_COLUMNS} FROM persons{where_clause} ORDER BY id"),
        values,
    )
}
