//! Person records and the validated inputs that create or change them.

use std::fmt;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{validation::required_text, PersonId, ValidationError};

/// Maximum length of a first or last name.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of a free text address.
pub const MAX_ADDRESS_LEN: usize = 300;

/// Date format accepted for dates of birth.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A stored person.
///
/// `(first_name, last_name)` is unique across all persons; the store
/// enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub address: String,
}

impl Person {
    /// "First Last"
    #[must_use]
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }

    /// Apply a partial update. Only the address can change.
    pub fn update(&mut self, update: PersonUpdate) {
        self.address = update.address;
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Person {{id={}, name='{}', dateOfBirth={}, address='{}'}}",
            self.id,
            self.full_name(),
            self.date_of_birth.format(DATE_FORMAT),
            self.address
        )
    }
}

pub(crate) fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{first_name} {last_name}")
}

/// Validated input for creating a person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    first_name: String,
    last_name: String,
    date_of_birth: NaiveDate,
    address: String,
}

impl NewPerson {
    /// Validate person fields against today's date.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
        address: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::new_as_of(
            first_name,
            last_name,
            date_of_birth,
            address,
            Utc::now().date_naive(),
        )
    }

    /// Validate person fields against an explicit `today`.
    pub fn new_as_of(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
        address: impl Into<String>,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        if date_of_birth > today {
            return Err(ValidationError::InFuture {
                field: "dateOfBirth",
            });
        }

        Ok(Self {
            first_name: required_text("firstName", first_name, MAX_NAME_LEN)?,
            last_name: required_text("lastName", last_name, MAX_NAME_LEN)?,
            date_of_birth,
            address: required_text("address", address, MAX_ADDRESS_LEN)?,
        })
    }

    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    #[must_use]
    pub const fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }

    /// Attach the id assigned by the store.
    #[must_use]
    pub fn into_person(self, id: PersonId) -> Person {
        Person {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: self.date_of_birth,
            address: self.address,
        }
    }
}

/// Validated partial update of a person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonUpdate {
    address: String,
}

impl PersonUpdate {
    pub fn new(address: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            address: required_text("address", address, MAX_ADDRESS_LEN)?,
        })
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Parse a `YYYY-MM-DD` date of birth.
pub fn parse_date_of_birth(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|e| ValidationError::Malformed {
        field: "dateOfBirth",
        value: input.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    #[test]
    fn test_new_person_accepts_valid_fields() {
        let person = NewPerson::new_as_of(
            "Jan",
            "Jansen",
            date(1980, 6, 18),
            "Kalverhoeve 41, 3992 NX Houten",
            date(2024, 1, 1),
        );
        assert_eq!(
            person.as_ref().map(NewPerson::full_name).ok().as_deref(),
            Some("Jan Jansen")
        );
    }

    #[test]
    fn test_new_person_rejects_future_birth_date() {
        let result = NewPerson::new_as_of("Jan", "Jansen", date(2030, 1, 1), "x", date(2024, 1, 1));
        assert_eq!(
            result,
            Err(ValidationError::InFuture {
                field: "dateOfBirth"
            })
        );
    }

    #[test]
    fn test_new_person_rejects_long_address() {
        let address = "a".repeat(MAX_ADDRESS_LEN + 1);
        let result = NewPerson::new_as_of("Jan", "Jansen", date(1980, 1, 1), address, date(2024, 1, 1));
        assert!(matches!(
            result,
            Err(ValidationError::TooLong { field: "address", .. })
        ));
    }

    #[test]
    fn test_new_person_rejects_blank_last_name() {
        let result = NewPerson::new_as_of("Jan", " ", date(1980, 1, 1), "x", date(2024, 1, 1));
        assert_eq!(result, Err(ValidationError::Blank { field: "lastName" }));
    }

    #[test]
    fn test_update_replaces_only_address() -> Result<(), ValidationError> {
        let mut person =
            NewPerson::new_as_of("Jan", "Jansen", date(1980, 1, 1), "old", date(2024, 1, 1))?
                .into_person(PersonId::new(1));

        person.update(PersonUpdate::new("new")?);

        assert_eq!(person.address, "new");
        assert_eq!(person.first_name, "Jan");
        Ok(())
    }

    #[test]
    fn test_parse_date_of_birth() {
        assert_eq!(parse_date_of_birth("1980-06-18"), Ok(date(1980, 6, 18)));
        assert!(parse_date_of_birth("18/06/1980").is_err());
    }
}
