//! Pet records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{validation::required_text, PetId, ValidationError};

/// Maximum length of a pet name. Names are not unique.
pub const MAX_PET_NAME_LEN: usize = 100;

/// Age of a pet in whole years, `1..=199`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PetAge(u8);

impl PetAge {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 199;

    pub fn new(years: i64) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&years) {
            u8::try_from(years)
                .map(Self)
                .map_err(|_| Self::out_of_range(years))
        } else {
            Err(Self::out_of_range(years))
        }
    }

    #[must_use]
    pub const fn years(self) -> u8 {
        self.0
    }

    const fn out_of_range(actual: i64) -> ValidationError {
        ValidationError::OutOfRange {
            field: "age",
            min: Self::MIN,
            max: Self::MAX,
            actual,
        }
    }
}

impl TryFrom<i64> for PetAge {
    type Error = ValidationError;

    fn try_from(years: i64) -> Result<Self, Self::Error> {
        Self::new(years)
    }
}

impl From<PetAge> for i64 {
    fn from(age: PetAge) -> Self {
        Self::from(age.0)
    }
}

impl fmt::Display for PetAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub age: PetAge,
}

impl Pet {
    /// Replace name and age.
    pub fn update(&mut self, update: NewPet) {
        self.name = update.name;
        self.age = update.age;
    }
}

impl fmt::Display for Pet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pet {{id={}, name='{}', age={}}}", self.id, self.name, self.age)
    }
}

/// Validated pet fields, used for both create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPet {
    name: String,
    age: PetAge,
}

impl NewPet {
    pub fn new(name: impl Into<String>, age: i64) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required_text("name", name, MAX_PET_NAME_LEN)?,
            age: PetAge::new(age)?,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn age(&self) -> PetAge {
        self.age
    }

    /// Attach the id assigned by the store.
    #[must_use]
    pub fn into_pet(self, id: PetId) -> Pet {
        Pet {
            id,
            name: self.name,
            age: self.age,
        }
    }
}
