//! Search criteria and the composable predicate built from them.
//!
//! [`PersonSearchCriteria`] holds optional equality filters. Folding the
//! present ones into a [`PersonPredicate`] gives one conjunction; absent
//! filters contribute the match-everything predicate, which is the identity
//! of [`PersonPredicate::and`]. An empty criteria therefore matches every
//! person rather than none.
//!
//! The predicate is plain data. It can be evaluated in memory with
//! [`PersonPredicate::matches`] or translated by a store into its own query
//! language by walking [`PersonPredicate::clauses`].

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::Person;

/// Optional filters for person lookups. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSearchCriteria {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl PersonSearchCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    #[must_use]
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none()
    }
}

impl fmt::Display for PersonSearchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PersonSearchCriteria {{firstName={:?}, lastName={:?}}}",
            self.first_name, self.last_name
        )
    }
}

/// Person attributes a predicate can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum PersonField {
    FirstName,
    LastName,
}

impl PersonField {
    fn value_of(self, person: &Person) -> &str {
        match self {
            Self::FirstName => &person.first_name,
            Self::LastName => &person.last_name,
        }
    }
}

/// `field = value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonClause {
    field: PersonField,
    value: String,
}

impl PersonClause {
    #[must_use]
    pub const fn field(&self) -> PersonField {
        self.field
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    fn matches(&self, person: &Person) -> bool {
        self.field.value_of(person) == self.value
    }
}

impl fmt::Display for PersonClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = '{}'", self.field, self.value)
    }
}

/// Conjunction of equality clauses. No clauses means "match everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonPredicate {
    clauses: Vec<PersonClause>,
}

impl PersonPredicate {
    /// The predicate every person satisfies.
    #[must_use]
    pub const fn match_all() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    #[must_use]
    pub fn equal(field: PersonField, value: impl Into<String>) -> Self {
        Self {
            clauses: vec![PersonClause {
                field,
                value: value.into(),
            }],
        }
    }

    /// Equality on `field` when `value` is present, match-all otherwise.
    #[must_use]
    pub fn equal_if_present(field: PersonField, value: Option<&str>) -> Self {
        value.map_or_else(Self::match_all, |v| Self::equal(field, v))
    }

    #[must_use]
    pub fn first_name_equal_to(first_name: Option<&str>) -> Self {
        Self::equal_if_present(PersonField::FirstName, first_name)
    }

    #[must_use]
    pub fn last_name_equal_to(last_name: Option<&str>) -> Self {
        Self::equal_if_present(PersonField::LastName, last_name)
    }

    /// Fold the present filters of `criteria` into one conjunction.
    #[must_use]
    pub fn from_criteria(criteria: &PersonSearchCriteria) -> Self {
        [
            Self::first_name_equal_to(criteria.first_name.as_deref()),
            Self::last_name_equal_to(criteria.last_name.as_deref()),
        ]
        .into_iter()
        .fold(Self::match_all(), Self::and)
    }

    /// Logical AND. Match-all on either side returns the other side as is.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        if self.is_match_all() {
            return other;
        }
        if other.is_match_all() {
            return self;
        }

        let mut clauses = self.clauses;
        clauses.extend(other.clauses);
        Self { clauses }
    }

    #[must_use]
    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty()
    }

    #[must_use]
    pub fn clauses(&self) -> &[PersonClause] {
        &self.clauses
    }

    #[must_use]
    pub fn matches(&self, person: &Person) -> bool {
        self.clauses.iter().all(|clause| clause.matches(person))
    }
}

impl From<&PersonSearchCriteria> for PersonPredicate {
    fn from(criteria: &PersonSearchCriteria) -> Self {
        Self::from_criteria(criteria)
    }
}

impl fmt::Display for PersonPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_match_all() {
            return write!(f, "TRUE");
        }
        write!(f, "{}", self.clauses.iter().join(" AND "))
    }
}
