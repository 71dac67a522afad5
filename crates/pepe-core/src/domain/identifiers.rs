//! Surrogate identifiers assigned by the store.
//!
//! Both ids wrap a positive `i64`. Parsing from text rejects zero, negative
//! and non-numeric input so the services never see an impossible id.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::ValidationError;

macro_rules! surrogate_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a store-assigned row id.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Parse a positive integer id from user input.
            pub fn parse(input: &str) -> Result<Self, ValidationError> {
                input
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .filter(|raw| *raw > 0)
                    .map(Self)
                    .ok_or_else(|| ValidationError::NotAnId {
                        value: input.to_string(),
                    })
            }

            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

surrogate_id!(
    /// Identity of a [`super::Person`].
    PersonId
);

surrogate_id!(
    /// Identity of a [`super::Pet`].
    PetId
);
