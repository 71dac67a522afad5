//! # Pepe
//!
//! Command line front end for person/pet ownership records.
//!
//! Parses and validates arguments into `pepe_core` domain types, calls the
//! services, and prints plain text. Failures map to exit codes:
//! validation `1`, conflict `3`, internal `4`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod logging;
