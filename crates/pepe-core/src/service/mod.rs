//! Services: the transactional boundary of the core.
//!
//! Every public operation follows the same shape:
//!
//! 1. begin one store transaction
//! 2. run the operation body against it
//! 3. commit on success, roll back on any error
//!
//! Store failures are re-classified into [`ServiceError`] inside the body,
//! with the causing context logged first. Nothing of type `StoreError`
//! leaves this module.

mod association;
mod person;
mod pet;

pub use association::AssociationManager;
pub use person::PersonService;
pub use pet::PetService;

use crate::{
    error::{Result, ServiceError},
    store::{EntityStore, StoreError, StoreTx},
};

/// `context` is the "Could not ..." phrase of the operation, naming its ids.
async fn begin<S: EntityStore>(store: &S, context: &str) -> Result<S::Tx> {
    store.begin().await.map_err(|e| {
        tracing::error!(context, error = %e, "failed to begin transaction");
        ServiceError::internal(format!("{context}, unexpected error"))
    })
}

async fn finish<T, Tx: StoreTx>(tx: Tx, result: Result<T>, context: &str) -> Result<T> {
    match result {
        Ok(value) => match tx.commit().await {
            Ok(()) => Ok(value),
            Err(e) => Err(classify(
                &e,
                format!("{context}, db error"),
                format!("{context}, unexpected error"),
            )),
        },
        Err(error) => {
            if let Err(e) = tx.rollback().await {
                tracing::warn!(context, error = %e, "rollback failed");
            }
            Err(error)
        }
    }
}

/// Integrity violations become `conflict`, everything else `internal`.
fn classify(error: &StoreError, conflict: String, internal: String) -> ServiceError {
    match error {
        StoreError::IntegrityViolation(cause) => {
            tracing::error!(%cause, "{conflict}");
            ServiceError::Conflict(conflict)
        }
        StoreError::Database(cause) => {
            tracing::error!(%cause, "{internal}");
            ServiceError::Internal(internal)
        }
    }
}

fn internal(error: &StoreError, message: String) -> ServiceError {
    tracing::error!(cause = %error, "{message}");
    ServiceError::Internal(message)
}

fn conflict(message: String) -> ServiceError {
    tracing::error!("{message}");
    ServiceError::Conflict(message)
}
