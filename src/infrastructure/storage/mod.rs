//! Storage infrastructure - connection pool, schema and shared helpers

pub mod migrations;
mod postgres;

pub use migrations::{access_migrations, Migration, PostgresMigrator};
pub use postgres::{connect, is_unique_violation, storage_error, PostgresConfig};

use std::sync::PoisonError;

use crate::domain::DomainError;

/// Map a poisoned in-memory lock to a storage error
pub(crate) fn poisoned<T>(e: PoisonError<T>) -> DomainError {
    DomainError::storage(format!("Failed to acquire lock: {}", e))
}
