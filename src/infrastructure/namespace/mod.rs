//! Namespace infrastructure implementations

mod in_memory;
mod postgres_repository;

pub use in_memory::InMemoryNamespaceRepository;
pub use postgres_repository::PostgresNamespaceRepository;
