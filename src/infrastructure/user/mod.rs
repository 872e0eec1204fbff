//! User infrastructure implementations

mod in_memory;
mod password;
mod postgres_repository;
mod service;
mod session;

pub use in_memory::InMemoryUserRepository;
pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub use service::{CreateUserRequest, UserService};
pub use session::SessionAuthenticator;
