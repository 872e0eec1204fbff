//! Application token infrastructure
//!
//! Repositories, the token store (issuance, deletion, audit) and the
//! `PORTUS-AUTH` header authenticator.

mod authenticator;
mod in_memory;
mod postgres_repository;
mod store;

pub use authenticator::{parse_auth_header, TokenAuthenticator, TokenClaim, DEFAULT_AUTH_HEADER};
pub use in_memory::InMemoryApplicationTokenRepository;
pub use postgres_repository::PostgresApplicationTokenRepository;
pub use store::{IssuedToken, TokenStore};
