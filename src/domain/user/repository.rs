//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by ID
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by username (token header and login lookups)
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Persist a new user; fails with a conflict if the username is taken
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// List users in creation order
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Check if a user exists
    async fn exists(&self, id: UserId) -> Result<bool, DomainError> {
        Ok(self.get(id).await?.is_some())
    }
}
