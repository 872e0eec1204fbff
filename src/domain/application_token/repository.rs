//! Application token repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{ApplicationToken, ApplicationTokenId, NewApplicationToken};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for application token storage
#[async_trait]
pub trait ApplicationTokenRepository: Send + Sync + Debug {
    /// Get a token by ID
    async fn get(&self, id: ApplicationTokenId) -> Result<Option<ApplicationToken>, DomainError>;

    /// Look up the token a user holds for an application label
    async fn find_by_user_and_application(
        &self,
        user_id: UserId,
        application: &str,
    ) -> Result<Option<ApplicationToken>, DomainError>;

    /// Persist a token
    ///
    /// Fails with `DuplicateApplication` if the user already holds a token for
    /// the label. The check and the insert are atomic.
    async fn create(&self, token: NewApplicationToken) -> Result<ApplicationToken, DomainError>;

    /// Tokens of a user in creation order
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ApplicationToken>, DomainError>;

    /// Delete a token, returns true if a row was removed
    async fn delete(&self, id: ApplicationTokenId) -> Result<bool, DomainError>;
}
