//! Token store
//!
//! Persistence boundary for application tokens. Hashes secrets on the way in,
//! enforces ownership on deletion and records audit events.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::application_token::{
    validate_application, validate_secret, ApplicationToken, ApplicationTokenId,
    ApplicationTokenRepository, NewApplicationToken, TokenCredential,
};
use crate::domain::audit::{AuditAction, AuditEvent, AuditSink};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// A freshly issued token and its cleartext secret
///
/// The secret is only available here; it is never stored.
#[derive(Debug)]
pub struct IssuedToken {
    pub token: ApplicationToken,
    pub secret: String,
}

/// Application token store
#[derive(Debug, Clone)]
pub struct TokenStore {
    repository: Arc<dyn ApplicationTokenRepository>,
    audit: Arc<dyn AuditSink>,
    salt_bytes: usize,
    secret_bytes: usize,
}

impl TokenStore {
    pub fn new(repository: Arc<dyn ApplicationTokenRepository>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            repository,
            audit,
            salt_bytes: TokenCredential::DEFAULT_SALT_BYTES,
            secret_bytes: TokenCredential::DEFAULT_SECRET_BYTES,
        }
    }

    /// Set the salt length in bytes (builder pattern)
    pub fn with_salt_bytes(mut self, bytes: usize) -> Self {
        self.salt_bytes = bytes;
        self
    }

    /// Set the generated secret length in bytes (builder pattern)
    pub fn with_secret_bytes(mut self, bytes: usize) -> Self {
        self.secret_bytes = bytes;
        self
    }

    /// Store a token for `(user_id, application)` with a caller-chosen secret
    ///
    /// Fails with `DuplicateApplication` if the user already has a token with
    /// that label.
    pub async fn create(
        &self,
        user_id: UserId,
        application: &str,
        raw_secret: &str,
    ) -> Result<ApplicationToken, DomainError> {
        validate_application(application)
            .map_err(|e| DomainError::invalid_field(e.field(), e.to_string()))?;
        validate_secret(raw_secret)
            .map_err(|e| DomainError::invalid_field(e.field(), e.to_string()))?;

        let token = self
            .repository
            .create(NewApplicationToken {
                user_id,
                application: application.to_string(),
                credential: TokenCredential::generate_with_salt_bytes(raw_secret, self.salt_bytes),
            })
            .await?;

        info!(
            user_id = %user_id,
            token_id = %token.id(),
            application = %application,
            "Created application token"
        );
        self.audit.record(AuditEvent::new(
            user_id,
            AuditAction::ApplicationTokenCreated,
            application,
        ));

        Ok(token)
    }

    /// Generate a random secret and store a token for it
    pub async fn issue(&self, user_id: UserId, application: &str) -> Result<IssuedToken, DomainError> {
        let secret = TokenCredential::generate_secret(self.secret_bytes);
        let token = self.create(user_id, application, &secret).await?;

        Ok(IssuedToken { token, secret })
    }

    pub async fn find_by_user_and_application(
        &self,
        user_id: UserId,
        application: &str,
    ) -> Result<Option<ApplicationToken>, DomainError> {
        self.repository
            .find_by_user_and_application(user_id, application)
            .await
    }

    /// Tokens owned by a user, in creation order
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ApplicationToken>, DomainError> {
        self.repository.list_for_user(user_id).await
    }

    /// Delete a token on behalf of `requesting_user_id`
    ///
    /// `NotFound` if the token does not exist (including a second delete),
    /// `NotOwner` if it belongs to someone else.
    pub async fn delete(
        &self,
        token_id: ApplicationTokenId,
        requesting_user_id: UserId,
    ) -> Result<ApplicationToken, DomainError> {
        let token = self
            .repository
            .get(token_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("Application token '{}' not found", token_id))
            })?;

        if !token.is_owned_by(requesting_user_id) {
            debug!(
                token_id = %token_id,
                requesting_user_id = %requesting_user_id,
                "Rejected delete of foreign application token"
            );
            return Err(DomainError::not_owner(format!(
                "Application token '{}' belongs to another user",
                token_id
            )));
        }

        // A concurrent delete may have won since the read.
        if !self.repository.delete(token_id).await? {
            return Err(DomainError::not_found(format!(
                "Application token '{}' not found",
                token_id
            )));
        }

        info!(
            user_id = %requesting_user_id,
            token_id = %token_id,
            application = %token.application(),
            "Deleted application token"
        );
        self.audit.record(AuditEvent::new(
            requesting_user_id,
            AuditAction::ApplicationTokenDestroyed,
            token.application(),
        ));

        Ok(token)
    }
}
