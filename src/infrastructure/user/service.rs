//! User service for account provisioning

use std::sync::Arc;

use tracing::info;

use crate::domain::user::{validate_password, validate_username, NewUser, User, UserRepository};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    /// Password for interactive login; token-only accounts have none
    pub password: Option<String>,
    pub admin: bool,
}

/// User service for provisioning accounts
#[derive(Debug)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        validate_username(&request.username)
            .map_err(|e| DomainError::invalid_field("username", e.to_string()))?;

        let mut draft = NewUser::new(&request.username);
        if request.admin {
            draft = draft.admin();
        }

        if let Some(password) = request.password.as_deref() {
            validate_password(password)
                .map_err(|e| DomainError::invalid_field("password", e.to_string()))?;
            draft = draft.with_password_hash(self.hasher.hash(password)?);
        }

        let user = self.repository.create(draft).await?;
        info!(user_id = %user.id(), username = %user.username(), admin = user.is_admin(), "Created user");

        Ok(user)
    }

    /// Get a user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.repository.get_by_username(username).await
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repository.list().await
    }
}
