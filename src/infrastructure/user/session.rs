//! Interactive session authentication

use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::{debug, info};

use crate::domain::auth::{AuthenticationFailure, Principal};
use crate::domain::user::{UserId, UserRepository};
use crate::domain::DomainError;

use super::password::{Argon2Hasher, PasswordHasher};

// Verified against when the username is unknown so both paths pay for one
// Argon2 verification.
static DUMMY_PASSWORD_HASH: Lazy<Option<String>> =
    Lazy::new(|| Argon2Hasher::new().hash("portus-dummy-password").ok());

/// Resolves session principals
///
/// `login` checks a username and password; `resume` rebuilds the principal for
/// a user id the transport layer kept in its session, re-reading the
/// administrator flag.
#[derive(Debug, Clone)]
pub struct SessionAuthenticator {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl SessionAuthenticator {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Authenticate with username and password
    pub async fn login(&self, username: &str, password: &str) -> Result<Principal, DomainError> {
        let user = self.users.get_by_username(username).await?;

        let verified = match (&user, user.as_ref().and_then(|u| u.password_hash())) {
            (Some(_), Some(hash)) => self.hasher.verify(password, hash),
            _ => {
                if let Some(dummy) = DUMMY_PASSWORD_HASH.as_deref() {
                    self.hasher.verify(password, dummy);
                }
                false
            }
        };

        match user {
            Some(user) if verified => {
                info!(user_id = %user.id(), "Session login");
                Ok(Principal::from_session(&user))
            }
            _ => {
                debug!(username = %username, "Session login rejected");
                Err(AuthenticationFailure::InvalidCredentials.into())
            }
        }
    }

    /// Rebuild the principal of an established session
    pub async fn resume(&self, user_id: UserId) -> Result<Principal, DomainError> {
        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or(DomainError::Authentication(AuthenticationFailure::UnknownUser))?;

        Ok(Principal::from_session(&user))
    }

    /// Resolve a session principal by username without a password
    ///
    /// For trusted operator tooling only.
    pub async fn impersonate(&self, username: &str) -> Result<Principal, DomainError> {
        let user = self
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", username)))?;

        Ok(Principal::from_session(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::AuthMethod;
    use crate::domain::user::NewUser;
    use crate::infrastructure::user::InMemoryUserRepository;

    async fn setup() -> (SessionAuthenticator, UserId) {
        let users = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(Argon2Hasher::new());
        let hash = hasher.hash("wonderland").unwrap();

        let alice = users
            .create(NewUser::new("alice").with_password_hash(hash))
            .await
            .unwrap();
        users.create(NewUser::new("bot")).await.unwrap();

        (SessionAuthenticator::new(users, hasher), alice.id())
    }

    #[tokio::test]
    async fn test_login_success() {
        let (auth, alice_id) = setup().await;

        let principal = auth.login("alice", "wonderland").await.unwrap();
        assert_eq!(principal.user_id(), alice_id);
        assert_eq!(principal.method(), &AuthMethod::Session);
    }

    #[tokio::test]
    async fn test_login_failures_are_uniform() {
        let (auth, _) = setup().await;

        for (username, password) in [("alice", "wrong-pass"), ("nobody", "wonderland"), ("bot", "x")] {
            let err = auth.login(username, password).await.unwrap_err();
            assert!(matches!(
                err,
                DomainError::Authentication(AuthenticationFailure::InvalidCredentials)
            ));
        }
    }

    #[tokio::test]
    async fn test_resume_session() {
        let (auth, alice_id) = setup().await;

        let principal = auth.resume(alice_id).await.unwrap();
        assert_eq!(principal.username(), "alice");

        let err = auth.resume(UserId::new(999)).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Authentication(AuthenticationFailure::UnknownUser)
        ));
    }

    #[tokio::test]
    async fn test_impersonate() {
        let (auth, _) = setup().await;

        assert_eq!(auth.impersonate("bot").await.unwrap().username(), "bot");
        assert!(matches!(
            auth.impersonate("ghost").await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
