//! `PORTUS-AUTH` header authentication
//!
//! Header value: `<username>:<application>:<secret>`. Stateless; a token stays
//! valid until it is deleted.

use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::{debug, info};

use crate::domain::application_token::TokenCredential;
use crate::domain::auth::{AuthenticationFailure, Principal};
use crate::domain::user::UserRepository;
use crate::domain::DomainError;

use super::store::TokenStore;

/// Default name of the authentication header
pub const DEFAULT_AUTH_HEADER: &str = "PORTUS-AUTH";

// Verified against on lookup misses so every failure path performs one hash
// comparison.
static DUMMY_CREDENTIAL: Lazy<TokenCredential> = Lazy::new(|| {
    TokenCredential::generate(&TokenCredential::generate_secret(
        TokenCredential::DEFAULT_SECRET_BYTES,
    ))
});

/// Fields carried by the auth header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaim<'a> {
    pub username: &'a str,
    pub application: &'a str,
    pub secret: &'a str,
}

/// Split a header value into its three fields
///
/// Any other field count, or an empty field, is `MalformedHeader`. The
/// two-field `<username>:<application>` form is rejected.
pub fn parse_auth_header(value: &str) -> Result<TokenClaim<'_>, AuthenticationFailure> {
    let mut fields = value.trim().split(':');

    match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(username), Some(application), Some(secret), None)
            if !username.is_empty() && !application.is_empty() && !secret.is_empty() =>
        {
            Ok(TokenClaim {
                username,
                application,
                secret,
            })
        }
        _ => Err(AuthenticationFailure::MalformedHeader),
    }
}

/// Resolves principals from the application token header
#[derive(Debug, Clone)]
pub struct TokenAuthenticator {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenStore>,
    header_name: String,
}

impl TokenAuthenticator {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<TokenStore>) -> Self {
        Self {
            users,
            tokens,
            header_name: DEFAULT_AUTH_HEADER.to_string(),
        }
    }

    /// Set the header name (builder pattern)
    pub fn with_header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into();
        self
    }

    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    /// Authenticate a raw header value
    pub async fn authenticate(&self, header_value: &str) -> Result<Principal, DomainError> {
        match self.verify(header_value).await {
            Ok(principal) => {
                info!(
                    user_id = %principal.user_id(),
                    method = "application_token",
                    "Authenticated request"
                );
                Ok(principal)
            }
            Err(DomainError::Authentication(failure)) => {
                info!(reason = failure.reason(), "Application token authentication failed");
                Err(failure.into())
            }
            Err(e) => Err(e),
        }
    }

    /// Find the auth header among request headers and authenticate it
    ///
    /// Returns `Ok(None)` when the header is absent so the caller can fall
    /// back to the session path. Header names compare case-insensitively.
    pub async fn authenticate_headers<'a, I>(&self, headers: I) -> Result<Option<Principal>, DomainError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let value = headers
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&self.header_name))
            .map(|(_, value)| value);

        match value {
            Some(value) => self.authenticate(value).await.map(Some),
            None => Ok(None),
        }
    }

    async fn verify(&self, header_value: &str) -> Result<Principal, DomainError> {
        let claim = parse_auth_header(header_value)?;

        let Some(user) = self.users.get_by_username(claim.username).await? else {
            DUMMY_CREDENTIAL.verify(claim.secret);
            return Err(AuthenticationFailure::UnknownUser.into());
        };

        let Some(token) = self
            .tokens
            .find_by_user_and_application(user.id(), claim.application)
            .await?
        else {
            DUMMY_CREDENTIAL.verify(claim.secret);
            return Err(AuthenticationFailure::UnknownApplication.into());
        };

        if !token.credential().verify(claim.secret) {
            debug!(user_id = %user.id(), token_id = %token.id(), "Token secret mismatch");
            return Err(AuthenticationFailure::InvalidSecret.into());
        }

        Ok(Principal::from_application_token(&user, token.application()))
    }
}
