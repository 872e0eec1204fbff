//! Application token entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::credential::TokenCredential;
use crate::domain::user::UserId;

/// Storage-assigned application token identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationTokenId(i64);

impl ApplicationTokenId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ApplicationTokenId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ApplicationTokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted application token
///
/// Never mutated after creation; rotation is delete followed by create.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationToken {
    id: ApplicationTokenId,
    user_id: UserId,
    application: String,
    #[serde(skip_serializing)]
    credential: TokenCredential,
    created_at: DateTime<Utc>,
}

impl ApplicationToken {
    pub fn new(
        id: ApplicationTokenId,
        user_id: UserId,
        application: impl Into<String>,
        credential: TokenCredential,
    ) -> Self {
        Self {
            id,
            user_id,
            application: application.into(),
            credential,
            created_at: Utc::now(),
        }
    }

    /// Override the creation timestamp when loading from storage
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn id(&self) -> ApplicationTokenId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    pub fn credential(&self) -> &TokenCredential {
        &self.credential
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Check if the token belongs to the given user
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// A token that has not been persisted yet
#[derive(Debug, Clone)]
pub struct NewApplicationToken {
    pub user_id: UserId,
    pub application: String,
    pub credential: TokenCredential,
}
