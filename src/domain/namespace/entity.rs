//! Namespace entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::team::TeamId;

/// Storage-assigned namespace identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceId(i64);

impl NamespaceId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Namespace owned by a team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Namespace {
    pub id: NamespaceId,
    pub name: String,
    pub team_id: TeamId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A namespace that has not been persisted yet
#[derive(Debug, Clone)]
pub struct NewNamespace {
    pub name: String,
    pub team_id: TeamId,
    pub description: Option<String>,
}

impl NewNamespace {
    pub fn new(name: impl Into<String>, team_id: TeamId) -> Self {
        Self {
            name: name.into(),
            team_id,
            description: None,
        }
    }
}
