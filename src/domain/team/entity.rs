//! Team entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::membership::TeamRole;
use super::validation::{validate_team_name, TeamValidationError};
use crate::domain::user::UserId;

/// Storage-assigned team identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(i64);

impl TeamId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for TeamId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for TeamId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Team entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier, monotonic in creation order
    id: TeamId,
    /// Globally unique display name
    name: String,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Owning user
    owner_id: UserId,
    /// Creation timestamp
    created_at: DateTime<Utc>,
}

impl Team {
    /// Create a team value, validating the name
    pub fn new(
        id: TeamId,
        name: impl Into<String>,
        owner_id: UserId,
    ) -> Result<Self, TeamValidationError> {
        let name = name.into();
        validate_team_name(&name)?;

        Ok(Self {
            id,
            name,
            description: None,
            owner_id,
            created_at: Utc::now(),
        })
    }

    /// Set description (builder pattern)
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Override the creation timestamp when loading from storage
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    // Getters

    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// A persisted team always passed validation on the way in
    pub fn is_valid(&self) -> bool {
        validate_team_name(&self.name).is_ok()
    }
}

/// A team that has not been persisted yet
#[derive(Debug, Clone)]
pub struct NewTeam {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: UserId,
    /// User creating the team; joins as a viewer when not the owner
    pub creator_id: UserId,
}

impl NewTeam {
    /// Memberships created together with the team
    pub fn initial_memberships(&self) -> Vec<(UserId, TeamRole)> {
        let mut memberships = vec![(self.owner_id, TeamRole::Owner)];
        if self.creator_id != self.owner_id {
            memberships.push((self.creator_id, TeamRole::Viewer));
        }
        memberships
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_creation() {
        let team = Team::new(TeamId::new(1), "platform", UserId::new(3)).unwrap();

        assert_eq!(team.name(), "platform");
        assert_eq!(team.owner_id(), UserId::new(3));
        assert!(team.description().is_none());
        assert!(team.is_valid());
    }

    #[test]
    fn test_team_with_description() {
        let team = Team::new(TeamId::new(1), "platform", UserId::new(3))
            .unwrap()
            .with_description(Some("Infra folks".to_string()));

        assert_eq!(team.description(), Some("Infra folks"));
    }

    #[test]
    fn test_team_invalid_name() {
        assert!(Team::new(TeamId::new(1), "", UserId::new(3)).is_err());
        assert!(Team::new(TeamId::new(1), "   ", UserId::new(3)).is_err());
    }

    #[test]
    fn test_initial_memberships() {
        let own = NewTeam {
            name: "platform".to_string(),
            description: None,
            owner_id: UserId::new(3),
            creator_id: UserId::new(3),
        };
        assert_eq!(own.initial_memberships(), vec![(UserId::new(3), TeamRole::Owner)]);

        let delegated = NewTeam {
            creator_id: UserId::new(1),
            ..own
        };
        assert_eq!(
            delegated.initial_memberships(),
            vec![
                (UserId::new(3), TeamRole::Owner),
                (UserId::new(1), TeamRole::Viewer)
            ]
        );
    }

    #[test]
    fn test_team_id_parse() {
        assert_eq!("42".parse::<TeamId>().unwrap(), TeamId::new(42));
        assert!("abc".parse::<TeamId>().is_err());
    }
}
