//! Team membership types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::TeamId;
use crate::domain::user::UserId;

/// Role of a user within a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    /// Team owner - manages members
    Owner,
    /// Can push to the team's namespaces
    Contributor,
    /// Read-only member
    #[default]
    Viewer,
}

impl TeamRole {
    pub const ALL: [TeamRole; 3] = [Self::Owner, Self::Contributor, Self::Viewer];

    /// Check if this role can manage team members
    pub fn can_manage_members(&self) -> bool {
        matches!(self, Self::Owner)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Contributor => "contributor",
            Self::Viewer => "viewer",
        }
    }
}

impl std::str::FromStr for TeamRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "contributor" => Ok(Self::Contributor),
            "viewer" => Ok(Self::Viewer),
            other => Err(format!("Unknown team role '{}'", other)),
        }
    }
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Join of a user and a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMembership {
    pub user_id: UserId,
    pub team_id: TeamId,
    pub role: TeamRole,
    pub created_at: DateTime<Utc>,
}

impl TeamMembership {
    pub fn new(user_id: UserId, team_id: TeamId, role: TeamRole) -> Self {
        Self {
            user_id,
            team_id,
            role,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_owner_manages_members() {
        assert!(TeamRole::Owner.can_manage_members());
        assert!(!TeamRole::Contributor.can_manage_members());
        assert!(!TeamRole::Viewer.can_manage_members());
    }

    #[test]
    fn test_role_parse() {
        for role in TeamRole::ALL {
            assert_eq!(role.as_str().parse::<TeamRole>().unwrap(), role);
        }
        assert!("admin".parse::<TeamRole>().is_err());
    }
}
