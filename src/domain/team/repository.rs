//! Team repository trait

use async_trait::async_trait;

use super::entity::{NewTeam, Team, TeamId};
use super::membership::{TeamMembership, TeamRole};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository for teams and their memberships
///
/// Teams and memberships share one repository so a team and its owner
/// membership can be written atomically.
#[async_trait]
pub trait TeamRepository: Send + Sync + std::fmt::Debug {
    /// Get a team by ID
    async fn get(&self, id: TeamId) -> Result<Option<Team>, DomainError>;

    /// Get a team by its unique name
    async fn get_by_name(&self, name: &str) -> Result<Option<Team>, DomainError>;

    /// Persist a team together with its initial memberships
    ///
    /// The owner joins as `Owner`; a creator who is not the owner joins as
    /// `Viewer` (see [`NewTeam::initial_memberships`]).
    ///
    /// Fails with `DuplicateName` when the name is taken. The uniqueness check
    /// and both inserts happen atomically.
    async fn create_with_owner(&self, team: NewTeam) -> Result<Team, DomainError>;

    /// All teams in creation order
    async fn list(&self) -> Result<Vec<Team>, DomainError>;

    /// Teams with the given IDs, in creation order
    async fn list_by_ids(&self, ids: &[TeamId]) -> Result<Vec<Team>, DomainError>;

    /// Membership of a user in a team, if any
    async fn membership(
        &self,
        team_id: TeamId,
        user_id: UserId,
    ) -> Result<Option<TeamMembership>, DomainError>;

    /// All memberships held by a user
    async fn memberships_for_user(&self, user_id: UserId)
        -> Result<Vec<TeamMembership>, DomainError>;

    /// All memberships of a team, in join order
    async fn members(&self, team_id: TeamId) -> Result<Vec<TeamMembership>, DomainError>;

    /// Add a member; fails with a conflict if the user is already a member
    async fn add_member(
        &self,
        team_id: TeamId,
        user_id: UserId,
        role: TeamRole,
    ) -> Result<TeamMembership, DomainError>;

    /// Remove a member, returns true if a membership was removed
    ///
    /// Fails with a conflict when the member is the team's last owner. The
    /// owner count and the delete happen atomically.
    async fn remove_member(&self, team_id: TeamId, user_id: UserId) -> Result<bool, DomainError>;
}
