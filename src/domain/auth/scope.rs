//! Team authorization scope
//!
//! Explicit visibility filter applied at the service boundary. Reads
//! membership data only; never mutates.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::policy::{evaluate, PrincipalKind, ResourceKind, TeamAction, TeamCreationPolicy};
use super::principal::Principal;
use crate::domain::team::{TeamId, TeamRepository, TeamRole};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Computes which teams a principal can see and what it may do with them
#[derive(Debug, Clone)]
pub struct TeamAuthorizationScope {
    teams: Arc<dyn TeamRepository>,
    creation_policy: TeamCreationPolicy,
}

impl TeamAuthorizationScope {
    pub fn new(teams: Arc<dyn TeamRepository>) -> Self {
        Self {
            teams,
            creation_policy: TeamCreationPolicy::default(),
        }
    }

    /// Set the team creation policy (builder pattern)
    pub fn with_creation_policy(mut self, policy: TeamCreationPolicy) -> Self {
        self.creation_policy = policy;
        self
    }

    pub fn creation_policy(&self) -> TeamCreationPolicy {
        self.creation_policy
    }

    /// IDs of all teams the principal may see
    ///
    /// Administrators see every team, everyone else exactly the teams they
    /// hold a membership in.
    pub async fn visible_teams(&self, principal: &Principal) -> Result<BTreeSet<TeamId>, DomainError> {
        if principal.is_admin() {
            let teams = self.teams.list().await?;
            return Ok(teams.iter().map(|t| t.id()).collect());
        }

        let memberships = self.teams.memberships_for_user(principal.user_id()).await?;
        Ok(memberships.iter().map(|m| m.team_id).collect())
    }

    pub async fn can_view(&self, principal: &Principal, team_id: TeamId) -> Result<bool, DomainError> {
        self.permits(principal, ResourceKind::Team, TeamAction::View, team_id)
            .await
    }

    pub async fn can_view_members(
        &self,
        principal: &Principal,
        team_id: TeamId,
    ) -> Result<bool, DomainError> {
        self.permits(principal, ResourceKind::TeamMembers, TeamAction::View, team_id)
            .await
    }

    pub async fn can_view_namespaces(
        &self,
        principal: &Principal,
        team_id: TeamId,
    ) -> Result<bool, DomainError> {
        self.permits(principal, ResourceKind::TeamNamespaces, TeamAction::View, team_id)
            .await
    }

    pub async fn can_manage_members(
        &self,
        principal: &Principal,
        team_id: TeamId,
    ) -> Result<bool, DomainError> {
        self.permits(
            principal,
            ResourceKind::TeamMembers,
            TeamAction::ManageMembers,
            team_id,
        )
        .await
    }

    /// Policy hook for team creation
    pub fn can_create_team(&self, principal: &Principal) -> bool {
        evaluate(
            principal.kind(),
            ResourceKind::Team,
            TeamAction::Create,
            None,
            self.creation_policy,
        )
    }

    /// Whether the principal may make `owner_id` the owner of a new team
    pub fn can_assign_owner(&self, principal: &Principal, owner_id: UserId) -> bool {
        owner_id == principal.user_id()
            || evaluate(
                principal.kind(),
                ResourceKind::Team,
                TeamAction::AssignOwner,
                None,
                self.creation_policy,
            )
    }

    async fn permits(
        &self,
        principal: &Principal,
        resource: ResourceKind,
        action: TeamAction,
        team_id: TeamId,
    ) -> Result<bool, DomainError> {
        let role = self.role_of(principal, team_id).await?;
        Ok(evaluate(
            principal.kind(),
            resource,
            action,
            role,
            self.creation_policy,
        ))
    }

    async fn role_of(
        &self,
        principal: &Principal,
        team_id: TeamId,
    ) -> Result<Option<TeamRole>, DomainError> {
        // Administrator decisions never depend on membership.
        if principal.kind() == PrincipalKind::Administrator {
            return Ok(None);
        }

        Ok(self
            .teams
            .membership(team_id, principal.user_id())
            .await?
            .map(|m| m.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::team::NewTeam;
    use crate::domain::user::User;
    use crate::infrastructure::team::InMemoryTeamRepository;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn member(id: i64) -> Principal {
        Principal::from_session(&User::new(UserId::new(id), format!("user{}", id), false))
    }

    fn admin(id: i64) -> Principal {
        Principal::from_session(&User::new(UserId::new(id), format!("admin{}", id), true))
    }

    async fn create_team(repo: &InMemoryTeamRepository, name: &str, owner: i64) -> TeamId {
        repo.create_with_owner(NewTeam {
            name: name.to_string(),
            description: None,
            owner_id: UserId::new(owner),
            creator_id: UserId::new(owner),
        })
        .await
        .unwrap()
        .id()
    }

    #[tokio::test]
    async fn test_visible_teams_over_random_memberships() {
        for seed in 0..20u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let repo = Arc::new(InMemoryTeamRepository::new());
            let scope = TeamAuthorizationScope::new(repo.clone());

            // Users 1..=5 join teams at random; user 99 never joins anything.
            let mut expected: Vec<BTreeSet<TeamId>> = vec![BTreeSet::new(); 6];
            let mut all = BTreeSet::new();

            for t in 0..rng.gen_range(1..8) {
                let owner = rng.gen_range(1..=5);
                let team_id = create_team(&repo, &format!("team-{}", t), owner).await;
                expected[owner as usize].insert(team_id);
                all.insert(team_id);

                for user in 1..=5i64 {
                    if user != owner && rng.gen_bool(0.4) {
                        let role = TeamRole::ALL[rng.gen_range(0..TeamRole::ALL.len())];
                        repo.add_member(team_id, UserId::new(user), role)
                            .await
                            .unwrap();
                        expected[user as usize].insert(team_id);
                    }
                }
            }

            for user in 1..=5i64 {
                let principal = member(user);
                let visible = scope.visible_teams(&principal).await.unwrap();
                assert_eq!(visible, expected[user as usize], "seed {} user {}", seed, user);

                for team_id in &all {
                    assert_eq!(
                        scope.can_view(&principal, *team_id).await.unwrap(),
                        visible.contains(team_id)
                    );
                }
            }

            assert!(scope.visible_teams(&member(99)).await.unwrap().is_empty());
            assert_eq!(scope.visible_teams(&admin(100)).await.unwrap(), all);
        }
    }

    #[tokio::test]
    async fn test_member_permissions_follow_role() {
        let repo = Arc::new(InMemoryTeamRepository::new());
        let scope = TeamAuthorizationScope::new(repo.clone());
        let team_id = create_team(&repo, "platform", 1).await;
        repo.add_member(team_id, UserId::new(2), TeamRole::Contributor)
            .await
            .unwrap();

        let owner = member(1);
        let contributor = member(2);
        let outsider = member(3);

        assert!(scope.can_manage_members(&owner, team_id).await.unwrap());
        assert!(!scope.can_manage_members(&contributor, team_id).await.unwrap());
        assert!(scope.can_view_members(&contributor, team_id).await.unwrap());
        assert!(scope.can_view_namespaces(&contributor, team_id).await.unwrap());
        assert!(!scope.can_view_members(&outsider, team_id).await.unwrap());
        assert!(!scope.can_view_namespaces(&outsider, team_id).await.unwrap());

        assert!(scope.can_manage_members(&admin(4), team_id).await.unwrap());
    }

    #[test]
    fn test_creation_and_owner_assignment() {
        let scope = TeamAuthorizationScope::new(Arc::new(InMemoryTeamRepository::new()));
        let alice = member(1);

        assert!(scope.can_create_team(&alice));
        assert!(scope.can_assign_owner(&alice, UserId::new(1)));
        assert!(!scope.can_assign_owner(&alice, UserId::new(2)));
        assert!(scope.can_assign_owner(&admin(9), UserId::new(2)));

        let scope = scope.with_creation_policy(TeamCreationPolicy::AdminsOnly);
        assert!(!scope.can_create_team(&alice));
        assert!(scope.can_create_team(&admin(9)));
    }
}
