//! Team service for team management
//!
//! Every operation is authorized through [`TeamAuthorizationScope`]. Reads of
//! a single team distinguish a missing team (`NotFound`) from one the
//! principal may not see (`Forbidden`).

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::auth::{Principal, TeamAuthorizationScope};
use crate::domain::namespace::{Namespace, NamespaceRepository};
use crate::domain::team::{
    validate_team_description, validate_team_name, NewTeam, Team, TeamId, TeamMembership,
    TeamRepository, TeamRole,
};
use crate::domain::user::{UserId, UserRepository};
use crate::domain::{DomainError, FieldErrors};

/// Request for creating a new team
#[derive(Debug, Clone, Default)]
pub struct CreateTeamRequest {
    pub name: String,
    pub description: Option<String>,
    /// Owner of the new team, the creator when absent
    pub owner_id: Option<UserId>,
}

/// A team member with the username resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMember {
    pub user_id: UserId,
    pub username: String,
    pub role: TeamRole,
}

/// Team service for managing teams
#[derive(Debug, Clone)]
pub struct TeamService {
    teams: Arc<dyn TeamRepository>,
    users: Arc<dyn UserRepository>,
    namespaces: Arc<dyn NamespaceRepository>,
    scope: TeamAuthorizationScope,
}

impl TeamService {
    pub fn new(
        teams: Arc<dyn TeamRepository>,
        users: Arc<dyn UserRepository>,
        namespaces: Arc<dyn NamespaceRepository>,
        scope: TeamAuthorizationScope,
    ) -> Self {
        Self {
            teams,
            users,
            namespaces,
            scope,
        }
    }

    pub fn scope(&self) -> &TeamAuthorizationScope {
        &self.scope
    }

    /// Create a team owned by the requested owner or the principal
    ///
    /// The team, the owner's `Owner` membership and, when someone else
    /// creates it, the creator's `Viewer` membership are persisted together.
    pub async fn create_team(
        &self,
        principal: &Principal,
        request: CreateTeamRequest,
    ) -> Result<Team, DomainError> {
        if !self.scope.can_create_team(principal) {
            return Err(DomainError::unauthorized("You are not allowed to create teams"));
        }

        let name = request.name.trim().to_string();
        let description = request
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let mut fields = FieldErrors::new();
        if let Err(e) = validate_team_name(&name) {
            fields.insert(e.field().to_string(), e.to_string());
        }
        if let Err(e) = validate_team_description(description.as_deref()) {
            fields.insert(e.field().to_string(), e.to_string());
        }
        if !fields.is_empty() {
            return Err(DomainError::Validation {
                message: "Team is invalid".to_string(),
                fields,
            });
        }

        let owner_id = request.owner_id.unwrap_or(principal.user_id());
        if !self.scope.can_assign_owner(principal, owner_id) {
            return Err(DomainError::forbidden(
                "Only administrators can assign another owner",
            ));
        }
        if self.users.get(owner_id).await?.is_none() {
            return Err(DomainError::invalid_field(
                "owner_id",
                format!("User '{}' does not exist", owner_id),
            ));
        }

        let team = self
            .teams
            .create_with_owner(NewTeam {
                name,
                description,
                owner_id,
                creator_id: principal.user_id(),
            })
            .await?;

        info!(
            team_id = %team.id(),
            name = %team.name(),
            owner_id = %owner_id,
            created_by = %principal.user_id(),
            "Created team"
        );
        Ok(team)
    }

    /// Teams visible to the principal, in creation order
    pub async fn list_teams(&self, principal: &Principal) -> Result<Vec<Team>, DomainError> {
        if principal.is_admin() {
            return self.teams.list().await;
        }

        let visible: Vec<TeamId> = self.scope.visible_teams(principal).await?.into_iter().collect();
        debug!(user_id = %principal.user_id(), count = visible.len(), "Listing visible teams");

        self.teams.list_by_ids(&visible).await
    }

    pub async fn get_team(&self, principal: &Principal, team_id: TeamId) -> Result<Team, DomainError> {
        let team = self.require_team(team_id).await?;

        if !self.scope.can_view(principal, team_id).await? {
            return Err(deny(principal, team_id, "view"));
        }

        Ok(team)
    }

    /// Namespaces owned by a team
    pub async fn list_namespaces(
        &self,
        principal: &Principal,
        team_id: TeamId,
    ) -> Result<Vec<Namespace>, DomainError> {
        self.require_team(team_id).await?;

        if !self.scope.can_view_namespaces(principal, team_id).await? {
            return Err(deny(principal, team_id, "view namespaces of"));
        }

        self.namespaces.list_by_team(team_id).await
    }

    /// Members of a team, in join order
    pub async fn list_members(
        &self,
        principal: &Principal,
        team_id: TeamId,
    ) -> Result<Vec<TeamMember>, DomainError> {
        self.require_team(team_id).await?;

        if !self.scope.can_view_members(principal, team_id).await? {
            return Err(deny(principal, team_id, "view members of"));
        }

        let mut members = Vec::new();
        for membership in self.teams.members(team_id).await? {
            let Some(user) = self.users.get(membership.user_id).await? else {
                continue;
            };
            members.push(TeamMember {
                user_id: membership.user_id,
                username: user.username().to_string(),
                role: membership.role,
            });
        }

        Ok(members)
    }

    pub async fn add_member(
        &self,
        principal: &Principal,
        team_id: TeamId,
        user_id: UserId,
        role: TeamRole,
    ) -> Result<TeamMembership, DomainError> {
        self.require_team(team_id).await?;

        if !self.scope.can_manage_members(principal, team_id).await? {
            return Err(deny(principal, team_id, "manage members of"));
        }

        if self.users.get(user_id).await?.is_none() {
            return Err(DomainError::not_found(format!("User '{}' not found", user_id)));
        }

        let membership = self.teams.add_member(team_id, user_id, role).await?;
        info!(team_id = %team_id, user_id = %user_id, role = %role, "Added team member");

        Ok(membership)
    }

    /// Remove a member; a team's last owner stays
    pub async fn remove_member(
        &self,
        principal: &Principal,
        team_id: TeamId,
        user_id: UserId,
    ) -> Result<(), DomainError> {
        self.require_team(team_id).await?;

        if !self.scope.can_manage_members(principal, team_id).await? {
            return Err(deny(principal, team_id, "manage members of"));
        }

        // The repository refuses to remove the last owner.
        if !self.teams.remove_member(team_id, user_id).await? {
            return Err(DomainError::not_found(format!(
                "User '{}' is not a member of team '{}'",
                user_id, team_id
            )));
        }

        info!(team_id = %team_id, user_id = %user_id, "Removed team member");
        Ok(())
    }

    async fn require_team(&self, team_id: TeamId) -> Result<Team, DomainError> {
        self.teams
            .get(team_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", team_id)))
    }
}

fn deny(principal: &Principal, team_id: TeamId, action: &str) -> DomainError {
    debug!(user_id = %principal.user_id(), team_id = %team_id, action, "Team access denied");
    DomainError::forbidden(format!("You are not allowed to {} team '{}'", action, team_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::TeamCreationPolicy;
    use crate::domain::namespace::NewNamespace;
    use crate::domain::user::{NewUser, User};
    use crate::infrastructure::namespace::InMemoryNamespaceRepository;
    use crate::infrastructure::team::InMemoryTeamRepository;
    use crate::infrastructure::user::InMemoryUserRepository;

    struct Fixture {
        service: TeamService,
        namespaces: Arc<InMemoryNamespaceRepository>,
        admin: User,
        alice: User,
        bob: User,
    }

    async fn fixture_with_policy(policy: TeamCreationPolicy) -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        let admin = users.create(NewUser::new("root").admin()).await.unwrap();
        let alice = users.create(NewUser::new("alice")).await.unwrap();
        let bob = users.create(NewUser::new("bob")).await.unwrap();

        let teams = Arc::new(InMemoryTeamRepository::new());
        let namespaces = Arc::new(InMemoryNamespaceRepository::new());
        let scope = TeamAuthorizationScope::new(teams.clone()).with_creation_policy(policy);

        Fixture {
            service: TeamService::new(teams, users, namespaces.clone(), scope),
            namespaces,
            admin,
            alice,
            bob,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with_policy(TeamCreationPolicy::AnyUser).await
    }

    fn request(name: &str) -> CreateTeamRequest {
        CreateTeamRequest {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_team_defaults_owner_to_creator() {
        let f = fixture().await;
        let alice = Principal::from_session(&f.alice);

        let team = f.service.create_team(&alice, request("platform")).await.unwrap();

        assert_eq!(team.name(), "platform");
        assert_eq!(team.owner_id(), f.alice.id());
        assert!(team.is_valid());
        assert!(f.service.scope().can_manage_members(&alice, team.id()).await.unwrap());

        let members = f.service.list_members(&alice, team.id()).await.unwrap();
        assert_eq!(
            members,
            vec![TeamMember {
                user_id: f.alice.id(),
                username: "alice".to_string(),
                role: TeamRole::Owner,
            }]
        );
    }

    #[tokio::test]
    async fn test_create_team_validation() {
        let f = fixture().await;
        let alice = Principal::from_session(&f.alice);

        let result = f.service.create_team(&alice, request("   ")).await;
        match result {
            Err(e @ DomainError::Validation { .. }) => {
                assert!(e.field_errors().contains_key("name"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        let long = CreateTeamRequest {
            name: "platform".to_string(),
            description: Some("x".repeat(2000)),
            owner_id: None,
        };
        let result = f.service.create_team(&alice, long).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_team_duplicate_name() {
        let f = fixture().await;
        let alice = Principal::from_session(&f.alice);
        let bob = Principal::from_session(&f.bob);

        f.service.create_team(&alice, request("platform")).await.unwrap();
        let result = f.service.create_team(&bob, request("platform")).await;

        assert!(matches!(result, Err(DomainError::DuplicateName { .. })));
        assert!(f.service.list_teams(&bob).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_have_one_winner() {
        let f = fixture().await;
        let alice = Principal::from_session(&f.alice);
        let bob = Principal::from_session(&f.bob);

        let attempts = (0..16).map(|i| {
            let service = f.service.clone();
            let principal = if i % 2 == 0 { alice.clone() } else { bob.clone() };
            tokio::spawn(async move { service.create_team(&principal, request("platform")).await })
        });
        let results = futures::future::join_all(attempts).await;

        let mut created = 0;
        for result in results {
            match result.unwrap() {
                Ok(_) => created += 1,
                Err(DomainError::DuplicateName { name }) => assert_eq!(name, "platform"),
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }
        assert_eq!(created, 1);

        let admin = Principal::from_session(&f.admin);
        let teams = f.service.list_teams(&admin).await.unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(f.service.list_members(&admin, teams[0].id()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_owner_assignment() {
        let f = fixture().await;
        let alice = Principal::from_session(&f.alice);
        let admin = Principal::from_session(&f.admin);

        let for_bob = CreateTeamRequest {
            name: "web".to_string(),
            description: None,
            owner_id: Some(f.bob.id()),
        };
        let result = f.service.create_team(&alice, for_bob.clone()).await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));

        let team = f.service.create_team(&admin, for_bob).await.unwrap();
        assert_eq!(team.owner_id(), f.bob.id());

        let roles: Vec<(String, TeamRole)> = f
            .service
            .list_members(&admin, team.id())
            .await
            .unwrap()
            .into_iter()
            .map(|m| (m.username, m.role))
            .collect();
        assert_eq!(
            roles,
            vec![
                ("bob".to_string(), TeamRole::Owner),
                ("root".to_string(), TeamRole::Viewer)
            ]
        );

        let unknown = CreateTeamRequest {
            name: "ghosts".to_string(),
            description: None,
            owner_id: Some(UserId::new(999)),
        };
        let error = f.service.create_team(&admin, unknown).await.unwrap_err();
        assert!(error.field_errors().contains_key("owner_id"));
    }

    #[tokio::test]
    async fn test_admins_only_policy() {
        let f = fixture_with_policy(TeamCreationPolicy::AdminsOnly).await;
        let alice = Principal::from_session(&f.alice);
        let admin = Principal::from_session(&f.admin);

        let result = f.service.create_team(&alice, request("platform")).await;
        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));

        f.service.create_team(&admin, request("platform")).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_teams_is_scoped_and_ordered() {
        let f = fixture().await;
        let alice = Principal::from_session(&f.alice);
        let bob = Principal::from_session(&f.bob);
        let admin = Principal::from_session(&f.admin);

        f.service.create_team(&alice, request("zeta")).await.unwrap();
        f.service.create_team(&bob, request("beta")).await.unwrap();
        f.service.create_team(&alice, request("alpha")).await.unwrap();

        let names = |teams: Vec<Team>| -> Vec<String> {
            teams.iter().map(|t| t.name().to_string()).collect()
        };

        assert_eq!(names(f.service.list_teams(&alice).await.unwrap()), vec!["zeta", "alpha"]);
        assert_eq!(names(f.service.list_teams(&bob).await.unwrap()), vec!["beta"]);
        assert_eq!(
            names(f.service.list_teams(&admin).await.unwrap()),
            vec!["zeta", "beta", "alpha"]
        );
    }

    #[tokio::test]
    async fn test_get_team_forbidden_vs_not_found() {
        let f = fixture().await;
        let alice = Principal::from_session(&f.alice);
        let bob = Principal::from_session(&f.bob);
        let admin = Principal::from_session(&f.admin);

        let team = f.service.create_team(&alice, request("platform")).await.unwrap();

        let forbidden = f.service.get_team(&bob, team.id()).await.unwrap_err();
        let missing = f.service.get_team(&bob, TeamId::new(999)).await.unwrap_err();

        assert!(matches!(forbidden, DomainError::Forbidden { .. }));
        assert!(matches!(missing, DomainError::NotFound { .. }));
        assert_ne!(forbidden.status_code(), missing.status_code());

        assert_eq!(f.service.get_team(&alice, team.id()).await.unwrap().id(), team.id());
        assert_eq!(f.service.get_team(&admin, team.id()).await.unwrap().id(), team.id());
    }

    #[tokio::test]
    async fn test_list_namespaces() {
        let f = fixture().await;
        let alice = Principal::from_session(&f.alice);
        let bob = Principal::from_session(&f.bob);

        let team = f.service.create_team(&alice, request("platform")).await.unwrap();
        f.namespaces
            .create(NewNamespace::new("platform", team.id()))
            .await
            .unwrap();

        let namespaces = f.service.list_namespaces(&alice, team.id()).await.unwrap();
        assert_eq!(namespaces.len(), 1);
        assert_eq!(namespaces[0].name, "platform");

        assert!(matches!(
            f.service.list_namespaces(&bob, team.id()).await,
            Err(DomainError::Forbidden { .. })
        ));
        assert!(matches!(
            f.service.list_namespaces(&bob, TeamId::new(999)).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_member_management() {
        let f = fixture().await;
        let alice = Principal::from_session(&f.alice);
        let bob = Principal::from_session(&f.bob);

        let team = f.service.create_team(&alice, request("platform")).await.unwrap();

        // Non-members cannot see or manage members
        assert!(matches!(
            f.service.list_members(&bob, team.id()).await,
            Err(DomainError::Forbidden { .. })
        ));

        f.service
            .add_member(&alice, team.id(), f.bob.id(), TeamRole::Viewer)
            .await
            .unwrap();
        assert_eq!(f.service.list_members(&bob, team.id()).await.unwrap().len(), 2);
        assert_eq!(f.service.get_team(&bob, team.id()).await.unwrap().name(), "platform");

        // Viewers cannot manage members
        let result = f
            .service
            .add_member(&bob, team.id(), f.admin.id(), TeamRole::Viewer)
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));

        let duplicate = f
            .service
            .add_member(&alice, team.id(), f.bob.id(), TeamRole::Contributor)
            .await;
        assert!(matches!(duplicate, Err(DomainError::Conflict { .. })));

        f.service
            .remove_member(&alice, team.id(), f.bob.id())
            .await
            .unwrap();
        assert!(matches!(
            f.service.get_team(&bob, team.id()).await,
            Err(DomainError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn test_last_owner_cannot_be_removed() {
        let f = fixture().await;
        let alice = Principal::from_session(&f.alice);
        let admin = Principal::from_session(&f.admin);

        let team = f.service.create_team(&alice, request("platform")).await.unwrap();

        let result = f.service.remove_member(&admin, team.id(), f.alice.id()).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));

        f.service
            .add_member(&admin, team.id(), f.bob.id(), TeamRole::Owner)
            .await
            .unwrap();
        f.service
            .remove_member(&admin, team.id(), f.alice.id())
            .await
            .unwrap();

        let missing = f.service.remove_member(&admin, team.id(), f.alice.id()).await;
        assert!(matches!(missing, Err(DomainError::NotFound { .. })));
    }
}
