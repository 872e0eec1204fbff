//! In-memory team repository

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::team::{NewTeam, Team, TeamId, TeamMembership, TeamRepository, TeamRole};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::poisoned;

#[derive(Debug, Default)]
struct TeamTable {
    next_id: i64,
    teams: BTreeMap<TeamId, Team>,
    by_name: HashMap<String, TeamId>,
    // Insertion order doubles as join order
    memberships: Vec<TeamMembership>,
}

/// Thread-safe in-memory implementation of TeamRepository
///
/// Teams and memberships live in one table behind one lock, so the team and
/// its owner membership appear together or not at all.
#[derive(Debug, Default)]
pub struct InMemoryTeamRepository {
    table: RwLock<TeamTable>,
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn get(&self, id: TeamId) -> Result<Option<Team>, DomainError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.teams.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Team>, DomainError> {
        let table = self.table.read().map_err(poisoned)?;

        Ok(table
            .by_name
            .get(name)
            .and_then(|id| table.teams.get(id))
            .cloned())
    }

    async fn create_with_owner(&self, team: NewTeam) -> Result<Team, DomainError> {
        let mut table = self.table.write().map_err(poisoned)?;

        if table.by_name.contains_key(&team.name) {
            return Err(DomainError::duplicate_name(team.name));
        }

        let id = TeamId::new(table.next_id + 1);
        let memberships = team.initial_memberships();
        let created = Team::new(id, &team.name, team.owner_id)
            .map_err(|e| DomainError::invalid_field(e.field(), e.to_string()))?
            .with_description(team.description);

        table.next_id += 1;
        table.by_name.insert(team.name, id);
        table.teams.insert(id, created.clone());
        for (user_id, role) in memberships {
            table
                .memberships
                .push(TeamMembership::new(user_id, id, role));
        }

        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Team>, DomainError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.teams.values().cloned().collect())
    }

    async fn list_by_ids(&self, ids: &[TeamId]) -> Result<Vec<Team>, DomainError> {
        let table = self.table.read().map_err(poisoned)?;

        Ok(table
            .teams
            .values()
            .filter(|t| ids.contains(&t.id()))
            .cloned()
            .collect())
    }

    async fn membership(
        &self,
        team_id: TeamId,
        user_id: UserId,
    ) -> Result<Option<TeamMembership>, DomainError> {
        let table = self.table.read().map_err(poisoned)?;

        Ok(table
            .memberships
            .iter()
            .find(|m| m.team_id == team_id && m.user_id == user_id)
            .cloned())
    }

    async fn memberships_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<TeamMembership>, DomainError> {
        let table = self.table.read().map_err(poisoned)?;

        Ok(table
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn members(&self, team_id: TeamId) -> Result<Vec<TeamMembership>, DomainError> {
        let table = self.table.read().map_err(poisoned)?;

        Ok(table
            .memberships
            .iter()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn add_member(
        &self,
        team_id: TeamId,
        user_id: UserId,
        role: TeamRole,
    ) -> Result<TeamMembership, DomainError> {
        let mut table = self.table.write().map_err(poisoned)?;

        if !table.teams.contains_key(&team_id) {
            return Err(DomainError::not_found(format!("Team '{}' not found", team_id)));
        }

        if table
            .memberships
            .iter()
            .any(|m| m.team_id == team_id && m.user_id == user_id)
        {
            return Err(DomainError::conflict(format!(
                "User '{}' is already a member of team '{}'",
                user_id, team_id
            )));
        }

        let membership = TeamMembership::new(user_id, team_id, role);
        table.memberships.push(membership.clone());
        Ok(membership)
    }

    async fn remove_member(&self, team_id: TeamId, user_id: UserId) -> Result<bool, DomainError> {
        let mut table = self.table.write().map_err(poisoned)?;

        let Some(position) = table
            .memberships
            .iter()
            .position(|m| m.team_id == team_id && m.user_id == user_id)
        else {
            return Ok(false);
        };

        if table.memberships[position].role == TeamRole::Owner {
            let owners = table
                .memberships
                .iter()
                .filter(|m| m.team_id == team_id && m.role == TeamRole::Owner)
                .count();
            if owners == 1 {
                return Err(last_owner(team_id));
            }
        }

        table.memberships.remove(position);
        Ok(true)
    }
}

pub(super) fn last_owner(team_id: TeamId) -> DomainError {
    DomainError::conflict(format!("Cannot remove the last owner of team '{}'", team_id))
}
