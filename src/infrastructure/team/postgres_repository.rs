//! PostgreSQL team repository

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::team::{NewTeam, Team, TeamId, TeamMembership, TeamRepository, TeamRole};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::{is_unique_violation, storage_error};

use super::in_memory::last_owner;

/// PostgreSQL implementation of TeamRepository
///
/// `UNIQUE (name)` on `teams` rejects concurrent duplicate names; the team and
/// its owner membership are inserted in one transaction.
#[derive(Debug, Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TEAM_COLUMNS: &str = "id, name, description, owner_id, created_at";
const MEMBERSHIP_COLUMNS: &str = "user_id, team_id, role, created_at";

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn get(&self, id: TeamId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM teams WHERE id = $1", TEAM_COLUMNS))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("get team", e))?;

        row.as_ref().map(row_to_team).transpose()
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM teams WHERE name = $1", TEAM_COLUMNS))
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("get team by name", e))?;

        row.as_ref().map(row_to_team).transpose()
    }

    async fn create_with_owner(&self, team: NewTeam) -> Result<Team, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("begin transaction", e))?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO teams (name, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            TEAM_COLUMNS
        ))
        .bind(&team.name)
        .bind(&team.description)
        .bind(team.owner_id.value())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::duplicate_name(&team.name)
            } else {
                storage_error("create team", e)
            }
        })?;

        let created = row_to_team(&row)?;

        for (user_id, role) in team.initial_memberships() {
            sqlx::query("INSERT INTO team_memberships (user_id, team_id, role) VALUES ($1, $2, $3)")
                .bind(user_id.value())
                .bind(created.id().value())
                .bind(role.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| storage_error("create initial membership", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| storage_error("commit team creation", e))?;

        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Team>, DomainError> {
        let rows = sqlx::query(&format!("SELECT {} FROM teams ORDER BY id", TEAM_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("list teams", e))?;

        rows.iter().map(row_to_team).collect()
    }

    async fn list_by_ids(&self, ids: &[TeamId]) -> Result<Vec<Team>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = ids.iter().map(|id| id.value()).collect();
        let rows = sqlx::query(&format!(
            "SELECT {} FROM teams WHERE id = ANY($1) ORDER BY id",
            TEAM_COLUMNS
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("list teams by id", e))?;

        rows.iter().map(row_to_team).collect()
    }

    async fn membership(
        &self,
        team_id: TeamId,
        user_id: UserId,
    ) -> Result<Option<TeamMembership>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM team_memberships WHERE team_id = $1 AND user_id = $2",
            MEMBERSHIP_COLUMNS
        ))
        .bind(team_id.value())
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("get team membership", e))?;

        row.as_ref().map(row_to_membership).transpose()
    }

    async fn memberships_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<TeamMembership>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM team_memberships WHERE user_id = $1 ORDER BY team_id",
            MEMBERSHIP_COLUMNS
        ))
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("list memberships for user", e))?;

        rows.iter().map(row_to_membership).collect()
    }

    async fn members(&self, team_id: TeamId) -> Result<Vec<TeamMembership>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM team_memberships WHERE team_id = $1 ORDER BY created_at, user_id",
            MEMBERSHIP_COLUMNS
        ))
        .bind(team_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("list team members", e))?;

        rows.iter().map(row_to_membership).collect()
    }

    async fn add_member(
        &self,
        team_id: TeamId,
        user_id: UserId,
        role: TeamRole,
    ) -> Result<TeamMembership, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO team_memberships (user_id, team_id, role)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            MEMBERSHIP_COLUMNS
        ))
        .bind(user_id.value())
        .bind(team_id.value())
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(format!(
                    "User '{}' is already a member of team '{}'",
                    user_id, team_id
                ))
            } else {
                storage_error("add team member", e)
            }
        })?;

        row_to_membership(&row)
    }

    async fn remove_member(&self, team_id: TeamId, user_id: UserId) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("begin transaction", e))?;

        // Row locks on every membership of the team serialize concurrent
        // removals, so two owners cannot both see the other one remaining.
        let rows = sqlx::query(&format!(
            "SELECT {} FROM team_memberships WHERE team_id = $1 FOR UPDATE",
            MEMBERSHIP_COLUMNS
        ))
        .bind(team_id.value())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| storage_error("lock team memberships", e))?;

        let memberships = rows
            .iter()
            .map(row_to_membership)
            .collect::<Result<Vec<_>, _>>()?;

        let Some(target) = memberships.iter().find(|m| m.user_id == user_id) else {
            return Ok(false);
        };

        let owners = memberships
            .iter()
            .filter(|m| m.role == TeamRole::Owner)
            .count();
        if target.role == TeamRole::Owner && owners == 1 {
            return Err(last_owner(team_id));
        }

        let result = sqlx::query("DELETE FROM team_memberships WHERE team_id = $1 AND user_id = $2")
            .bind(team_id.value())
            .bind(user_id.value())
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error("remove team member", e))?;

        tx.commit()
            .await
            .map_err(|e| storage_error("commit member removal", e))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_team(row: &sqlx::postgres::PgRow) -> Result<Team, DomainError> {
    let read = |e| storage_error("read team row", e);

    let id: i64 = row.try_get("id").map_err(read)?;
    let name: String = row.try_get("name").map_err(read)?;
    let description: Option<String> = row.try_get("description").map_err(read)?;
    let owner_id: i64 = row.try_get("owner_id").map_err(read)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(read)?;

    let team = Team::new(TeamId::new(id), name, UserId::new(owner_id))
        .map_err(|e| DomainError::internal(format!("Invalid team row {}: {}", id, e)))?;

    Ok(team.with_description(description).with_created_at(created_at))
}

fn row_to_membership(row: &sqlx::postgres::PgRow) -> Result<TeamMembership, DomainError> {
    let read = |e| storage_error("read team membership row", e);

    let user_id: i64 = row.try_get("user_id").map_err(read)?;
    let team_id: i64 = row.try_get("team_id").map_err(read)?;
    let role: String = row.try_get("role").map_err(read)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(read)?;

    let role: TeamRole = role.parse().map_err(DomainError::internal)?;

    Ok(TeamMembership {
        user_id: UserId::new(user_id),
        team_id: TeamId::new(team_id),
        role,
        created_at,
    })
}
