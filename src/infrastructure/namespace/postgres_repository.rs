//! PostgreSQL namespace repository

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::namespace::{Namespace, NamespaceId, NamespaceRepository, NewNamespace};
use crate::domain::team::TeamId;
use crate::domain::DomainError;
use crate::infrastructure::storage::{is_unique_violation, storage_error};

/// PostgreSQL implementation of NamespaceRepository
#[derive(Debug, Clone)]
pub struct PostgresNamespaceRepository {
    pool: PgPool,
}

impl PostgresNamespaceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const NAMESPACE_COLUMNS: &str = "id, name, team_id, description, created_at";

#[async_trait]
impl NamespaceRepository for PostgresNamespaceRepository {
    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<Namespace>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM namespaces WHERE team_id = $1 ORDER BY id",
            NAMESPACE_COLUMNS
        ))
        .bind(team_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("list namespaces", e))?;

        rows.iter().map(row_to_namespace).collect()
    }

    async fn create(&self, namespace: NewNamespace) -> Result<Namespace, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO namespaces (name, team_id, description)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            NAMESPACE_COLUMNS
        ))
        .bind(&namespace.name)
        .bind(namespace.team_id.value())
        .bind(&namespace.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(format!("Namespace '{}' already exists", namespace.name))
            } else {
                storage_error("create namespace", e)
            }
        })?;

        row_to_namespace(&row)
    }
}

fn row_to_namespace(row: &sqlx::postgres::PgRow) -> Result<Namespace, DomainError> {
    let read = |e| storage_error("read namespace row", e);

    Ok(Namespace {
        id: NamespaceId::new(row.try_get("id").map_err(read)?),
        name: row.try_get("name").map_err(read)?,
        team_id: TeamId::new(row.try_get("team_id").map_err(read)?),
        description: row.try_get("description").map_err(read)?,
        created_at: row.try_get("created_at").map_err(read)?,
    })
}
