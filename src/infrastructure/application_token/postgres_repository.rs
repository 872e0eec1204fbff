//! PostgreSQL application token repository

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::application_token::{
    ApplicationToken, ApplicationTokenId, ApplicationTokenRepository, NewApplicationToken,
    TokenCredential,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::{is_unique_violation, storage_error};

/// PostgreSQL implementation of ApplicationTokenRepository
///
/// Duplicate labels are rejected by the `UNIQUE (user_id, application)`
/// constraint, so concurrent creates cannot both succeed.
#[derive(Debug, Clone)]
pub struct PostgresApplicationTokenRepository {
    pool: PgPool,
}

impl PostgresApplicationTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TOKEN_COLUMNS: &str = "id, user_id, application, token_hash, token_salt, created_at";

#[async_trait]
impl ApplicationTokenRepository for PostgresApplicationTokenRepository {
    async fn get(&self, id: ApplicationTokenId) -> Result<Option<ApplicationToken>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM application_tokens WHERE id = $1",
            TOKEN_COLUMNS
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("get application token", e))?;

        row.as_ref().map(row_to_token).transpose()
    }

    async fn find_by_user_and_application(
        &self,
        user_id: UserId,
        application: &str,
    ) -> Result<Option<ApplicationToken>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM application_tokens WHERE user_id = $1 AND application = $2",
            TOKEN_COLUMNS
        ))
        .bind(user_id.value())
        .bind(application)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("find application token", e))?;

        row.as_ref().map(row_to_token).transpose()
    }

    async fn create(&self, token: NewApplicationToken) -> Result<ApplicationToken, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO application_tokens (user_id, application, token_hash, token_salt)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            TOKEN_COLUMNS
        ))
        .bind(token.user_id.value())
        .bind(&token.application)
        .bind(token.credential.hash())
        .bind(token.credential.salt())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::duplicate_application(&token.application)
            } else {
                storage_error("create application token", e)
            }
        })?;

        row_to_token(&row)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ApplicationToken>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM application_tokens WHERE user_id = $1 ORDER BY id",
            TOKEN_COLUMNS
        ))
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("list application tokens", e))?;

        rows.iter().map(row_to_token).collect()
    }

    async fn delete(&self, id: ApplicationTokenId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM application_tokens WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("delete application token", e))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_token(row: &sqlx::postgres::PgRow) -> Result<ApplicationToken, DomainError> {
    let read = |e| storage_error("read application token row", e);

    let id: i64 = row.try_get("id").map_err(read)?;
    let user_id: i64 = row.try_get("user_id").map_err(read)?;
    let application: String = row.try_get("application").map_err(read)?;
    let hash: String = row.try_get("token_hash").map_err(read)?;
    let salt: String = row.try_get("token_salt").map_err(read)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(read)?;

    Ok(ApplicationToken::new(
        ApplicationTokenId::new(id),
        UserId::new(user_id),
        application,
        TokenCredential::from_stored(hash, salt),
    )
    .with_created_at(created_at))
}
