//! Schema bootstrap
//!
//! Creates the access tables with the unique constraints the repositories
//! rely on for atomic duplicate detection.

use sqlx::postgres::PgPool;
use tracing::{debug, info};

use crate::domain::DomainError;

/// Schema migrator recording applied versions in `_migrations`
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    /// Apply a single migration unless already recorded
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
                .bind(migration.version)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to check migration status: {}", e))
                })?;

        if applied {
            debug!(version = migration.version, "Migration already applied");
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit migration: {}", e)))?;

        info!(
            version = migration.version,
            description = migration.description,
            "Applied migration"
        );
        Ok(true)
    }

    /// Apply every pending migration, returns how many ran
    pub async fn run(&self) -> Result<usize, DomainError> {
        self.ensure_migrations_table().await?;

        let mut applied = 0;

        for migration in access_migrations() {
            if self.run_migration(&migration).await? {
                applied += 1;
            }
        }

        Ok(applied)
    }
}

/// A versioned schema change
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub up: &'static str,
}

/// Migrations for the access schema, in application order
pub fn access_migrations() -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            description: "Create users table",
            up: r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                username VARCHAR(255) NOT NULL,
                is_admin BOOLEAN NOT NULL DEFAULT FALSE,
                password_hash TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT users_username_key UNIQUE (username)
            );
            "#,
        },
        Migration {
            version: 2,
            description: "Create application_tokens table",
            up: r#"
            CREATE TABLE IF NOT EXISTS application_tokens (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                application VARCHAR(255) NOT NULL,
                token_hash VARCHAR(255) NOT NULL,
                token_salt VARCHAR(255) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT application_tokens_user_application_key UNIQUE (user_id, application)
            );
            CREATE INDEX IF NOT EXISTS idx_application_tokens_user_id ON application_tokens(user_id);
            "#,
        },
        Migration {
            version: 3,
            description: "Create teams and team_memberships tables",
            up: r#"
            CREATE TABLE IF NOT EXISTS teams (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                description TEXT,
                owner_id BIGINT NOT NULL REFERENCES users(id),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT teams_name_key UNIQUE (name)
            );
            CREATE TABLE IF NOT EXISTS team_memberships (
                user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                team_id BIGINT NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
                role VARCHAR(32) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT team_memberships_user_team_key UNIQUE (user_id, team_id)
            );
            CREATE INDEX IF NOT EXISTS idx_team_memberships_team_id ON team_memberships(team_id);
            "#,
        },
        Migration {
            version: 4,
            description: "Create namespaces table",
            up: r#"
            CREATE TABLE IF NOT EXISTS namespaces (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                team_id BIGINT NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
                description TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT namespaces_name_key UNIQUE (name)
            );
            CREATE INDEX IF NOT EXISTS idx_namespaces_team_id ON namespaces(team_id);
            "#,
        },
    ]
}
