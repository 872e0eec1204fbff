//! Portus access core
//!
//! Team-scoped access for a registry:
//! - Application tokens presented in the `PORTUS-AUTH` header
//! - Session login for interactive users
//! - Team visibility and permissions for members and administrators

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod state;

pub use crate::config::AppConfig;
pub use state::{AccessContext, Repositories};

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use infrastructure::{
    application_token::{InMemoryApplicationTokenRepository, PostgresApplicationTokenRepository},
    audit::TracingAuditSink,
    namespace::{InMemoryNamespaceRepository, PostgresNamespaceRepository},
    storage::{connect, PostgresConfig},
    team::{InMemoryTeamRepository, PostgresTeamRepository},
    user::{InMemoryUserRepository, PostgresUserRepository},
};

/// Build the access services, backed by PostgreSQL when a database URL is
/// configured and by in-memory repositories otherwise
pub async fn create_access_context(config: &AppConfig) -> anyhow::Result<AccessContext> {
    match config.database.url.as_deref() {
        Some(url) => {
            let pool = connect_database(config, url).await?;
            Ok(create_postgres_context(config, pool))
        }
        None => {
            info!("No database configured, using in-memory storage");
            Ok(create_in_memory_context(config))
        }
    }
}

/// Open the configured PostgreSQL pool
pub async fn connect_database(config: &AppConfig, url: &str) -> anyhow::Result<PgPool> {
    let pg_config =
        PostgresConfig::new(url).with_max_connections(config.database.max_connections);

    Ok(connect(&pg_config).await?)
}

pub fn create_postgres_context(config: &AppConfig, pool: PgPool) -> AccessContext {
    info!("Using PostgreSQL storage");

    let repositories = Repositories {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        tokens: Arc::new(PostgresApplicationTokenRepository::new(pool.clone())),
        teams: Arc::new(PostgresTeamRepository::new(pool.clone())),
        namespaces: Arc::new(PostgresNamespaceRepository::new(pool)),
    };

    AccessContext::new(config, repositories, Arc::new(TracingAuditSink::new()))
}

pub fn create_in_memory_context(config: &AppConfig) -> AccessContext {
    let repositories = Repositories {
        users: Arc::new(InMemoryUserRepository::new()),
        tokens: Arc::new(InMemoryApplicationTokenRepository::new()),
        teams: Arc::new(InMemoryTeamRepository::new()),
        namespaces: Arc::new(InMemoryNamespaceRepository::new()),
    };

    AccessContext::new(config, repositories, Arc::new(TracingAuditSink::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::{AuthenticationFailure, TeamCreationPolicy};
    use crate::domain::DomainError;
    use crate::infrastructure::team::CreateTeamRequest;
    use crate::infrastructure::user::CreateUserRequest;

    #[tokio::test]
    async fn test_token_and_team_scenario() {
        let context = create_in_memory_context(&AppConfig::default());

        let alice = context
            .users
            .create(CreateUserRequest {
                username: "alice".to_string(),
                password: None,
                admin: false,
            })
            .await
            .unwrap();

        context
            .tokens
            .create(alice.id(), "ci-runner", "s3cr3t")
            .await
            .unwrap();

        let principal = context
            .authenticator
            .authenticate("alice:ci-runner:s3cr3t")
            .await
            .unwrap();
        assert_eq!(principal.user_id(), alice.id());

        let rejected = context.authenticator.authenticate("alice:ci-runner:wrong").await;
        assert!(matches!(
            rejected,
            Err(DomainError::Authentication(AuthenticationFailure::InvalidSecret))
        ));

        let team = context
            .teams
            .create_team(
                &principal,
                CreateTeamRequest {
                    name: "platform".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(team.owner_id(), alice.id());
        assert!(context
            .teams
            .scope()
            .can_manage_members(&principal, team.id())
            .await
            .unwrap());
        assert_eq!(context.teams.list_teams(&principal).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_context_honours_config() {
        let mut config = AppConfig::default();
        config.auth.header_name = "X-Registry-Auth".to_string();
        config.teams.creation_policy = TeamCreationPolicy::AdminsOnly;

        let context = create_in_memory_context(&config);

        assert_eq!(context.authenticator.header_name(), "X-Registry-Auth");
        assert_eq!(
            context.teams.scope().creation_policy(),
            TeamCreationPolicy::AdminsOnly
        );
    }

    #[tokio::test]
    async fn test_without_database_url_uses_memory() {
        let context = create_access_context(&AppConfig::default()).await.unwrap();
        assert!(context.users.list().await.unwrap().is_empty());
    }
}
