//! Wired access services shared by every caller

use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::application_token::ApplicationTokenRepository;
use crate::domain::audit::AuditSink;
use crate::domain::auth::TeamAuthorizationScope;
use crate::domain::namespace::NamespaceRepository;
use crate::domain::team::TeamRepository;
use crate::domain::user::UserRepository;
use crate::infrastructure::application_token::{TokenAuthenticator, TokenStore};
use crate::infrastructure::team::TeamService;
use crate::infrastructure::user::{Argon2Hasher, PasswordHasher, SessionAuthenticator, UserService};

/// Storage backends for every entity
#[derive(Debug, Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn ApplicationTokenRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub namespaces: Arc<dyn NamespaceRepository>,
}

/// Access services built from one set of repositories
#[derive(Debug, Clone)]
pub struct AccessContext {
    pub users: Arc<UserService>,
    pub sessions: Arc<SessionAuthenticator>,
    pub tokens: Arc<TokenStore>,
    pub authenticator: Arc<TokenAuthenticator>,
    pub teams: Arc<TeamService>,
    pub namespaces: Arc<dyn NamespaceRepository>,
}

impl AccessContext {
    pub fn new(config: &AppConfig, repositories: Repositories, audit: Arc<dyn AuditSink>) -> Self {
        let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new());

        let tokens = Arc::new(
            TokenStore::new(repositories.tokens, audit)
                .with_salt_bytes(config.auth.salt_bytes)
                .with_secret_bytes(config.auth.secret_bytes),
        );
        let authenticator = Arc::new(
            TokenAuthenticator::new(repositories.users.clone(), tokens.clone())
                .with_header_name(&config.auth.header_name),
        );

        let scope = TeamAuthorizationScope::new(repositories.teams.clone())
            .with_creation_policy(config.teams.creation_policy);
        let teams = Arc::new(TeamService::new(
            repositories.teams,
            repositories.users.clone(),
            repositories.namespaces.clone(),
            scope,
        ));

        Self {
            users: Arc::new(UserService::new(repositories.users.clone(), hasher.clone())),
            sessions: Arc::new(SessionAuthenticator::new(repositories.users, hasher)),
            tokens,
            authenticator,
            teams,
            namespaces: repositories.namespaces,
        }
    }
}
