//! Domain layer - Core access-control entities and rules

pub mod application_token;
pub mod audit;
pub mod auth;
pub mod error;
pub mod namespace;
pub mod team;
pub mod user;

pub use application_token::{
    ApplicationToken, ApplicationTokenId, ApplicationTokenRepository, TokenCredential,
};
pub use audit::{AuditAction, AuditEvent, AuditSink};
pub use auth::{
    AuthMethod, AuthenticationFailure, Principal, TeamAuthorizationScope, TeamCreationPolicy,
};
pub use error::{DomainError, FieldErrors};
pub use namespace::{Namespace, NamespaceId, NamespaceRepository};
pub use team::{Team, TeamId, TeamMembership, TeamRepository, TeamRole};
pub use user::{User, UserId, UserRepository};
