use async_trait::async_trait;

use super::entity::{Namespace, NewNamespace};
use crate::domain::team::TeamId;
use crate::domain::DomainError;

/// Read access to namespaces owned by teams
#[async_trait]
pub trait NamespaceRepository: Send + Sync + std::fmt::Debug {
    /// Namespaces owned by a team, in creation order
    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<Namespace>, DomainError>;

    /// Persist a namespace (seeding and tests)
    async fn create(&self, namespace: NewNamespace) -> Result<Namespace, DomainError>;
}
