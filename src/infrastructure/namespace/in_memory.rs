//! In-memory namespace repository

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::namespace::{Namespace, NamespaceId, NamespaceRepository, NewNamespace};
use crate::domain::team::TeamId;
use crate::domain::DomainError;
use crate::infrastructure::storage::poisoned;

#[derive(Debug, Default)]
struct NamespaceTable {
    next_id: i64,
    namespaces: BTreeMap<NamespaceId, Namespace>,
}

/// Thread-safe in-memory implementation of NamespaceRepository
#[derive(Debug, Default)]
pub struct InMemoryNamespaceRepository {
    table: RwLock<NamespaceTable>,
}

impl InMemoryNamespaceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NamespaceRepository for InMemoryNamespaceRepository {
    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<Namespace>, DomainError> {
        let table = self.table.read().map_err(poisoned)?;

        Ok(table
            .namespaces
            .values()
            .filter(|n| n.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn create(&self, namespace: NewNamespace) -> Result<Namespace, DomainError> {
        let mut table = self.table.write().map_err(poisoned)?;

        if table.namespaces.values().any(|n| n.name == namespace.name) {
            return Err(DomainError::conflict(format!(
                "Namespace '{}' already exists",
                namespace.name
            )));
        }

        table.next_id += 1;
        let created = Namespace {
            id: NamespaceId::new(table.next_id),
            name: namespace.name,
            team_id: namespace.team_id,
            description: namespace.description,
            created_at: Utc::now(),
        };

        table.namespaces.insert(created.id, created.clone());
        Ok(created)
    }
}
