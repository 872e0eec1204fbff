//! In-memory application token repository

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::application_token::{
    ApplicationToken, ApplicationTokenId, ApplicationTokenRepository, NewApplicationToken,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::poisoned;

#[derive(Debug, Default)]
struct TokenTable {
    next_id: i64,
    tokens: BTreeMap<ApplicationTokenId, ApplicationToken>,
    // (user, application) -> token, the uniqueness index
    by_owner: HashMap<(UserId, String), ApplicationTokenId>,
}

/// Thread-safe in-memory implementation of ApplicationTokenRepository
///
/// The uniqueness check and the insert run under one write lock.
#[derive(Debug, Default)]
pub struct InMemoryApplicationTokenRepository {
    table: RwLock<TokenTable>,
}

impl InMemoryApplicationTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApplicationTokenRepository for InMemoryApplicationTokenRepository {
    async fn get(&self, id: ApplicationTokenId) -> Result<Option<ApplicationToken>, DomainError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.tokens.get(&id).cloned())
    }

    async fn find_by_user_and_application(
        &self,
        user_id: UserId,
        application: &str,
    ) -> Result<Option<ApplicationToken>, DomainError> {
        let table = self.table.read().map_err(poisoned)?;

        Ok(table
            .by_owner
            .get(&(user_id, application.to_string()))
            .and_then(|id| table.tokens.get(id))
            .cloned())
    }

    async fn create(&self, token: NewApplicationToken) -> Result<ApplicationToken, DomainError> {
        let mut table = self.table.write().map_err(poisoned)?;
        let key = (token.user_id, token.application.clone());

        if table.by_owner.contains_key(&key) {
            return Err(DomainError::duplicate_application(token.application));
        }

        table.next_id += 1;
        let id = ApplicationTokenId::new(table.next_id);
        let created = ApplicationToken::new(id, token.user_id, token.application, token.credential);

        table.by_owner.insert(key, id);
        table.tokens.insert(id, created.clone());
        Ok(created)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ApplicationToken>, DomainError> {
        let table = self.table.read().map_err(poisoned)?;

        Ok(table
            .tokens
            .values()
            .filter(|t| t.user_id() == user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: ApplicationTokenId) -> Result<bool, DomainError> {
        let mut table = self.table.write().map_err(poisoned)?;

        match table.tokens.remove(&id) {
            Some(token) => {
                table
                    .by_owner
                    .remove(&(token.user_id(), token.application().to_string()));
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::application_token::TokenCredential;

    fn draft(user: i64, application: &str) -> NewApplicationToken {
        NewApplicationToken {
            user_id: UserId::new(user),
            application: application.to_string(),
            credential: TokenCredential::generate("s3cr3t"),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryApplicationTokenRepository::new();
        let created = repo.create(draft(1, "ci-runner")).await.unwrap();

        let found = repo
            .find_by_user_and_application(UserId::new(1), "ci-runner")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id(), created.id());
        assert!(repo
            .find_by_user_and_application(UserId::new(2), "ci-runner")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_per_user_only() {
        let repo = InMemoryApplicationTokenRepository::new();
        repo.create(draft(1, "ci-runner")).await.unwrap();

        let duplicate = repo.create(draft(1, "ci-runner")).await;
        assert!(matches!(
            duplicate,
            Err(DomainError::DuplicateApplication { .. })
        ));

        // Same label for another user is fine
        repo.create(draft(2, "ci-runner")).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_frees_label() {
        let repo = InMemoryApplicationTokenRepository::new();
        let token = repo.create(draft(1, "ci-runner")).await.unwrap();

        assert!(repo.delete(token.id()).await.unwrap());
        assert!(!repo.delete(token.id()).await.unwrap());

        repo.create(draft(1, "ci-runner")).await.unwrap();
        assert_eq!(repo.list_for_user(UserId::new(1)).await.unwrap().len(), 1);
    }
}
