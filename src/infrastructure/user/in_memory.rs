//! In-memory user repository implementation

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::poisoned;

#[derive(Debug, Default)]
struct UserTable {
    next_id: i64,
    users: BTreeMap<UserId, User>,
    by_username: HashMap<String, UserId>,
}

/// Thread-safe in-memory implementation of UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.users.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().map_err(poisoned)?;

        Ok(table
            .by_username
            .get(username)
            .and_then(|id| table.users.get(id))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut table = self.table.write().map_err(poisoned)?;

        if table.by_username.contains_key(&user.username) {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                user.username
            )));
        }

        table.next_id += 1;
        let id = UserId::new(table.next_id);

        let mut created = User::new(id, &user.username, user.admin);
        if let Some(hash) = user.password_hash {
            created = created.with_password_hash(hash);
        }

        table.by_username.insert(user.username, id);
        table.users.insert(id, created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.users.values().cloned().collect())
    }
}
