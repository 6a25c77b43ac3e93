use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{Item, User};
use crate::database::repository::Repository;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    items: BTreeMap<i32, Item>,
    next_user_id: i32,
    next_item_id: i32,
}

/// In-process repository with the same semantics as the PostgreSQL one.
/// Contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a user and, like the `ON DELETE CASCADE` key, every item it owns.
    pub async fn delete_user(&self, id: i32) -> Option<User> {
        let mut tables = self.tables.write().await;
        let user = tables.users.remove(&id)?;
        tables.items.retain(|_, item| item.user_id != Some(id));
        Some(user)
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn find_user_by_name(&self, user_name: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.user_name == user_name).cloned())
    }

    async fn insert_user(
        &self,
        user_name: &str,
        email: Option<&str>,
        password_hash: &str,
    ) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.user_name == user_name) {
            return Err(DatabaseError::UsernameTaken(user_name.to_string()));
        }

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            user_name: user_name.to_string(),
            email: email.map(str::to_string),
            password_hash: password_hash.to_string(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_items(&self, owner: i32) -> Result<Vec<Item>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .items
            .values()
            .filter(|item| item.user_id == Some(owner))
            .cloned()
            .collect())
    }

    async fn find_owned_item(&self, id: i32, owner: i32) -> Result<Option<Item>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .items
            .get(&id)
            .filter(|item| item.user_id == Some(owner))
            .cloned())
    }

    async fn insert_item(&self, name: &str, owner: i32) -> Result<Item, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.next_item_id += 1;
        let item = Item {
            id: tables.next_item_id,
            name: name.to_string(),
            is_complete: false,
            user_id: Some(owner),
        };
        tables.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn set_item_completion(
        &self,
        id: i32,
        owner: i32,
        is_complete: bool,
    ) -> Result<Option<Item>, DatabaseError> {
        let mut tables = self.tables.write().await;
        match tables.items.get_mut(&id) {
            Some(item) if item.user_id == Some(owner) => {
                item.is_complete = is_complete;
                Ok(Some(item.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_item(&self, id: i32, owner: i32) -> Result<Option<Item>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let owned = matches!(tables.items.get(&id), Some(item) if item.user_id == Some(owner));
        if owned {
            Ok(tables.items.remove(&id))
        } else {
            Ok(None)
        }
    }
}
