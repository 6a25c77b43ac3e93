use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Item, User};

/// Credential and item storage behind the HTTP handlers.
///
/// Item methods that take an `owner` only ever see rows whose `user_id`
/// equals it. Callers derive `owner` from the validated token; nothing
/// below this trait knows about tokens.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    async fn find_user_by_name(&self, user_name: &str) -> Result<Option<User>, DatabaseError>;

    /// Insert a user. Fails with `UsernameTaken` if the name is in use.
    async fn insert_user(
        &self,
        user_name: &str,
        email: Option<&str>,
        password_hash: &str,
    ) -> Result<User, DatabaseError>;

    async fn list_items(&self, owner: i32) -> Result<Vec<Item>, DatabaseError>;

    async fn find_owned_item(&self, id: i32, owner: i32) -> Result<Option<Item>, DatabaseError>;

    /// Insert an item for `owner`; new items always start incomplete.
    async fn insert_item(&self, name: &str, owner: i32) -> Result<Item, DatabaseError>;

    async fn set_item_completion(
        &self,
        id: i32,
        owner: i32,
        is_complete: bool,
    ) -> Result<Option<Item>, DatabaseError>;

    async fn delete_item(&self, id: i32, owner: i32) -> Result<Option<Item>, DatabaseError>;
}

/// PostgreSQL-backed repository
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ITEM_COLUMNS: &str = "id, name, is_complete, user_id";

#[async_trait]
impl Repository for PgRepository {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn find_user_by_name(&self, user_name: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, user_name, email, password_hash FROM users WHERE user_name = $1",
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert_user(
        &self,
        user_name: &str,
        email: Option<&str>,
        password_hash: &str,
    ) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (user_name, email, password_hash) VALUES ($1, $2, $3)
             RETURNING id, user_name, email, password_hash",
        )
        .bind(user_name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_insert_user(e, user_name))
    }

    async fn list_items(&self, owner: i32) -> Result<Vec<Item>, DatabaseError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE user_id = $1 ORDER BY id");
        let items = sqlx::query_as::<_, Item>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    async fn find_owned_item(&self, id: i32, owner: i32) -> Result<Option<Item>, DatabaseError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1 AND user_id = $2");
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    async fn insert_item(&self, name: &str, owner: i32) -> Result<Item, DatabaseError> {
        let sql = format!(
            "INSERT INTO items (name, is_complete, user_id) VALUES ($1, FALSE, $2) RETURNING {ITEM_COLUMNS}"
        );
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(name)
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;

        Ok(item)
    }

    async fn set_item_completion(
        &self,
        id: i32,
        owner: i32,
        is_complete: bool,
    ) -> Result<Option<Item>, DatabaseError> {
        // Ownership check and write in one statement
        let sql = format!(
            "UPDATE items SET is_complete = $1 WHERE id = $2 AND user_id = $3 RETURNING {ITEM_COLUMNS}"
        );
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(is_complete)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    async fn delete_item(&self, id: i32, owner: i32) -> Result<Option<Item>, DatabaseError> {
        let sql = format!("DELETE FROM items WHERE id = $1 AND user_id = $2 RETURNING {ITEM_COLUMNS}");
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }
}
