use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::todos::repo_types::{NewTodo, Todo};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("referenced owner does not exist")]
    UnknownOwner,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Classifies constraint violations raised by an INSERT or UPDATE.
    pub fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::Conflict;
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::UnknownOwner;
            }
        }
        StoreError::Database(err)
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError>;
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn create_todo(&self, todo: NewTodo) -> Result<Todo, StoreError>;
    async fn list_todos(&self) -> Result<Vec<Todo>, StoreError>;
    async fn get_todo(&self, id: Uuid) -> Result<Option<Todo>, StoreError>;
    async fn update_todo(
        &self,
        id: Uuid,
        content: &str,
        is_completed: bool,
    ) -> Result<Option<Todo>, StoreError>;
    /// Returns `false` when no row had this id.
    async fn delete_todo(&self, id: Uuid) -> Result<bool, StoreError>;
}
