use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: Uuid,
    pub content: String,
    pub is_completed: bool,
    pub owner_id: Option<Uuid>,
}

/// Validated input for an insert; the id is assigned on insert.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub content: String,
    pub is_completed: bool,
    pub owner_id: Option<Uuid>,
}
