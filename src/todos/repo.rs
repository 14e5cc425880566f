use sqlx::PgConnection;
use uuid::Uuid;

use crate::store::StoreError;
use crate::todos::repo_types::{NewTodo, Todo};

impl Todo {
    pub async fn create(conn: &mut PgConnection, todo: NewTodo) -> Result<Todo, StoreError> {
        sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (id, content, is_completed, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, content, is_completed, owner_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(todo.content)
        .bind(todo.is_completed)
        .bind(todo.owner_id)
        .fetch_one(conn)
        .await
        .map_err(StoreError::from_write)
    }

    pub async fn list(conn: &mut PgConnection) -> Result<Vec<Todo>, StoreError> {
        let rows = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, content, is_completed, owner_id
            FROM todos
            "#,
        )
        .fetch_all(conn)
        .await?;
        Ok(rows)
    }

    pub async fn find(conn: &mut PgConnection, id: Uuid) -> Result<Option<Todo>, StoreError> {
        let row = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, content, is_completed, owner_id
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;
        Ok(row)
    }

    /// Last write wins; there is no version check.
    pub async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        content: &str,
        is_completed: bool,
    ) -> Result<Option<Todo>, StoreError> {
        sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
               SET content = $2, is_completed = $3
             WHERE id = $1
            RETURNING id, content, is_completed, owner_id
            "#,
        )
        .bind(id)
        .bind(content)
        .bind(is_completed)
        .fetch_optional(conn)
        .await
        .map_err(StoreError::from_write)
    }

    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
