use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    error::AppError,
    state::AppState,
    todos::{
        dto::{validate_content, CreateTodoRequest, UpdateTodoRequest},
        repo_types::{NewTodo, Todo},
    },
};

const NOT_FOUND: &str = "No Task Found";

pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/todo", post(create_todo))
        .route("/todos", get(list_todos))
        .route(
            "/todos/:id",
            get(get_todo).put(edit_todo).delete(delete_todo),
        )
}

fn not_found() -> AppError {
    AppError::NotFound(NOT_FOUND.into())
}

#[instrument(skip(state, body))]
pub async fn create_todo(
    State(state): State<AppState>,
    Json(body): Json<CreateTodoRequest>,
) -> Result<Json<Todo>, AppError> {
    let new = NewTodo::try_from(body)?;
    let todo = state.todos.create_todo(new).await?;
    info!(todo_id = %todo.id, "todo created");
    Ok(Json(todo))
}

/// An empty table is reported as 404.
#[instrument(skip(state))]
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = state.todos.list_todos().await?;
    if todos.is_empty() {
        return Err(not_found());
    }
    Ok(Json(todos))
}

#[instrument(skip(state))]
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Todo>, AppError> {
    state
        .todos
        .get_todo(id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

#[instrument(skip(state, body))]
pub async fn edit_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTodoRequest>,
) -> Result<Json<Todo>, AppError> {
    validate_content(&body.content)?;
    let todo = state
        .todos
        .update_todo(id, &body.content, body.is_completed)
        .await?
        .ok_or_else(not_found)?;
    info!(todo_id = %todo.id, is_completed = todo.is_completed, "todo edited");
    Ok(Json(todo))
}

#[instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if !state.todos.delete_todo(id).await? {
        return Err(not_found());
    }
    info!(todo_id = %id, "todo deleted");
    Ok(Json(json!({ "message": "Task Deleted Successfully" })))
}
