use serde::Deserialize;
use uuid::Uuid;

use crate::{error::AppError, todos::repo_types::NewTodo};

pub const CONTENT_MIN_CHARS: usize = 3;
pub const CONTENT_MAX_CHARS: usize = 54;

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub content: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub owner_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub content: String,
    #[serde(default)]
    pub is_completed: bool,
}

/// Length is counted in characters, not bytes.
pub fn validate_content(content: &str) -> Result<(), AppError> {
    let len = content.chars().count();
    if !(CONTENT_MIN_CHARS..=CONTENT_MAX_CHARS).contains(&len) {
        return Err(AppError::Unprocessable(format!(
            "content must be between {CONTENT_MIN_CHARS} and {CONTENT_MAX_CHARS} characters, got {len}"
        )));
    }
    Ok(())
}

impl TryFrom<CreateTodoRequest> for NewTodo {
    type Error = AppError;

    fn try_from(req: CreateTodoRequest) -> Result<Self, Self::Error> {
        validate_content(&req.content)?;
        Ok(NewTodo {
            content: req.content,
            is_completed: req.is_completed,
            owner_id: req.owner_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_length_bounds() {
        assert!(validate_content("ab").is_err());
        assert!(validate_content("abc").is_ok());
        assert!(validate_content(&"x".repeat(54)).is_ok());
        assert!(validate_content(&"x".repeat(55)).is_err());
        assert!(validate_content("").is_err());
    }

    #[test]
    fn content_length_counts_characters() {
        // three characters, six bytes
        assert!(validate_content("ééé").is_ok());
        assert!(validate_content(&"é".repeat(54)).is_ok());
    }

    #[test]
    fn create_request_defaults() {
        let req: CreateTodoRequest = serde_json::from_str(r#"{"content":"buy milk"}"#).unwrap();
        let new: NewTodo = req.try_into().unwrap();
        assert_eq!(new.content, "buy milk");
        assert!(!new.is_completed);
        assert!(new.owner_id.is_none());
    }
}
