use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{auth::services::AuthError, store::StoreError};

/// Handler error. Rendered as `{"detail": "..."}` with the matching status.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            AppError::Internal(cause) => {
                error!(error = %cause, "request failed");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(json!({ "detail": detail }));
        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict => AppError::Conflict("Record already exists".into()),
            StoreError::UnknownOwner => AppError::Unprocessable("Owner does not exist".into()),
            StoreError::Database(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::UnknownUser | AuthError::WrongPassword | AuthError::InvalidEmail => {
                AppError::BadRequest(e.to_string())
            }
            AuthError::AlreadyExists => AppError::Conflict(e.to_string()),
            AuthError::Store(e) => e.into(),
            AuthError::Hash(e) => AppError::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_map_to_expected_statuses() {
        assert_eq!(AppError::from(AuthError::UnknownUser).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::from(AuthError::WrongPassword).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::from(AuthError::AlreadyExists).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::from(AuthError::Store(StoreError::Conflict)).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn unauthorized_carries_bearer_challenge() {
        let res = AppError::Unauthorized("nope".into()).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    }

    #[tokio::test]
    async fn internal_detail_is_not_leaked() {
        let err = AppError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let res = err.into_response();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["detail"], "Internal Server Error");
    }
}
