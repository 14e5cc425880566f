use axum::{
    extract::{Query, State},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Value};
use time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::{
    auth::{
        claims::TokenKind,
        dto::{DecodeTokenQuery, GetTokenQuery, LoginForm, PublicUser, RegisterForm, TokenResponse},
        extractors::AuthUser,
        services,
    },
    error::AppError,
    state::AppState,
};

/// Lifetime of tokens handed out by `/get-token`.
const GET_TOKEN_TTL: Duration = Duration::minutes(1);

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/token", post(login))
        .route("/get-token", get(get_token))
        .route("/decode-token", get(decode_token))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(user_root))
        .route("/user/", get(user_root))
        .route("/user/register", post(register))
        .route("/user/me", get(get_me))
}

pub async fn user_root() -> Json<Value> {
    Json(json!({ "message": "Welcome to Users Page" }))
}

#[instrument(skip(state, form), fields(username = %form.username))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Json<Value>, AppError> {
    let user = services::register(
        state.users.as_ref(),
        &form.username,
        &form.email,
        &form.password,
    )
    .await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(Json(json!({
        "message": format!("User with {} successfully registered", user.username)
    })))
}

#[instrument(skip(state, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    if let Some(grant_type) = form.grant_type.as_deref() {
        if grant_type != "password" {
            warn!(%grant_type, "unsupported grant type");
            return Err(AppError::Unprocessable(
                "grant_type must be \"password\"".into(),
            ));
        }
    }
    debug!(scope = %form.scope, "password grant");

    let user = services::authenticate(state.users.as_ref(), &form.username, &form.password).await?;

    let token = state
        .jwt
        .issue_access(&user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(TokenResponse::bearer(token)))
}

/// Issues a short-lived token for any name, without checking credentials.
/// These tokens are not accepted by `AuthUser`.
#[instrument(skip(state))]
pub async fn get_token(
    State(state): State<AppState>,
    Query(q): Query<GetTokenQuery>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state
        .jwt
        .issue(&q.name, GET_TOKEN_TTL, TokenKind::Anonymous)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(TokenResponse::bearer(token)))
}

/// Verification failures are reported in the body with a 200 status.
#[instrument(skip(state, q))]
pub async fn decode_token(
    State(state): State<AppState>,
    Query(q): Query<DecodeTokenQuery>,
) -> Json<Value> {
    match state.jwt.verify(&q.token) {
        Ok(claims) => Json(json!(claims)),
        Err(e) => {
            debug!(error = %e, "decode-token rejected");
            Json(json!({ "error": e.to_string() }))
        }
    }
}

#[instrument(skip(state, subject))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(subject): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = state
        .users
        .find_user_by_username(&subject)
        .await?
        .ok_or_else(|| {
            warn!(%subject, "token subject has no user record");
            AppError::NotFound("User not found".into())
        })?;
    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_serialization() {
        let response = TokenResponse::bearer("abc".into());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["access_token"], "abc");
        assert_eq!(json["token_type"], "bearer");
    }

    #[test]
    fn public_user_hides_password_hash() {
        let user = crate::auth::repo_types::User {
            id: uuid::Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@x.com".into(),
            password_hash: "$argon2id$secret".into(),
        };
        let raw = serde_json::to_string(&user).unwrap();
        assert!(!raw.contains("argon2"));
        let public = serde_json::to_string(&PublicUser::from(user)).unwrap();
        assert!(public.contains("alice@x.com"));
        assert!(!public.contains("argon2"));
    }
}
