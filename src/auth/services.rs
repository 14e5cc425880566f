use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    auth::{
        password::{hash_password, verify_password},
        repo_types::User,
    },
    store::{StoreError, UserStore},
};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Incorrect username")]
    UnknownUser,
    #[error("Incorrect password")]
    WrongPassword,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("User with these credential already exists")]
    AlreadyExists,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Username match first, then email. Both exact and case-sensitive.
pub async fn lookup_user(
    store: &dyn UserStore,
    username: Option<&str>,
    email: Option<&str>,
) -> Result<Option<User>, StoreError> {
    if let Some(username) = username {
        if let Some(user) = store.find_user_by_username(username).await? {
            return Ok(Some(user));
        }
    }
    match email {
        Some(email) => store.find_user_by_email(email).await,
        None => Ok(None),
    }
}

pub async fn authenticate(
    store: &dyn UserStore,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    let Some(user) = lookup_user(store, Some(username), None).await? else {
        warn!(%username, "login unknown username");
        return Err(AuthError::UnknownUser);
    };
    if !verify_password(password, &user.password_hash) {
        warn!(%username, user_id = %user.id, "login invalid password");
        return Err(AuthError::WrongPassword);
    }
    debug!(user_id = %user.id, "authenticated");
    Ok(user)
}

pub async fn register(
    store: &dyn UserStore,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User, AuthError> {
    if !is_valid_email(email) {
        warn!(%email, "invalid email");
        return Err(AuthError::InvalidEmail);
    }

    if lookup_user(store, Some(username), Some(email)).await?.is_some() {
        warn!(%username, %email, "user already registered");
        return Err(AuthError::AlreadyExists);
    }

    let hash = hash_password(password).map_err(|e| AuthError::Hash(e.to_string()))?;

    // A concurrent registration can still win between lookup and insert.
    match store.create_user(username, email, &hash).await {
        Ok(user) => Ok(user),
        Err(StoreError::Conflict) => Err(AuthError::AlreadyExists),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn email_format() {
        assert!(is_valid_email("alice@x.com"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@x"));
        assert!(!is_valid_email("al ice@x.com"));
    }

    #[tokio::test]
    async fn registered_user_is_found_by_username_or_email() {
        let store = MemoryStore::default();
        let user = register(&store, "alice", "alice@x.com", "pw123").await.expect("register");

        let by_name = lookup_user(&store, Some("alice"), None).await.unwrap().unwrap();
        let by_email = lookup_user(&store, None, Some("alice@x.com")).await.unwrap().unwrap();
        let fallback = lookup_user(&store, Some("nobody"), Some("alice@x.com"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(by_name.id, user.id);
        assert_eq!(by_email.id, user.id);
        assert_eq!(fallback.id, user.id);
        assert_ne!(user.password_hash, "pw123");
    }

    #[tokio::test]
    async fn lookup_is_case_sensitive() {
        let store = MemoryStore::default();
        register(&store, "alice", "alice@x.com", "pw123").await.unwrap();
        assert!(lookup_user(&store, Some("Alice"), Some("ALICE@x.com"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn duplicate_username_or_email_is_rejected() {
        let store = MemoryStore::default();
        register(&store, "alice", "alice@x.com", "pw123").await.unwrap();

        let same_name = register(&store, "alice", "other@x.com", "pw").await.unwrap_err();
        let same_email = register(&store, "bob", "alice@x.com", "pw").await.unwrap_err();
        assert!(matches!(same_name, AuthError::AlreadyExists));
        assert!(matches!(same_email, AuthError::AlreadyExists));
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let store = MemoryStore::default();
        let err = register(&store, "alice", "not-an-email", "pw123").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail));
    }

    #[tokio::test]
    async fn authenticate_checks_username_then_password() {
        let store = MemoryStore::default();
        register(&store, "alice", "alice@x.com", "pw123").await.unwrap();

        let user = authenticate(&store, "alice", "pw123").await.expect("right password");
        assert_eq!(user.username, "alice");

        let wrong = authenticate(&store, "alice", "wrongpw").await.unwrap_err();
        assert!(matches!(wrong, AuthError::WrongPassword));
        assert_eq!(wrong.to_string(), "Incorrect password");

        let unknown = authenticate(&store, "mallory", "pw123").await.unwrap_err();
        assert!(matches!(unknown, AuthError::UnknownUser));
        assert_eq!(unknown.to_string(), "Incorrect username");
    }

    /// Lookups miss, so only the insert sees the existing row.
    struct RacingInsertStore;

    #[async_trait::async_trait]
    impl UserStore for RacingInsertStore {
        async fn find_user_by_username(&self, _username: &str) -> Result<Option<User>, StoreError> {
            Ok(None)
        }

        async fn find_user_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
            Ok(None)
        }

        async fn create_user(
            &self,
            _username: &str,
            _email: &str,
            _password_hash: &str,
        ) -> Result<User, StoreError> {
            Err(StoreError::Conflict)
        }
    }

    #[tokio::test]
    async fn unique_violation_on_insert_is_already_exists() {
        let err = register(&RacingInsertStore, "alice", "alice@x.com", "pw123")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AlreadyExists));

        let app_err = crate::error::AppError::from(err);
        assert_eq!(app_err.status(), axum::http::StatusCode::CONFLICT);
        assert_eq!(app_err.to_string(), "User with these credential already exists");
    }
}
