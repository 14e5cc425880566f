use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{pool::PoolConnection, postgres::PgPoolOptions, PgPool, Postgres};
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::repo_types::User,
    config::DbConfig,
    store::{StoreError, TodoStore, UserStore},
    todos::repo_types::{NewTodo, Todo},
};

pub async fn connect(cfg: &DbConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(cfg.pool_size)
        .max_lifetime(Duration::from_secs(cfg.recycle_secs))
        .connect(&cfg.url)
        .await
        .context("connect to database")?;
    Ok(pool)
}

/// Creates the `users` and `todos` tables when they are missing.
pub async fn create_tables(db: &PgPool) -> anyhow::Result<()> {
    info!("creating tables");
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    info!("tables created");
    Ok(())
}

/// Postgres-backed store. Each call checks out its own pooled connection,
/// which goes back to the pool when it drops.
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn session(&self) -> Result<PoolConnection<Postgres>, StoreError> {
        Ok(self.db.acquire().await?)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.session().await?;
        User::find_by_username(&mut conn, username).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.session().await?;
        User::find_by_email(&mut conn, email).await
    }

    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let mut conn = self.session().await?;
        User::create(&mut conn, username, email, password_hash).await
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn create_todo(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let mut conn = self.session().await?;
        Todo::create(&mut conn, todo).await
    }

    async fn list_todos(&self) -> Result<Vec<Todo>, StoreError> {
        let mut conn = self.session().await?;
        Todo::list(&mut conn).await
    }

    async fn get_todo(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        let mut conn = self.session().await?;
        Todo::find(&mut conn, id).await
    }

    async fn update_todo(
        &self,
        id: Uuid,
        content: &str,
        is_completed: bool,
    ) -> Result<Option<Todo>, StoreError> {
        let mut conn = self.session().await?;
        Todo::update(&mut conn, id, content, is_completed).await
    }

    async fn delete_todo(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut conn = self.session().await?;
        Todo::delete(&mut conn, id).await
    }
}

