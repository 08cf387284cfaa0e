use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use tracing::info;
use uuid::Uuid;

use super::{LogEntry, LogFilter, NewLogEntry, Store, User};
use crate::config::DatabaseConfig;

// logs.user_id is a weak reference, no foreign key.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id       UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS users_username_idx ON users (username);

CREATE TABLE IF NOT EXISTS logs (
    id          UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id     UUID NOT NULL,
    description TEXT NOT NULL,
    duration    TEXT NOT NULL,
    date_string TEXT NOT NULL,
    date_time   BIGINT NOT NULL
);
CREATE INDEX IF NOT EXISTS logs_user_date_idx ON logs (user_id, date_time);
"#;

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect(&cfg.url)
            .await
            .context("connect to database")?;
        let store = Self { db };
        store.ensure_schema().await?;
        info!("connected to postgres");
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        self.db.execute(SCHEMA).await.context("create tables")?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username
            FROM users
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list users")?;
        Ok(users)
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username
            FROM users
            WHERE username = $1
            LIMIT 1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .context("find user by username")?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn insert_user(&self, username: &str) -> anyhow::Result<Uuid> {
        let (id,) = sqlx::query_as::<_, (Uuid,)>(
            r#"
            INSERT INTO users (username)
            VALUES ($1)
            RETURNING id
            "#,
        )
        .bind(username)
        .fetch_one(&self.db)
        .await
        .context("insert user")?;
        Ok(id)
    }

    async fn insert_log(&self, entry: NewLogEntry) -> anyhow::Result<Uuid> {
        let (id,) = sqlx::query_as::<_, (Uuid,)>(
            r#"
            INSERT INTO logs (user_id, description, duration, date_string, date_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(entry.user_id)
        .bind(entry.description)
        .bind(entry.duration)
        .bind(entry.date_string)
        .bind(entry.date_time)
        .fetch_one(&self.db)
        .await
        .context("insert log")?;
        Ok(id)
    }

    async fn find_log_by_id(&self, id: Uuid) -> anyhow::Result<Option<LogEntry>> {
        let log = sqlx::query_as::<_, LogEntry>(
            r#"
            SELECT id, user_id, description, duration, date_string, date_time
            FROM logs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find log by id")?;
        Ok(log)
    }

    async fn find_logs(&self, filter: &LogFilter) -> anyhow::Result<Vec<LogEntry>> {
        // LIMIT NULL is LIMIT ALL.
        let rows = sqlx::query_as::<_, LogEntry>(
            r#"
            SELECT id, user_id, description, duration, date_string, date_time
            FROM logs
            WHERE user_id = $1
              AND ($2::BIGINT IS NULL OR date_time > $2)
              AND ($3::BIGINT IS NULL OR date_time <= $3)
            LIMIT $4
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.after)
        .bind(filter.until)
        .bind(filter.limit)
        .fetch_all(&self.db)
        .await
        .context("find logs")?;
        Ok(rows)
    }
}
