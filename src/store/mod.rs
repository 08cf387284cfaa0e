mod memory;
mod models;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use models::{LogEntry, LogFilter, NewLogEntry, User};
pub use postgres::PgStore;

/// Document-style access to the `users` and `logs` collections.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_users(&self) -> anyhow::Result<Vec<User>>;
    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Inserts a user and returns the generated id.
    async fn insert_user(&self, username: &str) -> anyhow::Result<Uuid>;
    /// Inserts a log entry and returns the generated id.
    async fn insert_log(&self, entry: NewLogEntry) -> anyhow::Result<Uuid>;
    async fn find_log_by_id(&self, id: Uuid) -> anyhow::Result<Option<LogEntry>>;
    /// Entries matching `filter`, in store order.
    async fn find_logs(&self, filter: &LogFilter) -> anyhow::Result<Vec<LogEntry>>;
}
