use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use uuid::Uuid;

use super::{LogEntry, LogFilter, NewLogEntry, Store, User};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    logs: Vec<LogEntry>,
}

/// Process-local store keeping both collections in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut Collections) -> T) -> anyhow::Result<T> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(f(&mut guard))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        self.with(|c| c.users.clone())
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        self.with(|c| c.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        self.with(|c| c.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert_user(&self, username: &str) -> anyhow::Result<Uuid> {
        let id = Uuid::new_v4();
        self.with(|c| {
            c.users.push(User {
                id,
                username: username.to_string(),
            })
        })?;
        Ok(id)
    }

    async fn insert_log(&self, entry: NewLogEntry) -> anyhow::Result<Uuid> {
        let id = Uuid::new_v4();
        self.with(|c| {
            c.logs.push(LogEntry {
                id,
                user_id: entry.user_id,
                description: entry.description,
                duration: entry.duration,
                date_string: entry.date_string,
                date_time: entry.date_time,
            })
        })?;
        Ok(id)
    }

    async fn find_log_by_id(&self, id: Uuid) -> anyhow::Result<Option<LogEntry>> {
        self.with(|c| c.logs.iter().find(|l| l.id == id).cloned())
    }

    async fn find_logs(&self, filter: &LogFilter) -> anyhow::Result<Vec<LogEntry>> {
        let cap = filter
            .limit
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);
        self.with(|c| {
            c.logs
                .iter()
                .filter(|l| filter.matches(l))
                .take(cap)
                .cloned()
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_entry(user_id: Uuid, date_time: i64) -> NewLogEntry {
        NewLogEntry {
            user_id,
            description: "swim".into(),
            duration: "20".into(),
            date_string: "Thu Jan 01 1970".into(),
            date_time,
        }
    }

    #[tokio::test]
    async fn insert_then_find_user() {
        let store = MemoryStore::new();
        let id = store.insert_user("bob").await.unwrap();
        let by_id = store.find_user_by_id(id).await.unwrap().expect("user by id");
        let by_name = store
            .find_user_by_username("bob")
            .await
            .unwrap()
            .expect("user by name");
        assert_eq!(by_id, by_name);
        assert!(store.find_user_by_username("Bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_logs_respects_limit_and_order() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        for t in [30, 10, 20] {
            store.insert_log(new_entry(user, t)).await.unwrap();
        }
        store.insert_log(new_entry(Uuid::new_v4(), 5)).await.unwrap();

        let all = store.find_logs(&LogFilter::for_user(user)).await.unwrap();
        let times: Vec<i64> = all.iter().map(|l| l.date_time).collect();
        assert_eq!(times, vec![30, 10, 20]);

        let capped = LogFilter {
            limit: Some(2),
            ..LogFilter::for_user(user)
        };
        assert_eq!(store.find_logs(&capped).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn inserted_log_is_readable_by_id() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let id = store.insert_log(new_entry(user, 42)).await.unwrap();
        let log = store.find_log_by_id(id).await.unwrap().expect("log");
        assert_eq!(log.user_id, user);
        assert_eq!(log.date_time, 42);
        assert!(store.find_log_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }
}
