use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
}

/// Exercise log record. `date_string` and `date_time` encode the same instant.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct LogEntry {
    pub id: Uuid,
    pub user_id: Uuid,              // weak reference to users.id
    pub description: String,
    pub duration: String,           // raw as supplied, coerced on read
    pub date_string: String,        // e.g. "Mon May 01 2023"
    pub date_time: i64,             // epoch milliseconds
}

#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub user_id: Uuid,
    pub description: String,
    pub duration: String,
    pub date_string: String,
    pub date_time: i64,
}

/// Selection of log entries for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    pub user_id: Uuid,
    /// Exclusive lower bound on `date_time`.
    pub after: Option<i64>,
    /// Inclusive upper bound on `date_time`.
    pub until: Option<i64>,
    /// `None` means uncapped.
    pub limit: Option<i64>,
}

impl LogFilter {
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            after: None,
            until: None,
            limit: None,
        }
    }

    pub fn matches(&self, entry: &LogEntry) -> bool {
        entry.user_id == self.user_id
            && self.after.map_or(true, |after| entry.date_time > after)
            && self.until.map_or(true, |until| entry.date_time <= until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(user_id: Uuid, date_time: i64) -> LogEntry {
        LogEntry {
            id: Uuid::new_v4(),
            user_id,
            description: "run".into(),
            duration: "30".into(),
            date_string: String::new(),
            date_time,
        }
    }

    #[test]
    fn filter_bounds_are_exclusive_then_inclusive() {
        let user = Uuid::new_v4();
        let filter = LogFilter {
            after: Some(100),
            until: Some(200),
            ..LogFilter::for_user(user)
        };
        assert!(!filter.matches(&entry(user, 100)));
        assert!(filter.matches(&entry(user, 101)));
        assert!(filter.matches(&entry(user, 200)));
        assert!(!filter.matches(&entry(user, 201)));
    }

    #[test]
    fn filter_rejects_other_users() {
        let filter = LogFilter::for_user(Uuid::new_v4());
        assert!(!filter.matches(&entry(Uuid::new_v4(), 0)));
    }

    #[test]
    fn user_serializes_id_as_underscore_id() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".into(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["_id"], user.id.to_string());
        assert_eq!(json["username"], "alice");
        assert!(json.get("id").is_none());
    }
}
