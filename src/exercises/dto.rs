use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `duration` as sent by the client: a JSON number or any string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationInput {
    Number(serde_json::Number),
    Text(String),
}

impl DurationInput {
    pub fn into_raw(self) -> String {
        match self {
            DurationInput::Number(n) => n.to_string(),
            DurationInput::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateExerciseRequest {
    pub description: String,
    pub duration: DurationInput,
    pub date: Option<String>,
}

/// `_id` carries the owning user's id, not the entry's.
#[derive(Debug, Serialize)]
pub struct ExerciseResponse {
    pub username: String,
    pub description: String,
    pub duration: Option<i64>,
    pub date: String,
    #[serde(rename = "_id")]
    pub id: Uuid,
}

#[derive(Debug, Default)]
pub struct LogQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

impl LogQuery {
    /// Builds the query from raw pairs; the first occurrence of a key wins
    /// and unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "from" => &mut query.from,
                "to" => &mut query.to,
                "limit" => &mut query.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn log_query_keeps_first_duplicate() {
        let q = LogQuery::from_pairs(pairs(&[
            ("limit", "1"),
            ("limit", "2"),
            ("from", "2023-01-01"),
            ("page", "3"),
        ]));
        assert_eq!(q.limit.as_deref(), Some("1"));
        assert_eq!(q.from.as_deref(), Some("2023-01-01"));
        assert_eq!(q.to, None);
    }
}

#[derive(Debug, Serialize)]
pub struct LogItem {
    pub description: String,
    pub duration: Option<i64>,
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub username: String,
    pub count: usize,
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub log: Vec<LogItem>,
}
