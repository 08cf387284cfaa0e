use anyhow::anyhow;
use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::dates::{date_string, epoch_millis, from_bound, parse_date};
use super::dto::{CreateExerciseRequest, ExerciseResponse, LogItem, LogQuery, LogResponse};
use crate::error::{ApiError, ApiResult};
use crate::store::{LogEntry, LogFilter, NewLogEntry, Store};

pub const DEFAULT_LOG_LIMIT: i64 = 100;

/// Leading-integer coercion: `"30"` → 30, `" 45min"` → 45, `"0x1A"` → 26,
/// `"abc"` → None.
pub(crate) fn parse_int(raw: &str) -> Option<i64> {
    lazy_static! {
        static ref LEADING_INT: Regex =
            Regex::new(r"^\s*([+-]?)(?:0[xX]([0-9a-fA-F]*)|([0-9]+))").unwrap();
    }
    let caps = LEADING_INT.captures(raw)?;
    let magnitude = match (caps.get(2), caps.get(3)) {
        (Some(hex), _) => i64::from_str_radix(hex.as_str(), 16).ok()?,
        (None, Some(dec)) => dec.as_str().parse::<i64>().ok()?,
        (None, None) => return None,
    };
    match caps.get(1).map(|m| m.as_str()) {
        Some("-") => magnitude.checked_neg(),
        _ => Some(magnitude),
    }
}

/// Malformed ids are a server error, not a client one.
pub(crate) fn parse_user_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|e| ApiError::Internal(anyhow!("malformed user id {raw:?}: {e}")))
}

fn resolve_limit(raw: Option<&str>) -> Option<i64> {
    match raw.and_then(parse_int) {
        None => Some(DEFAULT_LOG_LIMIT),
        Some(0) => None,
        Some(n) => Some(n.checked_abs().unwrap_or(i64::MAX)),
    }
}

/// A `from`/`to` query value; `Invalid` did not parse as a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Absent,
    At(OffsetDateTime),
    Invalid,
}

fn bound(name: &str, raw: Option<&str>) -> Bound {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Bound::Absent;
    };
    match parse_date(raw) {
        Some(dt) => Bound::At(dt),
        None => {
            warn!(param = name, value = raw, "unparseable date bound");
            Bound::Invalid
        }
    }
}

fn log_item(entry: LogEntry) -> LogItem {
    LogItem {
        duration: parse_int(&entry.duration),
        description: entry.description,
        date: entry.date_string,
    }
}

pub async fn log_exercise(
    store: &dyn Store,
    raw_user_id: &str,
    req: CreateExerciseRequest,
) -> ApiResult<ExerciseResponse> {
    let date = match req.date.as_deref().filter(|d| !d.is_empty()) {
        Some(raw) => parse_date(raw)
            .ok_or_else(|| ApiError::BadRequest(format!("invalid date {raw:?}")))?,
        None => OffsetDateTime::now_utc(),
    };
    let user_id = parse_user_id(raw_user_id)?;

    let user = store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user {user_id}")))?;

    let inserted = store
        .insert_log(NewLogEntry {
            user_id,
            description: req.description,
            duration: req.duration.into_raw(),
            date_string: date_string(date)?,
            date_time: epoch_millis(date),
        })
        .await?;

    let log = store
        .find_log_by_id(inserted)
        .await?
        .ok_or_else(|| anyhow!("log {inserted} missing after insert"))?;

    info!(%user_id, log_id = %log.id, date = %log.date_string, "exercise logged");
    Ok(ExerciseResponse {
        username: user.username,
        duration: parse_int(&log.duration),
        description: log.description,
        date: log.date_string,
        id: log.user_id,
    })
}

pub async fn exercise_log(
    store: &dyn Store,
    raw_user_id: &str,
    query: LogQuery,
) -> ApiResult<LogResponse> {
    let user_id = parse_user_id(raw_user_id)?;
    // An invalid `from` leaves the lower end open; an invalid `to` matches nothing.
    let after = match bound("from", query.from.as_deref()) {
        Bound::At(dt) => Some(from_bound(dt)),
        Bound::Absent | Bound::Invalid => None,
    };
    let (until, empty) = match bound("to", query.to.as_deref()) {
        Bound::At(dt) => (Some(epoch_millis(dt)), false),
        Bound::Absent => (None, false),
        Bound::Invalid => (None, true),
    };
    let filter = LogFilter {
        after,
        until,
        limit: resolve_limit(query.limit.as_deref()),
        ..LogFilter::for_user(user_id)
    };

    let user = store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user {user_id}")))?;

    let log: Vec<LogItem> = if empty {
        Vec::new()
    } else {
        store
            .find_logs(&filter)
            .await?
            .into_iter()
            .map(log_item)
            .collect()
    };

    debug!(%user_id, count = log.len(), ?filter, "exercise log queried");
    Ok(LogResponse {
        username: user.username,
        count: log.len(),
        id: user.id,
        log,
    })
}
