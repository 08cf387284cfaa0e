use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{CreateExerciseRequest, ExerciseResponse, LogQuery, LogResponse};
use super::services;
use crate::{
    error::ApiResult,
    extractors::{PathParam, Payload, QueryParams},
    state::AppState,
};

pub fn exercise_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/:id/exercises", post(create_exercise))
        .route("/api/users/:id/logs", get(get_logs))
}

/// POST /api/users/:id/exercises { description, duration, date? }
#[instrument(skip(state, payload))]
pub async fn create_exercise(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
    Payload(payload): Payload<CreateExerciseRequest>,
) -> ApiResult<Json<ExerciseResponse>> {
    let res = services::log_exercise(state.store.as_ref(), &id, payload).await?;
    Ok(Json(res))
}

/// GET /api/users/:id/logs?from&to&limit
#[instrument(skip(state))]
pub async fn get_logs(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
    QueryParams(pairs): QueryParams<Vec<(String, String)>>,
) -> ApiResult<Json<LogResponse>> {
    let query = LogQuery::from_pairs(pairs);
    let res = services::exercise_log(state.store.as_ref(), &id, query).await?;
    Ok(Json(res))
}
