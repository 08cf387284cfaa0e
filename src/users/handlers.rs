use anyhow::anyhow;
use axum::{extract::State, routing::get, Json, Router};
use tracing::{debug, info, instrument};

use super::dto::CreateUserRequest;
use crate::{error::ApiResult, extractors::Payload, state::AppState, store::User};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/api/users", get(list_users).post(create_user))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = state.store.list_users().await?;
    debug!(count = users.len(), "users listed");
    Ok(Json(users))
}

/// Returns the existing user when the username is already taken.
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Payload(payload): Payload<CreateUserRequest>,
) -> ApiResult<Json<User>> {
    let store = state.store.as_ref();

    if let Some(existing) = store.find_user_by_username(&payload.username).await? {
        debug!(user_id = %existing.id, username = %existing.username, "user already exists");
        return Ok(Json(existing));
    }

    let id = store.insert_user(&payload.username).await?;
    let user = store
        .find_user_by_id(id)
        .await?
        .ok_or_else(|| anyhow!("user {id} missing after insert"))?;

    info!(user_id = %user.id, username = %user.username, "user created");
    Ok(Json(user))
}
