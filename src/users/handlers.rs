use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{ChangePasswordRequest, UserProfile},
    services,
};
use crate::{
    auth::Identity,
    error::AppError,
    extract::{ApiJson, ApiPath},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(get_user))
        .route("/user/password", put(change_password))
        .route("/user/phone_number/:phone_number", put(change_phone_number))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<UserProfile>, AppError> {
    let profile = services::get_profile(&identity, state.users.as_ref()).await?;
    Ok(Json(profile))
}

#[instrument(skip(state, identity, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(payload): ApiJson<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    services::change_password(
        &identity,
        state.users.as_ref(),
        &payload.password,
        &payload.new_password,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, identity))]
pub async fn change_phone_number(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(phone_number): ApiPath<String>,
) -> Result<StatusCode, AppError> {
    services::change_phone_number(&identity, state.users.as_ref(), &phone_number).await?;
    Ok(StatusCode::NO_CONTENT)
}
