use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{LoginForm, TokenResponse},
    extractors::AUTH_COOKIE,
    identity::authenticate,
};
use crate::{
    error::AppError,
    extract::{ApiForm, ApiJson},
    state::AppState,
    users::{
        dto::{RegisterRequest, UserProfile},
        services as accounts,
    },
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth", post(register))
        .route("/auth/token", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let user = accounts::register(state.users.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(UserProfile::from(user))))
}

/// Issues an access token and mirrors it into an HTTP-only cookie for the
/// browser surface.
#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    let user = authenticate(state.users.as_ref(), &form.username, &form.password).await?;
    let token = state.keys.issue_access(&user)?;

    let mut cookie = format!(
        "{AUTH_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        state.keys.ttl.whole_seconds()
    );
    if state.config.cookie_secure {
        cookie.push_str("; Secure");
    }

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(TokenResponse::bearer(token)),
    ))
}
