use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use super::{dto::TodoDraft, repo_types::Todo, services};
use crate::{
    auth::Identity,
    error::AppError,
    extract::{ApiJson, TodoId},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos))
        .route("/todos/:id", get(get_todo))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/todos", post(create_todo))
        .route("/todos/:id", put(update_todo).delete(delete_todo))
        .route("/todos/:id/complete", put(complete_todo))
}

#[instrument(skip(state))]
pub async fn list_todos(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = services::list(&identity, state.todos.as_ref()).await?;
    Ok(Json(todos))
}

#[instrument(skip(state))]
pub async fn get_todo(
    State(state): State<AppState>,
    identity: Identity,
    TodoId(id): TodoId,
) -> Result<Json<Todo>, AppError> {
    let todo = services::get(&identity, state.todos.as_ref(), id).await?;
    Ok(Json(todo))
}

#[instrument(skip(state, draft))]
pub async fn create_todo(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(draft): ApiJson<TodoDraft>,
) -> Result<impl IntoResponse, AppError> {
    let todo = services::create(&identity, state.todos.as_ref(), &draft).await?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/todos/{}", todo.id))],
    ))
}

#[instrument(skip(state, draft))]
pub async fn update_todo(
    State(state): State<AppState>,
    identity: Identity,
    TodoId(id): TodoId,
    ApiJson(draft): ApiJson<TodoDraft>,
) -> Result<StatusCode, AppError> {
    services::update(&identity, state.todos.as_ref(), id, &draft).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    identity: Identity,
    TodoId(id): TodoId,
) -> Result<StatusCode, AppError> {
    services::delete(&identity, state.todos.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn complete_todo(
    State(state): State<AppState>,
    identity: Identity,
    TodoId(id): TodoId,
) -> Result<StatusCode, AppError> {
    services::toggle_complete(&identity, state.todos.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
