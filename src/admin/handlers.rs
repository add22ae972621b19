use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::Identity,
    error::AppError,
    extract::TodoId,
    state::AppState,
    todos::{repo_types::Todo, services},
};

/// Role-checked variants of the todo operations; the service rejects
/// non-admin callers with 403.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/todos", get(list_all_todos))
        .route("/admin/todos/:id", delete(delete_any_todo))
}

#[instrument(skip(state))]
pub async fn list_all_todos(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = services::list_all(&identity, state.todos.as_ref()).await?;
    Ok(Json(todos))
}

#[instrument(skip(state))]
pub async fn delete_any_todo(
    State(state): State<AppState>,
    identity: Identity,
    TodoId(id): TodoId,
) -> Result<StatusCode, AppError> {
    services::delete_any(&identity, state.todos.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
