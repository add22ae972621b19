use tracing::{debug, info, warn};

use super::{dto::TodoDraft, repo::TodoRepo, repo_types::Todo};
use crate::{auth::Identity, error::AppError};

const NOT_FOUND: AppError = AppError::NotFound("Todo not found");

fn validated(draft: &TodoDraft) -> Result<(), AppError> {
    draft.validate().map_err(|fields| {
        debug!(?fields, "todo draft rejected");
        AppError::Validation(fields)
    })
}

fn require_admin(identity: &Identity) -> Result<(), AppError> {
    if identity.is_admin() {
        Ok(())
    } else {
        warn!(user_id = identity.id, role = %identity.role, "admin route denied");
        Err(AppError::Forbidden)
    }
}

/// The caller's todos, ascending by id.
pub async fn list(identity: &Identity, todos: &dyn TodoRepo) -> Result<Vec<Todo>, AppError> {
    Ok(todos.list_by_owner(identity.id).await?)
}

/// A todo the caller does not own is reported exactly like a missing one.
pub async fn get(identity: &Identity, todos: &dyn TodoRepo, id: i64) -> Result<Todo, AppError> {
    todos.find_owned(id, identity.id).await?.ok_or(NOT_FOUND)
}

pub async fn create(
    identity: &Identity,
    todos: &dyn TodoRepo,
    draft: &TodoDraft,
) -> Result<Todo, AppError> {
    validated(draft)?;
    let todo = todos.insert(identity.id, draft).await?;
    info!(user_id = identity.id, todo_id = todo.id, "todo created");
    Ok(todo)
}

/// Replaces title, description, priority and complete in one write.
pub async fn update(
    identity: &Identity,
    todos: &dyn TodoRepo,
    id: i64,
    draft: &TodoDraft,
) -> Result<(), AppError> {
    validated(draft)?;
    if !todos.update_owned(id, identity.id, draft).await? {
        return Err(NOT_FOUND);
    }
    info!(user_id = identity.id, todo_id = id, "todo updated");
    Ok(())
}

pub async fn toggle_complete(
    identity: &Identity,
    todos: &dyn TodoRepo,
    id: i64,
) -> Result<(), AppError> {
    if !todos.toggle_complete_owned(id, identity.id).await? {
        return Err(NOT_FOUND);
    }
    info!(user_id = identity.id, todo_id = id, "todo completion toggled");
    Ok(())
}

pub async fn delete(identity: &Identity, todos: &dyn TodoRepo, id: i64) -> Result<(), AppError> {
    if !todos.delete_owned(id, identity.id).await? {
        return Err(NOT_FOUND);
    }
    info!(user_id = identity.id, todo_id = id, "todo deleted");
    Ok(())
}

/// Every todo regardless of owner. Admins only.
pub async fn list_all(identity: &Identity, todos: &dyn TodoRepo) -> Result<Vec<Todo>, AppError> {
    require_admin(identity)?;
    Ok(todos.list_all().await?)
}

/// Deletes any todo regardless of owner. Admins only.
pub async fn delete_any(
    identity: &Identity,
    todos: &dyn TodoRepo,
    id: i64,
) -> Result<(), AppError> {
    require_admin(identity)?;
    if !todos.delete_any(id).await? {
        return Err(NOT_FOUND);
    }
    info!(admin_id = identity.id, todo_id = id, "todo deleted by admin");
    Ok(())
}
