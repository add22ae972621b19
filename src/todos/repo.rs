use async_trait::async_trait;
use sqlx::PgPool;

use super::{dto::TodoDraft, repo_types::Todo};
use crate::db::StoreError;

/// Persistence for todos. Every `*_owned` method matches on `id AND owner_id`
/// in a single statement.
#[async_trait]
pub trait TodoRepo: Send + Sync {
    /// Ordered by ascending id.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Todo>, StoreError>;
    async fn list_all(&self) -> Result<Vec<Todo>, StoreError>;
    async fn find_owned(&self, id: i64, owner_id: i64) -> Result<Option<Todo>, StoreError>;
    async fn insert(&self, owner_id: i64, draft: &TodoDraft) -> Result<Todo, StoreError>;
    /// The `bool` results report whether a row matched.
    async fn update_owned(
        &self,
        id: i64,
        owner_id: i64,
        draft: &TodoDraft,
    ) -> Result<bool, StoreError>;
    async fn toggle_complete_owned(&self, id: i64, owner_id: i64) -> Result<bool, StoreError>;
    async fn delete_owned(&self, id: i64, owner_id: i64) -> Result<bool, StoreError>;
    async fn delete_any(&self, id: i64) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgTodoRepo {
    db: PgPool,
}

impl PgTodoRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoRepo for PgTodoRepo {
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Todo>, StoreError> {
        let rows = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, description, priority, complete, owner_id
            FROM todos
            WHERE owner_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn list_all(&self) -> Result<Vec<Todo>, StoreError> {
        let rows = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, description, priority, complete, owner_id
            FROM todos
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_owned(&self, id: i64, owner_id: i64) -> Result<Option<Todo>, StoreError> {
        let row = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, description, priority, complete, owner_id
            FROM todos
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn insert(&self, owner_id: i64, draft: &TodoDraft) -> Result<Todo, StoreError> {
        let row = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (title, description, priority, complete, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, priority, complete, owner_id
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.priority)
        .bind(draft.complete)
        .bind(owner_id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update_owned(
        &self,
        id: i64,
        owner_id: i64,
        draft: &TodoDraft,
    ) -> Result<bool, StoreError> {
        let res = sqlx::query(
            r#"
            UPDATE todos
               SET title = $1, description = $2, priority = $3, complete = $4
             WHERE id = $5 AND owner_id = $6
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.priority)
        .bind(draft.complete)
        .bind(id)
        .bind(owner_id)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn toggle_complete_owned(&self, id: i64, owner_id: i64) -> Result<bool, StoreError> {
        let res = sqlx::query(
            "UPDATE todos SET complete = NOT complete WHERE id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn delete_owned(&self, id: i64, owner_id: i64) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM todos WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn delete_any(&self, id: i64) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}
