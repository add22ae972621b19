use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewUser, User};
use crate::db::StoreError;

/// Persistence for user records.
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;
    /// Fails with `StoreError::Conflict` when username or email is taken.
    async fn create(&self, new: &NewUser) -> Result<User, StoreError>;
    /// Returns `false` when no row has this id.
    async fn update_password_hash(&self, id: i64, hashed_password: &str)
        -> Result<bool, StoreError>;
    async fn update_phone_number(&self, id: i64, phone_number: &str) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, first_name, last_name, phone_number, hashed_password, role
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, first_name, last_name, phone_number, hashed_password, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, new: &NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, first_name, last_name, phone_number, hashed_password, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, username, email, first_name, last_name, phone_number, hashed_password, role
            "#,
        )
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.phone_number)
        .bind(&new.hashed_password)
        .bind(new.role.as_str())
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn update_password_hash(
        &self,
        id: i64,
        hashed_password: &str,
    ) -> Result<bool, StoreError> {
        let res = sqlx::query("UPDATE users SET hashed_password = $1 WHERE id = $2")
            .bind(hashed_password)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn update_phone_number(&self, id: i64, phone_number: &str) -> Result<bool, StoreError> {
        let res = sqlx::query("UPDATE users SET phone_number = $1 WHERE id = $2")
            .bind(phone_number)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}
