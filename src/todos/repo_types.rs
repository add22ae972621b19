use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Todo record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: i32,
    pub complete: bool,
    pub owner_id: i64, // users.id
}
