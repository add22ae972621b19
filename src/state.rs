use std::sync::Arc;

use anyhow::Context;

use crate::{
    auth::JwtKeys,
    config::{AppConfig, StorageBackend},
    db,
    error::AppError,
    memory::MemoryStore,
    todos::repo::{PgTodoRepo, TodoRepo},
    users::{
        repo::{PgUserRepo, UserRepo},
        services as accounts,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub users: Arc<dyn UserRepo>,
    pub todos: Arc<dyn TodoRepo>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let state = match config.backend {
            StorageBackend::Postgres => {
                let db_cfg = config
                    .database
                    .clone()
                    .context("postgres backend requires database config")?;
                let pool = db::connect(&db_cfg).await?;
                db::migrate(&pool).await;
                Self::from_parts(
                    config,
                    Arc::new(PgUserRepo::new(pool.clone())),
                    Arc::new(PgTodoRepo::new(pool)),
                )
            }
            StorageBackend::Memory => {
                tracing::warn!("using in-memory store; data is lost on exit");
                Self::in_memory(config)
            }
        };

        if let Err(e) = state.seed_admin().await {
            tracing::error!(error = %e, "failed to provision admin user");
        }
        Ok(state)
    }

    /// Creates the configured admin account if it does not exist yet.
    pub async fn seed_admin(&self) -> Result<(), AppError> {
        if let Some(seed) = &self.config.admin {
            accounts::ensure_admin(self.users.as_ref(), seed).await?;
        }
        Ok(())
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserRepo>,
        todos: Arc<dyn TodoRepo>,
    ) -> Self {
        let keys = JwtKeys::new(&config.jwt);
        Self {
            config: Arc::new(config),
            keys,
            users,
            todos,
        }
    }

    pub fn in_memory(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::from_parts(config, store.clone(), store)
    }

    /// In-memory state with test config.
    pub fn fake() -> Self {
        Self::in_memory(AppConfig::for_tests())
    }
}
