use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "memory" | "mem" => Ok(Self::Memory),
            other => anyhow::bail!("unknown STORAGE_BACKEND: {other}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

/// Account created with the admin role at startup. Registration never
/// grants admin.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl AdminSeed {
    /// `None` when `ADMIN_USERNAME` is unset; the other two are then required.
    fn from_env() -> anyhow::Result<Option<Self>> {
        let Ok(username) = std::env::var("ADMIN_USERNAME") else {
            return Ok(None);
        };
        Ok(Some(Self {
            username,
            email: std::env::var("ADMIN_EMAIL")
                .map_err(|_| anyhow::anyhow!("ADMIN_EMAIL must be set with ADMIN_USERNAME"))?,
            password: std::env::var("ADMIN_PASSWORD")
                .map_err(|_| anyhow::anyhow!("ADMIN_PASSWORD must be set with ADMIN_USERNAME"))?,
        }))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub backend: StorageBackend,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub admin: Option<AdminSeed>,
    pub cookie_secure: bool,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let backend = std::env::var("STORAGE_BACKEND")
            .ok()
            .map(|v| v.parse::<StorageBackend>())
            .transpose()?
            .unwrap_or(StorageBackend::Postgres);

        let database = match backend {
            StorageBackend::Postgres => Some(DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set for the postgres backend"))?,
                max_connections: env_or("DB_MAX_CONNECTIONS", 10),
                acquire_timeout_secs: env_or("DB_ACQUIRE_TIMEOUT_SECS", 5),
            }),
            StorageBackend::Memory => None,
        };

        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            ttl_minutes: env_or("JWT_TTL_MINUTES", 20),
        };

        Ok(Self {
            backend,
            database,
            jwt,
            admin: AdminSeed::from_env()?,
            cookie_secure: env_or("COOKIE_SECURE", false),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 8080),
        })
    }

    /// Config used by tests and local runs without a database.
    pub fn for_tests() -> Self {
        Self {
            backend: StorageBackend::Memory,
            database: None,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                ttl_minutes: 20,
            },
            admin: None,
            cookie_secure: false,
            host: "127.0.0.1".into(),
            port: 0,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_storage_backend() {
        assert_eq!("postgres".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
        assert_eq!("Memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("redis".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_config_uses_memory_backend() {
        let cfg = AppConfig::for_tests();
        assert_eq!(cfg.backend, StorageBackend::Memory);
        assert!(cfg.database.is_none());
        assert_eq!(cfg.jwt.ttl_minutes, 20);
        assert!(cfg.admin.is_none());
    }
}
