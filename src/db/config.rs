use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres { url: String },
    Sqlite { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub backend: StoreBackend,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub sqlite_busy_timeout: Duration,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DbConfigError {
    #[error("missing environment variable: {key}")]
    Missing { key: &'static str },
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

impl DbConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DbConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let backend = match lookup("PLAN_STORE").as_deref().map(str::trim) {
            Some("postgres") => StoreBackend::Postgres {
                url: database_url.ok_or(DbConfigError::Missing {
                    key: "DATABASE_URL",
                })?,
            },
            Some("sqlite") => sqlite_backend(&lookup),
            Some(other) if !other.is_empty() => {
                return Err(DbConfigError::Invalid {
                    key: "PLAN_STORE",
                    value: other.to_string(),
                })
            }
            _ => match database_url {
                Some(url) => StoreBackend::Postgres { url },
                None => sqlite_backend(&lookup),
            },
        };

        Ok(Self {
            backend,
            max_connections: env_u32(&lookup, "DB_MAX_CONNECTIONS", 5).max(1),
            acquire_timeout: Duration::from_millis(env_u64(&lookup, "DB_ACQUIRE_TIMEOUT_MS", 5000)),
            sqlite_busy_timeout: Duration::from_millis(env_u64(
                &lookup,
                "SQLITE_BUSY_TIMEOUT_MS",
                5000,
            )),
        })
    }
}

fn sqlite_backend<F>(lookup: &F) -> StoreBackend
where
    F: Fn(&str) -> Option<String>,
{
    let raw_path = lookup("SQLITE_PATH").unwrap_or_else(|| "./data/planner.db".to_string());
    StoreBackend::Sqlite {
        path: resolve_path_relative_to_manifest_dir(&raw_path),
    }
}

fn env_u64<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_u32<F>(lookup: &F, key: &str, default: u32) -> u32
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(default)
}

fn resolve_path_relative_to_manifest_dir(value: &str) -> PathBuf {
    let raw = Path::new(value);
    if raw.is_absolute() {
        return raw.to_path_buf();
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(raw)
}
