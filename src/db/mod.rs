pub mod config;
pub mod schema;
pub mod snapshot;

use std::str::FromStr;

use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};
use thiserror::Error;

use crate::db::config::{DbConfig, StoreBackend};

/// Read-only handle on the course store.
#[derive(Debug, Clone)]
pub enum PlanStore {
    Primary(PgPool),
    Fallback(SqlitePool),
}

#[derive(Debug, Error)]
pub enum DbInitError {
    #[error("database connection failed: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("failed to prepare sqlite directory: {0}")]
    Io(#[from] std::io::Error),
}

impl PlanStore {
    pub async fn connect(config: &DbConfig) -> Result<Self, DbInitError> {
        match &config.backend {
            StoreBackend::Postgres { url } => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(config.acquire_timeout)
                    .connect(url)
                    .await?;
                tracing::info!(backend = "postgres", "plan store connected");
                Ok(Self::Primary(pool))
            }
            StoreBackend::Sqlite { path } => {
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }

                let url = format!("sqlite:{}?mode=rwc", path.display());
                let options = SqliteConnectOptions::from_str(&url)?
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
                    .busy_timeout(config.sqlite_busy_timeout);

                let pool = SqlitePoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(config.acquire_timeout)
                    .connect_with(options)
                    .await?;
                tracing::info!(backend = "sqlite", path = %path.display(), "plan store connected");
                Ok(Self::Fallback(pool))
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Primary(_) => "postgres",
            Self::Fallback(_) => "sqlite",
        }
    }

    pub async fn close(&self) {
        match self {
            Self::Primary(pool) => pool.close().await,
            Self::Fallback(pool) => pool.close().await,
        }
    }
}
