//! Startup wiring for a process that serves study plans.
//!
//! `PlannerApp::from_env` is the whole boot sequence: `.env` and environment
//! into [`Config`], tracing, then the course store. The SQLite fallback gets its
//! tables created on open so a fresh file is usable straight away.

use thiserror::Error;

use crate::config::Config;
use crate::db::config::DbConfigError;
use crate::db::schema::apply_sqlite_schema;
use crate::db::{DbInitError, PlanStore};
use crate::logging::{init_tracing, FileLogGuard};
use crate::planner::PlanOutcome;
use crate::services::study_plan::{generate_study_plan, StudyPlanError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] DbConfigError),
    #[error(transparent)]
    Store(#[from] DbInitError),
}

pub struct PlannerApp {
    config: Config,
    store: PlanStore,
    _log_guard: Option<FileLogGuard>,
}

impl PlannerApp {
    pub async fn from_env() -> Result<Self, StartupError> {
        let config = Config::load()?;
        Self::start(config).await
    }

    pub async fn start(config: Config) -> Result<Self, StartupError> {
        let log_guard = init_tracing(&config.logging);

        let store = PlanStore::connect(&config.db).await?;
        if let PlanStore::Fallback(pool) = &store {
            apply_sqlite_schema(pool).await.map_err(DbInitError::from)?;
        }

        tracing::info!(backend = store.backend_name(), "study planner ready");

        Ok(Self {
            config,
            store,
            _log_guard: log_guard,
        })
    }

    pub async fn plan(&self, course_id: &str, user_id: &str) -> Result<PlanOutcome, StudyPlanError> {
        generate_study_plan(&self.store, course_id, user_id, &self.config.planner).await
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &PlanStore {
        &self.store
    }

    pub async fn shutdown(self) {
        self.store.close().await;
        tracing::info!("study planner stopped");
    }
}
