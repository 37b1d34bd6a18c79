use crate::db::config::{DbConfig, DbConfigError};
use crate::logging::LogSettings;
use crate::planner::PlannerConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub logging: LogSettings,
    pub db: DbConfig,
    pub planner: PlannerConfig,
}

impl Config {
    /// Reads `.env` when present, then the process environment.
    pub fn load() -> Result<Self, DbConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, DbConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, DbConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            logging: LogSettings::from_lookup(&lookup),
            db: DbConfig::from_lookup(&lookup)?,
            planner: PlannerConfig::from_lookup(&lookup),
        })
    }
}
