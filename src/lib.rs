pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod planner;
pub mod services;

pub use planner::{build_study_plan, PlanError, PlanOutcome, PlannerConfig, StudyPlan};
