use super::config::PlannerConfig;
use super::hydrate::HydratedGraph;
use super::types::{CourseBudget, StudyMode};
use super::PlanError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeDecision {
    pub mode: StudyMode,
    pub total_time_needed: f64,
    pub minutes_available: f64,
}

/// Validates the course budget and converts it to minutes.
pub fn minutes_available(budget: Option<&CourseBudget>) -> Result<f64, PlanError> {
    let seconds = budget
        .and_then(|budget| budget.seconds_to_complete)
        .ok_or(PlanError::MissingBudget)?;

    if seconds.is_nan() || seconds <= 0.0 {
        return Err(PlanError::NonPositiveBudget(seconds));
    }

    Ok(seconds / 60.0)
}

pub fn select_mode(
    hydrated: &HydratedGraph<'_>,
    minutes_available: f64,
    config: &PlannerConfig,
) -> ModeDecision {
    let total_time_needed = hydrated.remaining_cost();
    let mode = if minutes_available >= total_time_needed * config.deep_study_buffer {
        StudyMode::DeepStudy
    } else {
        StudyMode::Cram
    };

    ModeDecision {
        mode,
        total_time_needed,
        minutes_available,
    }
}
