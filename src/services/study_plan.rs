use thiserror::Error;

use crate::db::snapshot::{load_snapshot, SnapshotError};
use crate::db::PlanStore;
use crate::planner::{build_study_plan, CourseSnapshot, PlanError, PlanOutcome, PlannerConfig};

#[derive(Debug, Error)]
pub enum StudyPlanError {
    #[error(transparent)]
    Load(#[from] SnapshotError),
    #[error(transparent)]
    Plan(#[from] PlanError),
}

pub async fn generate_study_plan(
    store: &PlanStore,
    course_id: &str,
    user_id: &str,
    config: &PlannerConfig,
) -> Result<PlanOutcome, StudyPlanError> {
    let snapshot = load_snapshot(store, course_id, user_id).await?;
    plan_snapshot(course_id, user_id, &snapshot, config)
}

/// Plans an already-loaded snapshot and logs what the planner tolerated.
pub fn plan_snapshot(
    course_id: &str,
    user_id: &str,
    snapshot: &CourseSnapshot,
    config: &PlannerConfig,
) -> Result<PlanOutcome, StudyPlanError> {
    let outcome = match build_study_plan(snapshot, config) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::warn!(course_id, user_id, error = %err, "study plan rejected");
            return Err(err.into());
        }
    };

    let diag = &outcome.diagnostics;
    if diag.dropped_edges > 0 || diag.duplicate_edges > 0 {
        tracing::warn!(
            course_id,
            dropped_edges = diag.dropped_edges,
            duplicate_edges = diag.duplicate_edges,
            "ignored dependency edges"
        );
    }
    if diag.cycles_detected > 0 {
        tracing::warn!(
            course_id,
            cycles_detected = diag.cycles_detected,
            "dependency cycles left unenforced"
        );
    }

    tracing::info!(
        course_id,
        user_id,
        mode = outcome.plan.mode.as_str(),
        total_minutes = outcome.plan.total_minutes,
        modules = outcome.plan.modules.len(),
        minutes_available = diag.minutes_available,
        total_time_needed = diag.total_time_needed,
        targets = diag.targets,
        fallback_targets = diag.fallback_targets,
        chains_committed = diag.chains_committed,
        chains_discarded = diag.chains_discarded,
        "study plan generated"
    );

    Ok(outcome)
}
