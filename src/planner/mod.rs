//! Adaptive study-plan scheduler.
//!
//! Turns a course snapshot into a study plan:
//! graph build -> learner state -> mode choice -> ordering (Deep Study) or
//! chain selection (Cram) -> module grouping and practice exams.
//!
//! Everything here is synchronous and works on borrowed snapshot data only.

pub mod checkpoint;
pub mod config;
pub mod cram;
pub mod format;
pub mod graph;
pub mod hydrate;
pub mod mode;
pub mod sequence;
pub mod types;

pub use config::PlannerConfig;
pub use graph::CourseGraph;
pub use hydrate::{hydrate, HydratedGraph};
pub use types::*;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error("course budget is missing: seconds_to_complete is required to plan")]
    MissingBudget,
    #[error("course budget must be positive, got {0} seconds")]
    NonPositiveBudget(f64),
}

pub fn build_study_plan(
    snapshot: &CourseSnapshot,
    config: &PlannerConfig,
) -> Result<PlanOutcome, PlanError> {
    let minutes_available = mode::minutes_available(snapshot.budget.as_ref())?;

    let graph = CourseGraph::build(&snapshot.nodes, &snapshot.edges);
    let hydrated = hydrate(&graph, &snapshot.user_state, config);
    let decision = mode::select_mode(&hydrated, minutes_available, config);

    let mut diagnostics = PlanDiagnostics {
        dropped_edges: graph.dropped_edges(),
        duplicate_edges: graph.duplicate_edges(),
        total_time_needed: decision.total_time_needed,
        minutes_available,
        ..Default::default()
    };

    let sequence = match decision.mode {
        StudyMode::DeepStudy => sequence::full_order(&graph),
        StudyMode::Cram => {
            let selection = cram::select_chains(&hydrated, minutes_available, config);
            diagnostics.targets = selection.targets;
            diagnostics.fallback_targets = selection.fallback_targets;
            diagnostics.chains_committed = selection.chains_committed;
            diagnostics.chains_discarded = selection.chains_discarded;
            cram::cram_sequence(&hydrated, &selection)
        }
    };
    diagnostics.cycles_detected = sequence.cycles_detected;

    let plan = format::format_plan(&hydrated, decision.mode, &sequence.order, config);
    let sequence = sequence
        .order
        .iter()
        .map(|&idx| graph.lesson(idx).id.clone())
        .collect();

    Ok(PlanOutcome {
        plan,
        diagnostics,
        sequence,
    })
}
