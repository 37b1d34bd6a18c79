mod common;

use std::collections::HashSet;

use common::{diamond_snapshot, position};
use studyplan_backend::planner::checkpoint::{FINAL_EXAM_ID, MID_EXAM_ID};
use studyplan_backend::planner::{
    build_study_plan, CourseBudget, LessonNode, MasteryStatus, PlanError, PlannerConfig,
    StudyMode, UserNodeState,
};

const EXAM_VALUES: [f64; 4] = [0.0, 0.0, 8.0, 7.0];

#[test]
fn deep_study_when_budget_has_room() {
    let snapshot = diamond_snapshot(EXAM_VALUES, 3.0);
    let outcome = build_study_plan(&snapshot, &PlannerConfig::default()).unwrap();
    let plan = &outcome.plan;

    assert_eq!(plan.mode, StudyMode::DeepStudy);
    assert_eq!(plan.lesson_ids().len(), 4);
    assert_eq!(&plan.lesson_ids()[..2], &["A", "B"]);
    assert!(position(plan, "C") > position(plan, "B"));
    assert!(position(plan, "D") > position(plan, "B"));
    assert_eq!(plan.total_minutes, 108);
    assert!((outcome.diagnostics.total_time_needed - 108.0).abs() < 1e-6);
}

#[test]
fn cram_with_nothing_affordable_is_empty() {
    let snapshot = diamond_snapshot(EXAM_VALUES, 1.0);
    let outcome = build_study_plan(&snapshot, &PlannerConfig::default()).unwrap();

    assert_eq!(outcome.plan.mode, StudyMode::Cram);
    assert_eq!(outcome.plan.total_minutes, 0);
    assert!(outcome.plan.lesson_ids().is_empty());
    assert!(outcome.plan.modules.is_empty());
    assert_eq!(outcome.diagnostics.chains_discarded, 2);
}

#[test]
fn cram_pays_shared_ancestors_once() {
    let snapshot = diamond_snapshot(EXAM_VALUES, 1.84);
    let outcome = build_study_plan(&snapshot, &PlannerConfig::default()).unwrap();
    let plan = &outcome.plan;

    assert_eq!(plan.mode, StudyMode::Cram);
    let ids: HashSet<&str> = plan.lesson_ids().into_iter().collect();
    assert_eq!(ids, HashSet::from(["A", "B", "C", "D"]));
    assert_eq!(plan.total_minutes, 108);
    assert_eq!(outcome.diagnostics.chains_committed, 2);
    assert!(position(plan, "A") < position(plan, "B"));
}

#[test]
fn cram_skips_lessons_no_target_depends_on() {
    let mut snapshot = diamond_snapshot(EXAM_VALUES, 3.0);
    snapshot
        .nodes
        .push(LessonNode::new("E", "Elective").with_module("Module E").with_minutes(30.0));
    let outcome = build_study_plan(&snapshot, &PlannerConfig::default()).unwrap();

    // 135 minutes pending needs 202.5 with the buffer; both chains fit in 180
    assert_eq!(outcome.plan.mode, StudyMode::Cram);
    assert_eq!(outcome.diagnostics.chains_committed, 2);
    assert!(!outcome.plan.lesson_ids().contains(&"E"));
    assert!(!outcome.sequence.iter().any(|id| id == "E"));
    assert_eq!(outcome.plan.total_minutes, 108);
}

#[test]
fn cram_falls_back_to_top_ranked_targets() {
    let snapshot = diamond_snapshot([5.0, 5.0, 5.0, 6.0], 2.0);
    let outcome = build_study_plan(&snapshot, &PlannerConfig::default()).unwrap();

    assert_eq!(outcome.plan.mode, StudyMode::Cram);
    assert!(outcome.diagnostics.fallback_targets);
    assert_eq!(outcome.diagnostics.targets, 1);
    assert_eq!(outcome.plan.lesson_ids(), vec!["A", "B", "D"]);
    assert_eq!(outcome.plan.total_minutes, 81);
}

#[test]
fn mastered_lessons_survive_any_budget() {
    let mut snapshot = diamond_snapshot(EXAM_VALUES, 1.0 / 60.0);
    snapshot.user_state[0] = UserNodeState::new("A", MasteryStatus::Mastered).with_familiarity(0.9);
    let outcome = build_study_plan(&snapshot, &PlannerConfig::default()).unwrap();
    let plan = &outcome.plan;

    assert_eq!(plan.mode, StudyMode::Cram);
    assert_eq!(plan.lesson_ids(), vec!["A"]);
    assert_eq!(plan.total_minutes, 0);

    let lesson = &plan.modules[0].as_lessons().unwrap().lessons[0];
    assert_eq!(lesson.duration, 0);
    assert_eq!(lesson.status, MasteryStatus::Mastered);

    let exams = plan.practice_exams();
    assert_eq!(exams.len(), 1);
    assert_eq!(exams[0].exam.id, FINAL_EXAM_ID);
}

#[test]
fn checkpoints_sit_inside_and_grow() {
    let snapshot = diamond_snapshot(EXAM_VALUES, 3.0);
    let plan = build_study_plan(&snapshot, &PlannerConfig::default()).unwrap().plan;

    let mid_pos = plan
        .modules
        .iter()
        .position(|m| m.as_practice_exam().is_some_and(|e| e.exam.id == MID_EXAM_ID))
        .unwrap();
    assert!(mid_pos > 0);
    assert!(mid_pos < plan.modules.len() - 1);

    let last = plan.modules.last().unwrap().as_practice_exam().unwrap();
    assert_eq!(last.exam.id, FINAL_EXAM_ID);

    let mid = plan.modules[mid_pos].as_practice_exam().unwrap();
    let mid_set: HashSet<&String> = mid.exam.preceding_lessons.iter().collect();
    let final_set: HashSet<&String> = last.exam.preceding_lessons.iter().collect();
    assert!(mid_set.is_subset(&final_set));
    assert!(mid_set.len() < final_set.len());

    let ids = plan.lesson_ids();
    assert!(mid.exam.preceding_lessons.iter().any(|id| id == ids[0]));
    assert!(last.exam.preceding_lessons.iter().any(|id| id == ids[ids.len() - 1]));
}

#[test]
fn locks_follow_pending_parents() {
    let mut snapshot = diamond_snapshot(EXAM_VALUES, 3.0);
    snapshot.user_state[0] = UserNodeState::new("A", MasteryStatus::Mastered);
    snapshot.user_state[1] = UserNodeState::new("B", MasteryStatus::NeedsReview);
    let plan = build_study_plan(&snapshot, &PlannerConfig::default()).unwrap().plan;

    let locks: Vec<(String, bool)> = plan
        .modules
        .iter()
        .filter_map(|m| m.as_lessons())
        .flat_map(|m| m.lessons.iter().map(|l| (l.id.clone(), l.is_locked)))
        .collect();
    assert!(locks.iter().all(|(_, locked)| !locked));
}

#[test]
fn missing_or_invalid_budget_is_fatal() {
    let mut snapshot = diamond_snapshot(EXAM_VALUES, 3.0);
    snapshot.budget = None;
    assert_eq!(
        build_study_plan(&snapshot, &PlannerConfig::default()),
        Err(PlanError::MissingBudget)
    );

    snapshot.budget = Some(CourseBudget::seconds(0.0));
    assert_eq!(
        build_study_plan(&snapshot, &PlannerConfig::default()),
        Err(PlanError::NonPositiveBudget(0.0))
    );
}

#[test]
fn cycles_and_unknown_edges_are_tolerated() {
    let mut snapshot = diamond_snapshot(EXAM_VALUES, 10.0);
    snapshot.edges.push(studyplan_backend::planner::DependencyEdge::new("D", "A"));
    snapshot.edges.push(studyplan_backend::planner::DependencyEdge::new("A", "Z"));
    snapshot.nodes.push(LessonNode::new("E", "Loose end"));

    let outcome = build_study_plan(&snapshot, &PlannerConfig::default()).unwrap();
    assert_eq!(outcome.plan.mode, StudyMode::DeepStudy);
    assert_eq!(outcome.plan.lesson_ids().len(), 5);
    assert_eq!(outcome.diagnostics.dropped_edges, 1);
    assert!(outcome.diagnostics.cycles_detected >= 1);
}

#[test]
fn same_input_same_plan() {
    let snapshot = diamond_snapshot(EXAM_VALUES, 1.84);
    let first = build_study_plan(&snapshot, &PlannerConfig::default()).unwrap();
    let second = build_study_plan(&snapshot, &PlannerConfig::default()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.plan).unwrap(),
        serde_json::to_string(&second.plan).unwrap()
    );
}
