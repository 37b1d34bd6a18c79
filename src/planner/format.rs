use std::collections::HashMap;

use serde_json::Value;

use super::checkpoint::insert_checkpoints;
use super::config::PlannerConfig;
use super::hydrate::HydratedGraph;
use super::types::{LessonKind, LessonModule, MasteryStatus, PlannedLesson, StudyMode, StudyPlan};

pub fn lesson_kind(payload: Option<&Value>) -> LessonKind {
    match payload.and_then(Value::as_object) {
        Some(map) if map.contains_key("video") => LessonKind::Video,
        Some(map) if map.contains_key("quiz") => LessonKind::Quiz,
        _ => LessonKind::Reading,
    }
}

/// A lesson is locked while any direct prerequisite is still pending.
pub fn is_locked(hydrated: &HydratedGraph<'_>, idx: usize) -> bool {
    hydrated
        .parents(idx)
        .iter()
        .any(|&parent| hydrated.status(parent) == MasteryStatus::Pending)
}

pub fn plan_lesson(hydrated: &HydratedGraph<'_>, idx: usize) -> PlannedLesson {
    let lesson = hydrated.lesson(idx);
    let duration = if hydrated.is_mastered(idx) {
        0
    } else {
        hydrated.effective_cost(idx).round() as i64
    };

    PlannedLesson {
        id: lesson.id.clone(),
        title: lesson.title.clone(),
        kind: lesson_kind(lesson.content_payload.as_ref()),
        duration,
        is_locked: is_locked(hydrated, idx),
        status: hydrated.status(idx),
    }
}

/// Groups `order` by module label, modules in first-seen order.
pub fn group_modules(
    hydrated: &HydratedGraph<'_>,
    order: &[usize],
    config: &PlannerConfig,
) -> Vec<LessonModule> {
    let mut modules: Vec<LessonModule> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for &idx in order {
        let title = hydrated
            .lesson(idx)
            .module_ref
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(config.default_module_title.as_str());

        let pos = *positions.entry(title).or_insert_with(|| {
            modules.push(LessonModule {
                title: title.to_string(),
                lessons: Vec::new(),
            });
            modules.len() - 1
        });
        modules[pos].lessons.push(plan_lesson(hydrated, idx));
    }

    modules
}

/// Rounded once over the unrounded costs of the included pending lessons.
pub fn total_minutes(hydrated: &HydratedGraph<'_>, order: &[usize]) -> i64 {
    let total: f64 = order
        .iter()
        .filter(|&&idx| !hydrated.is_mastered(idx))
        .map(|&idx| hydrated.effective_cost(idx))
        .sum();
    total.round() as i64
}

pub fn format_plan(
    hydrated: &HydratedGraph<'_>,
    mode: StudyMode,
    order: &[usize],
    config: &PlannerConfig,
) -> StudyPlan {
    let modules = group_modules(hydrated, order, config);

    StudyPlan {
        mode,
        total_minutes: total_minutes(hydrated, order),
        modules: insert_checkpoints(modules),
    }
}
