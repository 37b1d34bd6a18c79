use super::types::{LessonModule, PlanModule, PracticeExamModule};

pub const MID_EXAM_ID: &str = "practice-exam-mid";
pub const FINAL_EXAM_ID: &str = "practice-exam-final";

/// Interleaves practice exams with the lesson modules.
///
/// The mid exam follows the first module boundary where at least half of all
/// scheduled lessons are behind the learner, kept strictly inside the module
/// list. The final exam closes the plan. A single module only gets the final
/// exam and an empty plan gets none.
pub fn insert_checkpoints(modules: Vec<LessonModule>) -> Vec<PlanModule> {
    if modules.is_empty() {
        return Vec::new();
    }

    let split = (modules.len() >= 2).then(|| mid_split(&modules));
    let mut out = Vec::with_capacity(modules.len() + 2);
    let mut preceding: Vec<String> = Vec::new();

    for (pos, module) in modules.into_iter().enumerate() {
        preceding.extend(module.lessons.iter().map(|lesson| lesson.id.clone()));
        out.push(PlanModule::Lessons(module));

        if split == Some(pos + 1) {
            out.push(PlanModule::PracticeExam(PracticeExamModule::new(
                MID_EXAM_ID,
                preceding.clone(),
            )));
        }
    }

    out.push(PlanModule::PracticeExam(PracticeExamModule::new(
        FINAL_EXAM_ID,
        preceding,
    )));
    out
}

/// Number of modules placed before the mid exam, in `1..modules.len()`.
fn mid_split(modules: &[LessonModule]) -> usize {
    let total: usize = modules.iter().map(|module| module.lessons.len()).sum();
    let mut covered = 0;
    let mut split = modules.len() - 1;

    for (pos, module) in modules.iter().enumerate() {
        covered += module.lessons.len();
        if covered * 2 >= total {
            split = pos + 1;
            break;
        }
    }

    split.clamp(1, modules.len() - 1)
}
