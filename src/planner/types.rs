use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PRACTICE_EXAM_TYPE: &str = "practice_exam";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryStatus {
    #[default]
    Pending,
    Mastered,
    NeedsReview,
}

impl MasteryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Mastered => "mastered",
            Self::NeedsReview => "needs_review",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "mastered" => Self::Mastered,
            "needs_review" => Self::NeedsReview,
            _ => Self::Pending,
        }
    }

    pub fn is_mastered(&self) -> bool {
        matches!(self, Self::Mastered)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyMode {
    #[serde(rename = "Deep Study")]
    DeepStudy,
    #[serde(rename = "Cram")]
    Cram,
}

impl StudyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeepStudy => "Deep Study",
            Self::Cram => "Cram",
        }
    }
}

/// A lesson as stored for the course. Never mutated by the planner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub module_ref: Option<String>,
    #[serde(default)]
    pub estimated_minutes: Option<f64>,
    #[serde(default)]
    pub bloom_level: Option<String>,
    #[serde(default)]
    pub intrinsic_exam_value: Option<f64>,
    #[serde(default)]
    pub content_payload: Option<Value>,
}

impl LessonNode {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_module(mut self, module_ref: impl Into<String>) -> Self {
        self.module_ref = Some(module_ref.into());
        self
    }

    pub fn with_minutes(mut self, minutes: f64) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }

    pub fn with_exam_value(mut self, value: f64) -> Self {
        self.intrinsic_exam_value = Some(value);
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.content_payload = Some(payload);
        self
    }

    /// Estimated minutes, or `default` when absent, non-finite or not positive.
    pub fn minutes_or(&self, default: f64) -> f64 {
        match self.estimated_minutes {
            Some(minutes) if minutes.is_finite() && minutes > 0.0 => minutes,
            _ => default,
        }
    }

    pub fn exam_value(&self) -> f64 {
        self.intrinsic_exam_value
            .filter(|value| value.is_finite())
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub parent_id: String,
    pub child_id: String,
}

impl DependencyEdge {
    pub fn new(parent_id: impl Into<String>, child_id: impl Into<String>) -> Self {
        Self {
            parent_id: parent_id.into(),
            child_id: child_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserNodeState {
    pub node_id: String,
    #[serde(default)]
    pub mastery_status: MasteryStatus,
    #[serde(default)]
    pub familiarity_score: Option<f64>,
}

impl UserNodeState {
    pub fn new(node_id: impl Into<String>, mastery_status: MasteryStatus) -> Self {
        Self {
            node_id: node_id.into(),
            mastery_status,
            familiarity_score: None,
        }
    }

    pub fn with_familiarity(mut self, score: f64) -> Self {
        self.familiarity_score = Some(score);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CourseBudget {
    #[serde(default)]
    pub seconds_to_complete: Option<f64>,
}

impl CourseBudget {
    pub fn seconds(seconds: f64) -> Self {
        Self {
            seconds_to_complete: Some(seconds),
        }
    }
}

/// Everything the planner reads for one (course, learner) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseSnapshot {
    pub nodes: Vec<LessonNode>,
    pub edges: Vec<DependencyEdge>,
    pub user_state: Vec<UserNodeState>,
    pub budget: Option<CourseBudget>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
    Reading,
    Video,
    Quiz,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedLesson {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: LessonKind,
    pub duration: i64,
    pub is_locked: bool,
    pub status: MasteryStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonModule {
    pub title: String,
    pub lessons: Vec<PlannedLesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeExam {
    pub id: String,
    pub preceding_lessons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeExamModule {
    pub is_practice_exam_module: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub exam: PracticeExam,
}

impl PracticeExamModule {
    pub fn new(id: impl Into<String>, preceding_lessons: Vec<String>) -> Self {
        Self {
            is_practice_exam_module: true,
            kind: PRACTICE_EXAM_TYPE.to_string(),
            exam: PracticeExam {
                id: id.into(),
                preceding_lessons,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanModule {
    PracticeExam(PracticeExamModule),
    Lessons(LessonModule),
}

impl PlanModule {
    pub fn as_lessons(&self) -> Option<&LessonModule> {
        match self {
            Self::Lessons(module) => Some(module),
            Self::PracticeExam(_) => None,
        }
    }

    pub fn as_practice_exam(&self) -> Option<&PracticeExamModule> {
        match self {
            Self::PracticeExam(module) => Some(module),
            Self::Lessons(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub mode: StudyMode,
    pub total_minutes: i64,
    pub modules: Vec<PlanModule>,
}

impl StudyPlan {
    /// Lesson ids in scheduling order, skipping practice exams.
    pub fn lesson_ids(&self) -> Vec<&str> {
        self.modules
            .iter()
            .filter_map(PlanModule::as_lessons)
            .flat_map(|module| module.lessons.iter().map(|lesson| lesson.id.as_str()))
            .collect()
    }

    pub fn practice_exams(&self) -> Vec<&PracticeExamModule> {
        self.modules
            .iter()
            .filter_map(PlanModule::as_practice_exam)
            .collect()
    }
}

/// Counters for input the planner tolerated instead of rejecting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanDiagnostics {
    pub dropped_edges: usize,
    pub duplicate_edges: usize,
    pub cycles_detected: usize,
    pub total_time_needed: f64,
    pub minutes_available: f64,
    pub targets: usize,
    pub fallback_targets: bool,
    pub chains_committed: usize,
    pub chains_discarded: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub plan: StudyPlan,
    pub diagnostics: PlanDiagnostics,
    /// Lesson ids in prerequisite order, before module grouping.
    ///
    /// Grouping keeps modules in first-seen order, so a lesson whose module
    /// appeared early can be listed ahead of a prerequisite from a later
    /// module in `plan`. This list is the order the dependencies hold in.
    pub sequence: Vec<String>,
}
