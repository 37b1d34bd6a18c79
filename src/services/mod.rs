pub mod study_plan;
