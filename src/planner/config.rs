pub const DEFAULT_DEEP_STUDY_BUFFER: f64 = 1.5;
pub const DEFAULT_TARGET_VALUE_THRESHOLD: f64 = 7.0;
pub const DEFAULT_FALLBACK_TARGET_FRACTION: f64 = 0.2;
pub const DEFAULT_ESTIMATED_MINUTES: f64 = 30.0;
pub const DEFAULT_FAMILIARITY: f64 = 0.1;
pub const DEFAULT_MODULE_TITLE: &str = "General";

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Deep Study needs `minutes_available >= total_time_needed * deep_study_buffer`.
    pub deep_study_buffer: f64,
    /// Minimum exam value for a lesson to become a Cram target.
    pub target_value_threshold: f64,
    /// Share of pending lessons promoted to targets when none meets the threshold.
    pub fallback_target_fraction: f64,
    pub default_estimated_minutes: f64,
    pub default_familiarity: f64,
    pub default_module_title: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            deep_study_buffer: DEFAULT_DEEP_STUDY_BUFFER,
            target_value_threshold: DEFAULT_TARGET_VALUE_THRESHOLD,
            fallback_target_fraction: DEFAULT_FALLBACK_TARGET_FRACTION,
            default_estimated_minutes: DEFAULT_ESTIMATED_MINUTES,
            default_familiarity: DEFAULT_FAMILIARITY,
            default_module_title: DEFAULT_MODULE_TITLE.to_string(),
        }
    }
}

impl PlannerConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = parse_f64(&lookup, "PLANNER_DEEP_STUDY_BUFFER") {
            if val > 0.0 {
                config.deep_study_buffer = val;
            }
        }
        if let Some(val) = parse_f64(&lookup, "PLANNER_TARGET_VALUE_THRESHOLD") {
            config.target_value_threshold = val;
        }
        if let Some(val) = parse_f64(&lookup, "PLANNER_FALLBACK_TARGET_FRACTION") {
            if val > 0.0 && val <= 1.0 {
                config.fallback_target_fraction = val;
            }
        }
        if let Some(val) = parse_f64(&lookup, "PLANNER_DEFAULT_MINUTES") {
            if val > 0.0 {
                config.default_estimated_minutes = val;
            }
        }
        if let Some(val) = parse_f64(&lookup, "PLANNER_DEFAULT_FAMILIARITY") {
            if (0.0..=1.0).contains(&val) {
                config.default_familiarity = val;
            }
        }

        config
    }
}

fn parse_f64<F>(lookup: &F, key: &str) -> Option<f64>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}
