use std::collections::HashMap;

use super::config::PlannerConfig;
use super::graph::CourseGraph;
use super::types::{LessonNode, MasteryStatus, UserNodeState};

/// Learner state resolved for one graph node, plus the cost derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HydratedNode {
    pub mastery_status: MasteryStatus,
    pub familiarity_score: f64,
    pub effective_cost: f64,
}

/// Read-only overlay of learner state on a [`CourseGraph`], indexed like the graph.
#[derive(Debug, Clone)]
pub struct HydratedGraph<'g> {
    graph: &'g CourseGraph,
    nodes: Vec<HydratedNode>,
}

pub fn hydrate<'g>(
    graph: &'g CourseGraph,
    states: &[UserNodeState],
    config: &PlannerConfig,
) -> HydratedGraph<'g> {
    let by_node: HashMap<&str, &UserNodeState> = states
        .iter()
        .map(|state| (state.node_id.as_str(), state))
        .collect();

    let nodes = graph
        .indices()
        .map(|idx| {
            let lesson = graph.lesson(idx);
            let state = by_node.get(lesson.id.as_str()).copied();
            hydrate_node(lesson, state, config)
        })
        .collect();

    HydratedGraph { graph, nodes }
}

fn hydrate_node(
    lesson: &LessonNode,
    state: Option<&UserNodeState>,
    config: &PlannerConfig,
) -> HydratedNode {
    let mastery_status = state.map(|s| s.mastery_status).unwrap_or_default();
    let familiarity_score = state
        .and_then(|s| s.familiarity_score)
        .filter(|score| score.is_finite())
        .map(|score| score.clamp(0.0, 1.0))
        .unwrap_or(config.default_familiarity);

    let minutes = lesson.minutes_or(config.default_estimated_minutes);
    let effective_cost = (minutes * (1.0 - familiarity_score)).max(0.0);

    HydratedNode {
        mastery_status,
        familiarity_score,
        effective_cost,
    }
}

impl<'g> HydratedGraph<'g> {
    pub fn graph(&self) -> &'g CourseGraph {
        self.graph
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn lesson(&self, idx: usize) -> &'g LessonNode {
        self.graph.lesson(idx)
    }

    pub fn parents(&self, idx: usize) -> &'g [usize] {
        self.graph.parents(idx)
    }

    pub fn status(&self, idx: usize) -> MasteryStatus {
        self.nodes[idx].mastery_status
    }

    pub fn is_mastered(&self, idx: usize) -> bool {
        self.nodes[idx].mastery_status.is_mastered()
    }

    pub fn effective_cost(&self, idx: usize) -> f64 {
        self.nodes[idx].effective_cost
    }

    pub fn exam_value(&self, idx: usize) -> f64 {
        self.graph.lesson(idx).exam_value()
    }

    /// Non-mastered node indices in input order.
    pub fn pending_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.nodes.len()).filter(move |&idx| !self.is_mastered(idx))
    }

    /// Sum of effective cost over every non-mastered node.
    pub fn remaining_cost(&self) -> f64 {
        self.pending_indices().map(|idx| self.effective_cost(idx)).sum()
    }
}
