#![allow(dead_code)]

use studyplan_backend::planner::{
    CourseBudget, CourseSnapshot, DependencyEdge, LessonNode, MasteryStatus, StudyPlan,
    UserNodeState,
};

/// A -> B, B -> C, B -> D, 30 minutes each.
pub fn diamond_nodes(values: [f64; 4]) -> Vec<LessonNode> {
    ["A", "B", "C", "D"]
        .iter()
        .zip(values)
        .map(|(id, value)| {
            LessonNode::new(*id, format!("Lesson {id}"))
                .with_module(format!("Module {id}"))
                .with_minutes(30.0)
                .with_exam_value(value)
        })
        .collect()
}

pub fn diamond_edges() -> Vec<DependencyEdge> {
    vec![
        DependencyEdge::new("A", "B"),
        DependencyEdge::new("B", "C"),
        DependencyEdge::new("B", "D"),
    ]
}

pub fn diamond_snapshot(values: [f64; 4], hours: f64) -> CourseSnapshot {
    let nodes = diamond_nodes(values);
    let user_state = nodes
        .iter()
        .map(|node| UserNodeState::new(&node.id, MasteryStatus::Pending).with_familiarity(0.1))
        .collect();

    CourseSnapshot {
        nodes,
        edges: diamond_edges(),
        user_state,
        budget: Some(CourseBudget::seconds(hours * 3600.0)),
    }
}

pub fn position(plan: &StudyPlan, id: &str) -> usize {
    plan.lesson_ids()
        .iter()
        .position(|lesson| *lesson == id)
        .unwrap_or_else(|| panic!("lesson {id} missing from plan"))
}
