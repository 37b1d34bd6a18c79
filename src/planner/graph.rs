use std::collections::{HashMap, HashSet};

use super::types::{DependencyEdge, LessonNode};

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub lesson: LessonNode,
    pub parents: Vec<usize>,
    pub children: Vec<usize>,
}

/// Prerequisite graph stored as an arena in node input order.
///
/// Adjacency lists hold arena indices. Edges whose endpoints are unknown are
/// dropped and repeated edges collapse; both are only counted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseGraph {
    nodes: Vec<GraphNode>,
    index: HashMap<String, usize>,
    dropped_edges: usize,
    duplicate_edges: usize,
}

impl CourseGraph {
    pub fn build(nodes: &[LessonNode], edges: &[DependencyEdge]) -> Self {
        let mut graph = Self::default();

        for lesson in nodes {
            match graph.index.get(&lesson.id) {
                Some(&idx) => graph.nodes[idx].lesson = lesson.clone(),
                None => {
                    graph.index.insert(lesson.id.clone(), graph.nodes.len());
                    graph.nodes.push(GraphNode {
                        lesson: lesson.clone(),
                        parents: Vec::new(),
                        children: Vec::new(),
                    });
                }
            }
        }

        let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(edges.len());
        for edge in edges {
            let (Some(&parent), Some(&child)) = (
                graph.index.get(&edge.parent_id),
                graph.index.get(&edge.child_id),
            ) else {
                graph.dropped_edges += 1;
                continue;
            };

            if !seen.insert((parent, child)) {
                graph.duplicate_edges += 1;
                continue;
            }

            graph.nodes[parent].children.push(child);
            graph.nodes[child].parents.push(parent);
        }

        graph
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn lesson(&self, idx: usize) -> &LessonNode {
        &self.nodes[idx].lesson
    }

    pub fn parents(&self, idx: usize) -> &[usize] {
        &self.nodes[idx].parents
    }

    pub fn indices(&self) -> std::ops::Range<usize> {
        0..self.nodes.len()
    }

    pub fn dropped_edges(&self) -> usize {
        self.dropped_edges
    }

    pub fn duplicate_edges(&self) -> usize {
        self.duplicate_edges
    }
}
