use super::graph::CourseGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    pub order: Vec<usize>,
    /// Back edges met during the walk. Each one left its dependency unenforced.
    pub cycles_detected: usize,
}

/// Parent-first depth-first linearization of `subset`.
///
/// Roots are taken in `subset` order and only parents inside the subset are
/// followed. A parent that is still in progress closes a cycle; that arm is
/// skipped and the walk carries on, so the result is deterministic for any
/// input. Runs on an explicit stack.
pub fn topological_order(graph: &CourseGraph, subset: &[usize]) -> Sequence {
    let mut in_subset = vec![false; graph.len()];
    for &idx in subset {
        in_subset[idx] = true;
    }

    let mut marks = vec![Mark::Unvisited; graph.len()];
    let mut order = Vec::with_capacity(subset.len());
    let mut cycles_detected = 0;
    // (node, next parent position)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for &root in subset {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::InProgress;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let parents = graph.parents(node);

            if frame.1 < parents.len() {
                let parent = parents[frame.1];
                frame.1 += 1;

                if !in_subset[parent] {
                    continue;
                }
                match marks[parent] {
                    Mark::Unvisited => {
                        marks[parent] = Mark::InProgress;
                        stack.push((parent, 0));
                    }
                    Mark::InProgress => cycles_detected += 1,
                    Mark::Done => {}
                }
            } else {
                stack.pop();
                marks[node] = Mark::Done;
                order.push(node);
            }
        }
    }

    Sequence {
        order,
        cycles_detected,
    }
}

/// Ordering over every node of the graph.
pub fn full_order(graph: &CourseGraph) -> Sequence {
    let all: Vec<usize> = graph.indices().collect();
    topological_order(graph, &all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::types::{DependencyEdge, LessonNode};

    fn build(ids: &[&str], edges: &[(&str, &str)]) -> CourseGraph {
        let nodes: Vec<LessonNode> = ids.iter().map(|id| LessonNode::new(*id, *id)).collect();
        let edges: Vec<DependencyEdge> = edges
            .iter()
            .map(|(p, c)| DependencyEdge::new(*p, *c))
            .collect();
        CourseGraph::build(&nodes, &edges)
    }

    fn names(graph: &CourseGraph, seq: &Sequence) -> Vec<String> {
        seq.order
            .iter()
            .map(|&idx| graph.lesson(idx).id.clone())
            .collect()
    }

    #[test]
    fn test_parents_come_first() {
        // children listed before their parents in the input
        let graph = build(&["d", "c", "b", "a"], &[("a", "b"), ("b", "c"), ("b", "d")]);
        let seq = full_order(&graph);
        assert_eq!(names(&graph, &seq), vec!["a", "b", "d", "c"]);
        assert_eq!(seq.cycles_detected, 0);
    }

    #[test]
    fn test_independent_nodes_keep_input_order() {
        let graph = build(&["x", "y", "z"], &[]);
        assert_eq!(names(&graph, &full_order(&graph)), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_cycle_is_tolerated() {
        let graph = build(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let seq = full_order(&graph);

        // a -> parent c -> parent b -> parent a (in progress, skipped)
        assert_eq!(names(&graph, &seq), vec!["b", "c", "a"]);
        assert_eq!(seq.cycles_detected, 1);
    }

    #[test]
    fn test_self_loop_is_tolerated() {
        let graph = build(&["a"], &[("a", "a")]);
        let seq = full_order(&graph);
        assert_eq!(names(&graph, &seq), vec!["a"]);
        assert_eq!(seq.cycles_detected, 1);
    }

    #[test]
    fn test_subset_ignores_outside_parents() {
        let graph = build(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let seq = topological_order(&graph, &[2, 0]);
        assert_eq!(names(&graph, &seq), vec!["c", "a"]);
    }

    #[test]
    fn test_duplicate_roots_emit_once() {
        let graph = build(&["a", "b"], &[("a", "b")]);
        let seq = topological_order(&graph, &[1, 0, 1]);
        assert_eq!(names(&graph, &seq), vec!["a", "b"]);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let ids: Vec<String> = (0..50_000).map(|i| format!("n{i}")).collect();
        let nodes: Vec<LessonNode> = ids.iter().rev().map(|id| LessonNode::new(id, id)).collect();
        let edges: Vec<DependencyEdge> = ids
            .windows(2)
            .map(|pair| DependencyEdge::new(&pair[0], &pair[1]))
            .collect();
        let graph = CourseGraph::build(&nodes, &edges);

        let seq = full_order(&graph);
        assert_eq!(seq.order.len(), 50_000);
        assert_eq!(graph.lesson(seq.order[0]).id, "n0");
        assert_eq!(graph.lesson(seq.order[49_999]).id, "n49999");
    }
}
