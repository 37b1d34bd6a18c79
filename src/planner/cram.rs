//! Budget-constrained chain selection for Cram mode.
//!
//! A chain is a target lesson plus every unmastered prerequisite above it.
//! Chains are bought whole, best return-on-cost first, and each purchase can
//! make overlapping chains cheaper, so every round rescores what is left.

use super::config::PlannerConfig;
use super::hydrate::HydratedGraph;
use super::sequence::{topological_order, Sequence};

#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub target: usize,
    /// Unmastered ancestors followed by the target, without repeats.
    pub members: Vec<usize>,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainScore {
    pub marginal_cost: f64,
    pub roi: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CramSelection {
    /// `selected[idx]` is true when node `idx` was committed by some chain.
    pub selected: Vec<bool>,
    pub targets: usize,
    pub fallback_targets: bool,
    pub chains_committed: usize,
    pub chains_discarded: usize,
    pub remaining_budget: f64,
}

impl CramSelection {
    pub fn selected_indices(&self) -> Vec<usize> {
        self.selected
            .iter()
            .enumerate()
            .filter_map(|(idx, &picked)| picked.then_some(idx))
            .collect()
    }
}

/// Returns the target indices and whether the fallback ranking produced them.
pub fn select_targets(hydrated: &HydratedGraph<'_>, config: &PlannerConfig) -> (Vec<usize>, bool) {
    let pending: Vec<usize> = hydrated.pending_indices().collect();

    let targets: Vec<usize> = pending
        .iter()
        .copied()
        .filter(|&idx| hydrated.exam_value(idx) >= config.target_value_threshold)
        .collect();
    if !targets.is_empty() {
        return (targets, false);
    }

    let mut ranked = pending;
    // stable: equal values keep input order
    ranked.sort_by(|&a, &b| hydrated.exam_value(b).total_cmp(&hydrated.exam_value(a)));
    let take = (ranked.len() as f64 * config.fallback_target_fraction).ceil() as usize;
    ranked.truncate(take.min(ranked.len()));

    (ranked, true)
}

/// Unmastered transitive ancestors of `target`, in depth-first walk order.
///
/// The walk passes through mastered lessons to reach unmastered ones above
/// them, and the visited set keeps it finite on cycles.
pub fn collect_ancestors(hydrated: &HydratedGraph<'_>, target: usize) -> Vec<usize> {
    let mut visited = vec![false; hydrated.len()];
    visited[target] = true;

    let mut ancestors = Vec::new();
    let mut stack: Vec<usize> = hydrated.parents(target).iter().rev().copied().collect();

    while let Some(idx) = stack.pop() {
        if visited[idx] {
            continue;
        }
        visited[idx] = true;

        if !hydrated.is_mastered(idx) {
            ancestors.push(idx);
        }
        stack.extend(
            hydrated
                .parents(idx)
                .iter()
                .rev()
                .copied()
                .filter(|&parent| !visited[parent]),
        );
    }

    ancestors
}

pub fn build_chain(hydrated: &HydratedGraph<'_>, target: usize) -> Chain {
    let mut members = collect_ancestors(hydrated, target);
    if !hydrated.is_mastered(target) {
        members.push(target);
    }

    Chain {
        target,
        members,
        value: hydrated.exam_value(target),
    }
}

pub fn score_chain(hydrated: &HydratedGraph<'_>, chain: &Chain, committed: &[bool]) -> ChainScore {
    let marginal_cost: f64 = chain
        .members
        .iter()
        .filter(|&&idx| !committed[idx])
        .map(|&idx| hydrated.effective_cost(idx))
        .sum();

    let roi = if marginal_cost == 0.0 {
        f64::INFINITY
    } else {
        chain.value / marginal_cost
    };

    ChainScore { marginal_cost, roi }
}

/// Greedy chain purchase within `minutes_available`.
///
/// A chain that does not fit when it comes up is dropped for good.
pub fn select_chains(
    hydrated: &HydratedGraph<'_>,
    minutes_available: f64,
    config: &PlannerConfig,
) -> CramSelection {
    let (targets, fallback_targets) = select_targets(hydrated, config);
    let mut chains: Vec<Chain> = targets
        .iter()
        .map(|&target| build_chain(hydrated, target))
        .filter(|chain| !chain.members.is_empty())
        .collect();

    let mut selection = CramSelection {
        selected: vec![false; hydrated.len()],
        targets: targets.len(),
        fallback_targets,
        remaining_budget: minutes_available,
        ..Default::default()
    };

    while selection.remaining_budget > 0.0 && !chains.is_empty() {
        let mut scored: Vec<(usize, ChainScore)> = chains
            .iter()
            .enumerate()
            .map(|(pos, chain)| (pos, score_chain(hydrated, chain, &selection.selected)))
            .collect();
        scored.sort_by(|a, b| b.1.roi.total_cmp(&a.1.roi));

        let (best_pos, best) = scored[0];
        let chain = chains.remove(best_pos);

        if best.marginal_cost <= selection.remaining_budget {
            for &idx in &chain.members {
                selection.selected[idx] = true;
            }
            selection.remaining_budget -= best.marginal_cost;
            selection.chains_committed += 1;
            tracing::debug!(
                target_id = %hydrated.lesson(chain.target).id,
                marginal_cost = best.marginal_cost,
                remaining_budget = selection.remaining_budget,
                "cram chain committed"
            );
        } else {
            selection.chains_discarded += 1;
            tracing::debug!(
                target_id = %hydrated.lesson(chain.target).id,
                marginal_cost = best.marginal_cost,
                remaining_budget = selection.remaining_budget,
                "cram chain does not fit"
            );
        }
    }

    selection
}

/// Committed lessons plus every mastered lesson, ordered parent-first.
pub fn cram_sequence(hydrated: &HydratedGraph<'_>, selection: &CramSelection) -> Sequence {
    let included: Vec<usize> = (0..hydrated.len())
        .filter(|&idx| selection.selected[idx] || hydrated.is_mastered(idx))
        .collect();
    topological_order(hydrated.graph(), &included)
}
