//! Core tree search loop.
//!
//! One loop serves both tree strategies. Each iteration:
//!
//! 1. walks from the root through expanded nodes using the selection policy,
//! 2. values the leaf it stops at (exact value if terminal, otherwise the
//!    leaf evaluator),
//! 3. merges that value into every node on the path, negating it at each
//!    level, and only then expands the leaf if the evaluator asked for it.
//!
//! The walk is iterative; nothing recurses.

use std::time::Instant;

use smallvec::SmallVec;
use tracing::trace;

use super::budget::SearchBudget;
use super::node::NodeId;
use super::policy::{argmax_first, LeafEvaluator, SelectionPolicy};
use super::stats::SearchStats;
use super::tree::SearchTree;
use crate::core::{Action, GameState, ACTION_SPACE};
use crate::error::{Error, Result};

/// Tree search generic over selection and leaf evaluation.
pub struct TreeSearch<S, L> {
    selection: S,
    evaluator: L,
    stats: SearchStats,
}

impl<S: SelectionPolicy, L: LeafEvaluator> TreeSearch<S, L> {
    /// Create a search from its two policies.
    pub fn new(selection: S, evaluator: L) -> Self {
        Self {
            selection,
            evaluator,
            stats: SearchStats::default(),
        }
    }

    /// Statistics of the most recent search.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Build a fresh tree for `state` and run iterations until the budget
    /// says stop.
    ///
    /// The root is expanded before the first iteration, so after `K`
    /// iterations the root children's visits sum to exactly `K`.
    pub fn search(&mut self, state: &GameState, budget: &SearchBudget) -> Result<SearchTree> {
        if state.is_done() {
            return Err(Error::TerminalState);
        }

        let start = Instant::now();
        self.stats.reset();

        let mut tree = SearchTree::new(*state);
        let priors = self.evaluator.root_priors(state)?;
        tree.expand(tree.root(), &priors)?;
        self.stats.nodes_expanded += 1;

        let mut done = 0;
        while budget.allows(done, start) {
            self.iterate(&mut tree)?;
            done += 1;
        }

        self.stats.iterations = done;
        self.stats.time_us = start.elapsed().as_micros() as u64;

        trace!(
            iterations = self.stats.iterations,
            nodes = tree.len(),
            leaf_evaluations = self.stats.leaf_evaluations,
            terminal_hits = self.stats.terminal_hits,
            time_us = self.stats.time_us,
            "Tree search complete"
        );

        Ok(tree)
    }

    /// Single iteration: select, evaluate, backpropagate, expand.
    fn iterate(&mut self, tree: &mut SearchTree) -> Result<()> {
        let mut path: SmallVec<[NodeId; ACTION_SPACE + 1]> = SmallVec::new();
        let mut current = tree.root();
        path.push(current);

        // === SELECTION ===
        while tree.get(current).is_expanded() {
            current = self.selection.select(tree, current);
            path.push(current);
        }

        // === EVALUATION ===
        let leaf = tree.get(current);
        let state = leaf.state;
        let (value, expand_with) = match state.terminal_value() {
            Some(value) => {
                self.stats.terminal_hits += 1;
                (value, None)
            }
            None => {
                let evaluation = self.evaluator.evaluate(&state, leaf.n)?;
                self.stats.leaf_evaluations += 1;
                (evaluation.value, evaluation.expand_with)
            }
        };

        // === BACKPROPAGATION ===
        let mut value = value;
        for &id in path.iter().rev() {
            tree.get_mut(id).merge(value);
            value = -value;
        }

        // === EXPANSION ===
        if let Some(priors) = expand_with {
            tree.expand(current, &priors)?;
            self.stats.nodes_expanded += 1;
        }

        Ok(())
    }
}

/// Root child with the most visits, first in legal order on ties.
///
/// With no visits at all this is the first legal action.
#[must_use]
pub fn most_visited(tree: &SearchTree) -> Option<Action> {
    let visits = tree.root_visits();
    argmax_first(visits.iter().map(|&(_, n)| n as f64)).map(|i| visits[i].0)
}
