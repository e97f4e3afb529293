//! Search policies for selection, simulation, and leaf evaluation.
//!
//! Policies are trait-based so the two tree searches share one loop:
//! - `SelectionPolicy`: which child to descend into (UCB1, PUCT)
//! - `LeafEvaluator`: how to value an unexpanded leaf and when to expand it
//!   (random rollouts, predictor calls)
//!
//! All values are from the point of view of the player to move at the node
//! being valued. A parent always reads a child's value negated.

use crate::core::{GameRng, GameState};
use crate::error::{Error, Result};
use crate::nn::{normalize_policy, uniform_priors, Predictor};

use super::node::NodeId;
use super::tree::SearchTree;

/// Index of the first maximum. Later equal scores never replace it.
pub(crate) fn argmax_first<I: IntoIterator<Item = f64>>(scores: I) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, score) in scores.into_iter().enumerate() {
        match best {
            Some((_, b)) if score <= b || score.is_nan() => {}
            _ if score.is_nan() => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for selecting which child node to explore.
pub trait SelectionPolicy: Send + Sync {
    /// Select a child of the expanded node `parent`.
    fn select(&self, tree: &SearchTree, parent: NodeId) -> NodeId;
}

/// UCB1 selection with exploration-first.
///
/// Any unvisited child is taken immediately (first in child order).
/// Otherwise: `-w/n + sqrt(c * ln(T) / n)` where `T` sums sibling visits.
#[derive(Clone, Debug)]
pub struct Ucb1 {
    /// Factor under the square root (2 for classic UCB1).
    pub exploration: f64,
}

impl Default for Ucb1 {
    fn default() -> Self {
        Self { exploration: 2.0 }
    }
}

impl SelectionPolicy for Ucb1 {
    fn select(&self, tree: &SearchTree, parent: NodeId) -> NodeId {
        let children = &tree.get(parent).children;

        let mut total = 0u32;
        for &child in children {
            let n = tree.get(child).n;
            if n == 0 {
                return child;
            }
            total += n;
        }

        let ln_total = (total as f64).ln();
        let best = argmax_first(children.iter().map(|&c| {
            let node = tree.get(c);
            let n = node.n as f64;
            -node.w / n + (self.exploration * ln_total / n).sqrt()
        }));

        children[best.unwrap_or(0)]
    }
}

/// PUCT selection.
///
/// `Q + c_puct * prior * sqrt(T) / (1 + n)` with `Q = -w/n` (0 when
/// unvisited) and `T` the sum of sibling visits.
#[derive(Clone, Debug)]
pub struct Puct {
    /// Exploration weight.
    pub c_puct: f64,
}

impl Default for Puct {
    fn default() -> Self {
        Self { c_puct: 1.0 }
    }
}

impl SelectionPolicy for Puct {
    fn select(&self, tree: &SearchTree, parent: NodeId) -> NodeId {
        let children = &tree.get(parent).children;
        let total: u32 = children.iter().map(|&c| tree.get(c).n).sum();
        let sqrt_total = (total as f64).sqrt();

        let best = argmax_first(children.iter().map(|&c| {
            let node = tree.get(c);
            let q = -node.mean_value();
            let u = self.c_puct * node.prior as f64 * sqrt_total / (1.0 + node.n as f64);
            q + u
        }));

        children[best.unwrap_or(0)]
    }
}

// =============================================================================
// Simulation
// =============================================================================

/// Uniformly random playout to the end of the game.
///
/// Returns -1/0/+1 from the point of view of the player to move in `state`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomRollout;

impl RandomRollout {
    /// Play random legal moves until the game ends.
    pub fn run(&self, state: &GameState, rng: &mut GameRng) -> Result<f64> {
        let mut current = *state;
        // +1 while the player to move in `current` is the one at `state`.
        let mut sign = 1.0;

        loop {
            if let Some(value) = current.terminal_value() {
                return Ok(sign * value);
            }
            let actions = current.legal_actions();
            let Some(&action) = rng.choose(&actions) else {
                return Err(Error::TerminalState);
            };
            current = current.next(action)?;
            sign = -sign;
        }
    }
}

// =============================================================================
// Leaf Evaluation
// =============================================================================

/// Result of valuing an unexpanded leaf.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafEvaluation {
    /// Value for the player to move at the leaf.
    pub value: f64,

    /// Priors to expand the leaf with, once its statistics include this visit.
    pub expand_with: Option<Vec<f32>>,
}

/// Values leaves that have no children yet.
pub trait LeafEvaluator {
    /// Priors used to expand the root before the iteration budget starts.
    fn root_priors(&mut self, state: &GameState) -> Result<Vec<f32>>;

    /// Value a non-terminal leaf that has been visited `visits` times so far.
    fn evaluate(&mut self, state: &GameState, visits: u32) -> Result<LeafEvaluation>;
}

/// One random playout per visit; expand after `expansion_threshold` visits.
#[derive(Clone, Debug)]
pub struct RolloutEvaluator {
    rng: GameRng,
    expansion_threshold: u32,
}

impl RolloutEvaluator {
    /// Create an evaluator with its own RNG.
    pub fn new(seed: u64, expansion_threshold: u32) -> Self {
        Self {
            rng: GameRng::new(seed),
            expansion_threshold,
        }
    }
}

impl LeafEvaluator for RolloutEvaluator {
    fn root_priors(&mut self, state: &GameState) -> Result<Vec<f32>> {
        Ok(uniform_priors(state.legal_actions().len()))
    }

    fn evaluate(&mut self, state: &GameState, visits: u32) -> Result<LeafEvaluation> {
        let value = RandomRollout.run(state, &mut self.rng)?;
        let expand_with = (visits + 1 >= self.expansion_threshold)
            .then(|| uniform_priors(state.legal_actions().len()));

        Ok(LeafEvaluation { value, expand_with })
    }
}

/// One predictor call per leaf; the leaf is expanded immediately.
pub struct PredictorEvaluator<'a, P: Predictor + ?Sized> {
    predictor: &'a P,
}

impl<'a, P: Predictor + ?Sized> PredictorEvaluator<'a, P> {
    /// Create an evaluator backed by `predictor`.
    pub fn new(predictor: &'a P) -> Self {
        Self { predictor }
    }

    fn priors_and_value(&self, state: &GameState) -> Result<(Vec<f32>, f64)> {
        let prediction = self.predictor.predict(state)?;
        let legal = state.legal_actions().len();

        if prediction.policy.len() != legal {
            return Err(Error::Predictor {
                message: format!(
                    "policy has {} entries for {legal} legal actions",
                    prediction.policy.len()
                ),
            });
        }
        if !prediction.value.is_finite() {
            return Err(Error::Predictor {
                message: format!("value {} is not finite", prediction.value),
            });
        }

        let value = f64::from(prediction.value).clamp(-1.0, 1.0);
        Ok((normalize_policy(&prediction.policy), value))
    }
}

impl<P: Predictor + ?Sized> LeafEvaluator for PredictorEvaluator<'_, P> {
    fn root_priors(&mut self, state: &GameState) -> Result<Vec<f32>> {
        self.priors_and_value(state).map(|(priors, _)| priors)
    }

    fn evaluate(&mut self, state: &GameState, _visits: u32) -> Result<LeafEvaluation> {
        let (priors, value) = self.priors_and_value(state)?;
        Ok(LeafEvaluation {
            value,
            expand_with: Some(priors),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Action;
    use crate::nn::Prediction;

    fn expanded_root(state: GameState) -> SearchTree {
        let mut tree = SearchTree::new(state);
        let n = state.legal_actions().len();
        tree.expand(tree.root(), &uniform_priors(n)).unwrap();
        tree
    }

    fn set_stats(tree: &mut SearchTree, child_index: usize, w: f64, n: u32) {
        let id = tree.root_node().children[child_index];
        let node = tree.get_mut(id);
        node.w = w;
        node.n = n;
    }

    #[test]
    fn test_argmax_first_keeps_earliest_tie() {
        assert_eq!(argmax_first([1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(argmax_first([f64::NAN, 0.0]), Some(1));
        assert_eq!(argmax_first(std::iter::empty()), None);
        assert_eq!(argmax_first([-1.0, -1.0]), Some(0));
    }

    #[test]
    fn test_ucb1_selects_first_unvisited() {
        let mut tree = expanded_root(GameState::new());
        set_stats(&mut tree, 0, 5.0, 10);
        set_stats(&mut tree, 1, -5.0, 10);
        // Children 2.. unvisited: child 2 must win regardless of values.
        let selected = Ucb1::default().select(&tree, tree.root());
        assert_eq!(selected, tree.root_node().children[2]);
    }

    #[test]
    fn test_ucb1_negates_child_value() {
        let state = GameState::from_cells("XOX OXO ---").unwrap();
        let mut tree = expanded_root(state);
        // Child value is from the opponent's view: -1 there is good for us.
        set_stats(&mut tree, 0, 10.0, 10);
        set_stats(&mut tree, 1, -10.0, 10);
        set_stats(&mut tree, 2, 0.0, 10);

        let selected = Ucb1::default().select(&tree, tree.root());
        assert_eq!(selected, tree.root_node().children[1]);
    }

    #[test]
    fn test_ucb1_single_visit_each() {
        let state = GameState::from_cells("XOX OXO ---").unwrap();
        let mut tree = expanded_root(state);
        for i in 0..3 {
            set_stats(&mut tree, i, 0.0, 1);
        }
        // Equal scores: the first child wins the tie.
        let selected = Ucb1::default().select(&tree, tree.root());
        assert_eq!(selected, tree.root_node().children[0]);
    }

    #[test]
    fn test_puct_prefers_prior_when_unvisited() {
        let state = GameState::from_cells("XOX OXO ---").unwrap();
        let mut tree = expanded_root(state);
        let root = tree.root();
        let ids = tree.root_node().children.clone();
        tree.get_mut(ids[0]).prior = 0.1;
        tree.get_mut(ids[1]).prior = 0.7;
        tree.get_mut(ids[2]).prior = 0.2;
        set_stats(&mut tree, 0, 0.0, 1);

        let selected = Puct::default().select(&tree, root);
        assert_eq!(selected, ids[1]);
    }

    #[test]
    fn test_puct_all_zero_picks_first() {
        let tree = expanded_root(GameState::new());
        let selected = Puct::default().select(&tree, tree.root());
        assert_eq!(selected, tree.root_node().children[0]);
    }

    #[test]
    fn test_puct_formula() {
        let state = GameState::from_cells("XOX OXO ---").unwrap();
        let mut tree = expanded_root(state);
        let ids = tree.root_node().children.clone();
        for &id in &ids {
            tree.get_mut(id).prior = 1.0 / 3.0;
        }
        // T = 9. child0: Q = 0.5, u = 1/3 * 3 / 5 = 0.2 -> 0.7
        // child1: Q = -1, u = 1/3 * 3 / 2 = 0.5 -> -0.5
        // child2: Q = 0, u = 1/3 * 3 / 4 = 0.25 -> 0.25
        set_stats(&mut tree, 0, -2.0, 4);
        set_stats(&mut tree, 1, 1.0, 1);
        set_stats(&mut tree, 2, 0.0, 3);

        let selected = Puct::default().select(&tree, tree.root());
        assert_eq!(selected, ids[0]);
    }

    #[test]
    fn test_rollout_terminal_values() {
        let mut rng = GameRng::new(1);
        let lost = GameState::from_cells("XXX OO- ---").unwrap();
        assert_eq!(RandomRollout.run(&lost, &mut rng).unwrap(), -1.0);

        let drawn = GameState::from_cells("XOX XOO OXX").unwrap();
        assert_eq!(RandomRollout.run(&drawn, &mut rng).unwrap(), 0.0);
    }

    #[test]
    fn test_rollout_forced_win_for_mover() {
        // X to move with a single empty cell completing the top row.
        let state = GameState::from_cells("XX- OOX OXO").unwrap();
        let mut rng = GameRng::new(3);
        assert_eq!(RandomRollout.run(&state, &mut rng).unwrap(), 1.0);
    }

    #[test]
    fn test_rollout_evaluator_expands_at_threshold() {
        let mut eval = RolloutEvaluator::new(5, 3);
        let state = GameState::new();
        assert!(eval.evaluate(&state, 0).unwrap().expand_with.is_none());
        assert!(eval.evaluate(&state, 1).unwrap().expand_with.is_none());
        let third = eval.evaluate(&state, 2).unwrap();
        assert_eq!(third.expand_with, Some(vec![1.0 / 9.0; 9]));
    }

    struct ZeroPolicy;

    impl Predictor for ZeroPolicy {
        fn predict(&self, state: &GameState) -> Result<Prediction> {
            Ok(Prediction {
                policy: vec![0.0; state.legal_actions().len()],
                value: 2.0,
            })
        }
    }

    #[test]
    fn test_predictor_evaluator_zero_policy_falls_back_to_uniform() {
        let predictor = ZeroPolicy;
        let mut eval = PredictorEvaluator::new(&predictor);
        let state = GameState::new().next(Action::CENTER).unwrap();
        let leaf = eval.evaluate(&state, 0).unwrap();

        assert_eq!(leaf.expand_with, Some(vec![0.125; 8]));
        assert_eq!(leaf.value, 1.0); // clamped
    }

    struct ShortPolicy;

    impl Predictor for ShortPolicy {
        fn predict(&self, _state: &GameState) -> Result<Prediction> {
            Ok(Prediction {
                policy: vec![1.0],
                value: 0.0,
            })
        }
    }

    #[test]
    fn test_predictor_evaluator_rejects_length_mismatch() {
        let predictor = ShortPolicy;
        let mut eval = PredictorEvaluator::new(&predictor);
        let err = eval.root_priors(&GameState::new()).unwrap_err();
        assert!(matches!(err, Error::Predictor { .. }));
    }
}
