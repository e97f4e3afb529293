//! Tree-search strategies and visit-count distributions.
//!
//! `PureMcts` plays the most-visited root child of a UCB1 rollout search.
//! `GuidedMcts` turns the root visit counts of a PUCT search into a
//! distribution and plays from it: argmax at temperature 0, a sample
//! otherwise. Self-play records that same distribution as the policy target.

use std::time::Duration;

use super::{ensure_playable, Strategy};
use crate::core::{Action, ActionList, GameRng, GameState, ACTION_SPACE};
use crate::error::{Error, Result};
use crate::mcts::policy::argmax_first;
use crate::mcts::{
    most_visited, CancelToken, PredictorEvaluator, Puct, RolloutEvaluator, SearchBudget,
    SearchConfig, SearchStats, SearchTree, TreeSearch, Ucb1,
};
use crate::nn::Predictor;

fn search_budget(
    iterations: u32,
    time_limit_ms: Option<u64>,
    cancel: Option<&CancelToken>,
) -> SearchBudget {
    let mut budget = SearchBudget::iterations(iterations);
    if let Some(ms) = time_limit_ms {
        budget = budget.with_time_limit(Duration::from_millis(ms));
    }
    if let Some(token) = cancel {
        budget = budget.with_cancel(token.clone());
    }
    budget
}

// =============================================================================
// Distributions
// =============================================================================

/// All mass on the first maximum count.
#[must_use]
pub fn one_hot_argmax(counts: &[u32]) -> Vec<f64> {
    let mut out = vec![0.0; counts.len()];
    if let Some(best) = argmax_first(counts.iter().map(|&c| c as f64)) {
        out[best] = 1.0;
    }
    out
}

/// Boltzmann transform of visit counts: `count^(1/temperature)`, normalized.
///
/// Counts are scaled by their maximum first so large counts at low
/// temperature cannot overflow. All-zero counts give a uniform distribution.
/// A temperature of 0 (or below) is [`one_hot_argmax`].
#[must_use]
pub fn boltzmann(counts: &[u32], temperature: f64) -> Vec<f64> {
    if temperature <= 0.0 {
        return one_hot_argmax(counts);
    }
    if counts.is_empty() {
        return Vec::new();
    }

    let max = counts.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return vec![1.0 / counts.len() as f64; counts.len()];
    }

    let exponent = 1.0 / temperature;
    let weights: Vec<f64> = counts
        .iter()
        .map(|&c| (c as f64 / max as f64).powf(exponent))
        .collect();
    let total: f64 = weights.iter().sum();
    weights.iter().map(|w| w / total).collect()
}

/// Probability per legal action, in legal-action order.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionDistribution {
    pub actions: ActionList,
    pub probabilities: Vec<f64>,
}

impl ActionDistribution {
    /// Spread over the full 9-cell action space; illegal cells get 0.
    #[must_use]
    pub fn policy_vector(&self) -> [f32; ACTION_SPACE] {
        let mut policy = [0.0f32; ACTION_SPACE];
        for (action, &p) in self.actions.iter().zip(&self.probabilities) {
            policy[action.index()] = p as f32;
        }
        policy
    }

    /// Action with the highest probability (first on ties).
    #[must_use]
    pub fn argmax(&self) -> Option<Action> {
        argmax_first(self.probabilities.iter().copied()).map(|i| self.actions[i])
    }

    /// Draw an action.
    pub fn sample(&self, rng: &mut GameRng) -> Option<Action> {
        rng.choose_weighted(&self.probabilities)
            .map(|i| self.actions[i])
    }
}

// =============================================================================
// UCB1 + rollouts
// =============================================================================

/// UCB1 tree search valued by random playouts; plays the most-visited child.
#[derive(Clone, Debug)]
pub struct PureMcts {
    iterations: u32,
    exploration: f64,
    expansion_threshold: u32,
    time_limit_ms: Option<u64>,
    rng: GameRng,
    cancel: Option<CancelToken>,
    stats: SearchStats,
}

impl PureMcts {
    pub fn new(config: &SearchConfig, seed: u64) -> Self {
        Self {
            iterations: config.pure_iterations,
            exploration: config.ucb_exploration,
            expansion_threshold: config.expansion_threshold,
            time_limit_ms: config.time_limit_ms,
            rng: GameRng::new(seed),
            cancel: None,
            stats: SearchStats::default(),
        }
    }

    /// Stop searches early once `token` is cancelled.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Run one search from `state`. The tree is the caller's to drop.
    pub fn search(&mut self, state: &GameState) -> Result<SearchTree> {
        let evaluator = RolloutEvaluator::new(self.rng.fork().seed(), self.expansion_threshold);
        let mut search = TreeSearch::new(
            Ucb1 {
                exploration: self.exploration,
            },
            evaluator,
        );
        let budget = search_budget(self.iterations, self.time_limit_ms, self.cancel.as_ref());
        let tree = search.search(state, &budget)?;
        self.stats = search.stats().clone();
        Ok(tree)
    }

    /// Statistics of the most recent search.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }
}

impl Strategy for PureMcts {
    fn select_action(&mut self, state: &GameState) -> Result<Action> {
        ensure_playable(state)?;
        let tree = self.search(state)?;
        most_visited(&tree).ok_or(Error::TerminalState)
    }

    fn name(&self) -> &str {
        "pure-mcts"
    }
}

// =============================================================================
// PUCT + predictor
// =============================================================================

/// PUCT tree search guided by a [`Predictor`].
pub struct GuidedMcts<P> {
    predictor: P,
    iterations: u32,
    c_puct: f64,
    time_limit_ms: Option<u64>,
    temperature: f64,
    rng: GameRng,
    cancel: Option<CancelToken>,
    stats: SearchStats,
}

impl<P: Predictor> GuidedMcts<P> {
    /// Create a guided search playing at `temperature` (0 = deterministic).
    pub fn new(predictor: P, config: &SearchConfig, temperature: f64, seed: u64) -> Self {
        Self {
            predictor,
            iterations: config.guided_iterations,
            c_puct: config.c_puct,
            time_limit_ms: config.time_limit_ms,
            temperature,
            rng: GameRng::new(seed),
            cancel: None,
            stats: SearchStats::default(),
        }
    }

    /// Stop searches early once `token` is cancelled.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Statistics of the most recent search.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Root visit count per legal action after one search.
    pub fn visit_counts(&mut self, state: &GameState) -> Result<Vec<(Action, u32)>> {
        let mut search = TreeSearch::new(
            Puct {
                c_puct: self.c_puct,
            },
            PredictorEvaluator::new(&self.predictor),
        );
        let budget = search_budget(self.iterations, self.time_limit_ms, self.cancel.as_ref());
        let tree = search.search(state, &budget)?;
        self.stats = search.stats().clone();
        Ok(tree.root_visits())
    }

    /// Search and convert the root visit counts at this strategy's
    /// temperature.
    pub fn action_distribution(&mut self, state: &GameState) -> Result<ActionDistribution> {
        ensure_playable(state)?;
        let visits = self.visit_counts(state)?;
        let counts: Vec<u32> = visits.iter().map(|&(_, n)| n).collect();

        Ok(ActionDistribution {
            actions: visits.iter().map(|&(a, _)| a).collect(),
            probabilities: boltzmann(&counts, self.temperature),
        })
    }

    /// [`Self::action_distribution`] over the full action space.
    pub fn policy_vector(&mut self, state: &GameState) -> Result<[f32; ACTION_SPACE]> {
        self.action_distribution(state).map(|d| d.policy_vector())
    }

    /// Pick from an already computed distribution.
    pub fn choose(&mut self, distribution: &ActionDistribution) -> Result<Action> {
        let action = if self.temperature <= 0.0 {
            distribution.argmax()
        } else {
            distribution.sample(&mut self.rng)
        };
        action.ok_or(Error::TerminalState)
    }
}

impl<P: Predictor> Strategy for GuidedMcts<P> {
    fn select_action(&mut self, state: &GameState) -> Result<Action> {
        let distribution = self.action_distribution(state)?;
        self.choose(&distribution)
    }

    fn name(&self) -> &str {
        "guided-mcts"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nn::UniformPredictor;

    #[test]
    fn test_boltzmann_temperature_one_is_proportional() {
        let p = boltzmann(&[1, 3, 0], 1.0);
        assert!((p[0] - 0.25).abs() < 1e-12);
        assert!((p[1] - 0.75).abs() < 1e-12);
        assert_eq!(p[2], 0.0);
    }

    #[test]
    fn test_boltzmann_low_temperature_is_stable() {
        let p = boltzmann(&[1000, 999, 2], 0.01);
        assert!(p.iter().all(|x| x.is_finite()));
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(p[0] > p[1]);
    }

    #[test]
    fn test_boltzmann_edge_cases() {
        assert_eq!(boltzmann(&[0, 0, 0, 0], 1.0), vec![0.25; 4]);
        assert_eq!(boltzmann(&[2, 5, 5], 0.0), vec![0.0, 1.0, 0.0]);
        assert!(boltzmann(&[], 1.0).is_empty());
    }

    #[test]
    fn test_one_hot_first_maximum() {
        assert_eq!(one_hot_argmax(&[3, 7, 7, 1]), vec![0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_policy_vector_places_legal_cells() {
        let state = GameState::new().next(Action::CENTER).unwrap();
        let actions = state.legal_actions();
        let mut probabilities = vec![0.0; 8];
        probabilities[4] = 1.0; // fifth legal cell is 5
        let distribution = ActionDistribution {
            actions,
            probabilities,
        };

        let policy = distribution.policy_vector();
        assert_eq!(policy[5], 1.0);
        assert_eq!(policy[Action::CENTER.index()], 0.0);
        assert_eq!(distribution.argmax(), Action::new(5).ok());
    }

    #[test]
    fn test_pure_mcts_plays_legal_moves() {
        let mut mcts = PureMcts::new(&SearchConfig::default(), 13);
        let state = GameState::from_cells("XO- -X- --O").unwrap();
        let action = mcts.select_action(&state).unwrap();
        assert!(state.is_legal(action));
        assert_eq!(mcts.stats().iterations, 100);
    }

    #[test]
    fn test_guided_uniform_visits_every_child_first() {
        let config = SearchConfig::default().with_guided_iterations(9);
        let mut mcts = GuidedMcts::new(UniformPredictor, &config, 1.0, 0);
        let visits = mcts.visit_counts(&GameState::new()).unwrap();
        assert!(visits.iter().all(|&(_, n)| n == 1));
    }

    #[test]
    fn test_guided_temperature_zero_is_one_hot() {
        let config = SearchConfig::default();
        let mut mcts = GuidedMcts::new(UniformPredictor, &config, 0.0, 0);
        let state = GameState::from_cells("XX- -O- ---").unwrap();
        let distribution = mcts.action_distribution(&state).unwrap();

        assert_eq!(distribution.probabilities.iter().filter(|&&p| p == 1.0).count(), 1);
        assert_eq!(distribution.probabilities.iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn test_cancelled_guided_search_is_uniform() {
        let token = CancelToken::new();
        token.cancel();
        let mut mcts = GuidedMcts::new(UniformPredictor, &SearchConfig::default(), 1.0, 0)
            .with_cancel(token);
        let distribution = mcts.action_distribution(&GameState::new()).unwrap();
        assert_eq!(distribution.probabilities, vec![1.0 / 9.0; 9]);
    }

    #[test]
    fn test_guided_rejects_finished_game() {
        let state = GameState::from_cells("XXX OO- ---").unwrap();
        let mut mcts = GuidedMcts::new(UniformPredictor, &SearchConfig::default(), 1.0, 0);
        assert!(matches!(
            mcts.select_action(&state),
            Err(Error::TerminalState)
        ));
    }
}
