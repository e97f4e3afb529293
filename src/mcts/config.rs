//! Search configuration parameters.

use serde::{Deserialize, Serialize};

/// Budgets and constants shared by the search strategies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Random playouts per candidate action in flat Monte Carlo.
    pub rollouts_per_action: u32,

    /// Visits a rollout leaf collects before it is expanded (UCB1 tree).
    pub expansion_threshold: u32,

    /// Iterations per decision for the UCB1 tree search.
    pub pure_iterations: u32,

    /// Factor under the UCB1 square root: `sqrt(c * ln(T) / n)`.
    pub ucb_exploration: f64,

    /// Iterations per decision for the predictor-guided tree search.
    pub guided_iterations: u32,

    /// PUCT exploration weight.
    pub c_puct: f64,

    /// Optional wall-clock limit per decision, in milliseconds.
    /// The iteration budget still applies.
    pub time_limit_ms: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            rollouts_per_action: 10,
            expansion_threshold: 10,
            pure_iterations: 100,
            ucb_exploration: 2.0,
            guided_iterations: 50,
            c_puct: 1.0,
            time_limit_ms: None,
        }
    }
}

impl SearchConfig {
    /// Set rollouts per action for flat Monte Carlo.
    pub fn with_rollouts_per_action(mut self, rollouts: u32) -> Self {
        self.rollouts_per_action = rollouts;
        self
    }

    /// Set the expansion threshold of the UCB1 tree search.
    pub fn with_expansion_threshold(mut self, threshold: u32) -> Self {
        self.expansion_threshold = threshold;
        self
    }

    /// Set iterations for the UCB1 tree search.
    pub fn with_pure_iterations(mut self, iterations: u32) -> Self {
        self.pure_iterations = iterations;
        self
    }

    /// Set iterations for the guided tree search.
    pub fn with_guided_iterations(mut self, iterations: u32) -> Self {
        self.guided_iterations = iterations;
        self
    }

    /// Set the PUCT exploration weight.
    pub fn with_c_puct(mut self, c: f64) -> Self {
        self.c_puct = c;
        self
    }

    /// Set a wall-clock limit per decision.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_pattern() {
        let config = SearchConfig::default()
            .with_rollouts_per_action(20)
            .with_expansion_threshold(5)
            .with_pure_iterations(300)
            .with_guided_iterations(400)
            .with_c_puct(1.5)
            .with_time_limit_ms(250);

        assert_eq!(config.rollouts_per_action, 20);
        assert_eq!(config.expansion_threshold, 5);
        assert_eq!(config.pure_iterations, 300);
        assert_eq!(config.guided_iterations, 400);
        assert_eq!(config.c_puct, 1.5);
        assert_eq!(config.time_limit_ms, Some(250));
    }

    #[test]
    fn test_serialization() {
        let config = SearchConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
