//! Agent configuration.
//!
//! `AgentConfig` is the single structure holding every tunable of the
//! system: search budgets, self-play, match play, and the training cycle.
//! Each component receives the section it needs.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mcts::SearchConfig;
use crate::training::{ArenaConfig, CycleConfig, SelfPlayConfig};

/// Top-level configuration.
///
/// ```
/// use zero_ttt::core::AgentConfig;
///
/// let config = AgentConfig::default();
/// assert_eq!(config.search.guided_iterations, 50);
/// assert_eq!(config.self_play.game_count, 500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Budgets and constants for every search strategy.
    pub search: SearchConfig,

    /// Self-play data generation.
    pub self_play: SelfPlayConfig,

    /// Match play: promotion testing and reference evaluation.
    pub arena: ArenaConfig,

    /// Outer training loop.
    pub cycle: CycleConfig,
}

impl AgentConfig {
    /// Create the reference configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the search section.
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Replace the self-play section.
    pub fn with_self_play(mut self, self_play: SelfPlayConfig) -> Self {
        self.self_play = self_play;
        self
    }

    /// Replace the arena section.
    pub fn with_arena(mut self, arena: ArenaConfig) -> Self {
        self.arena = arena;
        self
    }

    /// Replace the cycle section.
    pub fn with_cycle(mut self, cycle: CycleConfig) -> Self {
        self.cycle = cycle;
        self
    }

    /// Check every section for values the components cannot run with.
    pub fn validate(&self) -> Result<()> {
        let search = &self.search;
        require(search.rollouts_per_action > 0, "rollouts_per_action must be positive")?;
        require(search.expansion_threshold > 0, "expansion_threshold must be positive")?;
        require(search.pure_iterations > 0, "pure_iterations must be positive")?;
        require(search.guided_iterations > 0, "guided_iterations must be positive")?;
        require(
            search.c_puct.is_finite() && search.c_puct >= 0.0,
            "c_puct must be finite and non-negative",
        )?;
        require(
            search.ucb_exploration.is_finite() && search.ucb_exploration >= 0.0,
            "ucb_exploration must be finite and non-negative",
        )?;

        require(self.self_play.game_count > 0, "self_play.game_count must be positive")?;
        require(
            valid_temperature(self.self_play.temperature),
            "self_play.temperature must be finite and non-negative",
        )?;

        let arena = &self.arena;
        require(arena.promotion_games > 0, "arena.promotion_games must be positive")?;
        require(arena.reference_games > 0, "arena.reference_games must be positive")?;
        require(
            valid_temperature(arena.promotion_temperature),
            "arena.promotion_temperature must be finite and non-negative",
        )?;
        require(
            valid_temperature(arena.reference_temperature),
            "arena.reference_temperature must be finite and non-negative",
        )?;
        require(
            (0.0..=1.0).contains(&arena.promotion_threshold),
            "arena.promotion_threshold must lie in [0, 1]",
        )?;

        require(self.self_play.workers > 0, "self_play.workers must be positive")?;
        require(arena.workers > 0, "arena.workers must be positive")?;

        Ok(())
    }
}

fn valid_temperature(t: f64) -> bool {
    t.is_finite() && t >= 0.0
}

fn require(condition: bool, message: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::InvalidConfig {
            message: message.to_string(),
        })
    }
}
