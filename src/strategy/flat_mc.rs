//! Flat Monte Carlo: a fixed number of random playouts per candidate move.

use super::{ensure_playable, Strategy};
use crate::core::{Action, GameRng, GameState};
use crate::error::{Error, Result};
use crate::mcts::policy::argmax_first;
use crate::mcts::RandomRollout;

/// Scores each legal action by the sum of negated playout values from the
/// position it leads to, then plays the best.
#[derive(Clone, Debug)]
pub struct FlatMonteCarlo {
    rollouts_per_action: u32,
    rng: GameRng,
}

impl FlatMonteCarlo {
    pub fn new(rollouts_per_action: u32, seed: u64) -> Self {
        Self {
            rollouts_per_action,
            rng: GameRng::new(seed),
        }
    }

    /// Aggregate playout value of every legal action, from the point of view
    /// of the player to move, in legal-action order.
    pub fn action_values(&mut self, state: &GameState) -> Result<Vec<(Action, f64)>> {
        ensure_playable(state)?;

        let mut values = Vec::with_capacity(state.legal_actions().len());
        for action in state.legal_actions() {
            let child = state.next(action)?;
            let mut total = 0.0;
            for _ in 0..self.rollouts_per_action {
                total -= RandomRollout.run(&child, &mut self.rng)?;
            }
            values.push((action, total));
        }

        Ok(values)
    }
}

impl Strategy for FlatMonteCarlo {
    fn select_action(&mut self, state: &GameState) -> Result<Action> {
        let values = self.action_values(state)?;
        argmax_first(values.iter().map(|&(_, v)| v))
            .map(|i| values[i].0)
            .ok_or(Error::TerminalState)
    }

    fn name(&self) -> &str {
        "flat-monte-carlo"
    }
}
