//! Exhaustive negamax alpha-beta search.
//!
//! The board is small enough to search every line to the end, so there is no
//! depth cutoff and no evaluation function: scores are exact -1/0/+1 for the
//! player to move.

use super::{ensure_playable, Strategy};
use crate::core::{Action, GameState};
use crate::error::{Error, Result};

const INFINITY: i32 = i32::MAX;

/// Exact game value for the player to move: -1 loss, 0 draw, +1 win.
pub fn alpha_beta_value(state: &GameState) -> Result<i32> {
    negamax(state, -INFINITY, INFINITY)
}

fn negamax(state: &GameState, mut alpha: i32, beta: i32) -> Result<i32> {
    if state.is_lose() {
        return Ok(-1);
    }
    if state.is_draw() {
        return Ok(0);
    }

    for action in state.legal_actions() {
        let score = -negamax(&state.next(action)?, -beta, -alpha)?;
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            return Ok(alpha);
        }
    }

    Ok(alpha)
}

/// Perfect play via [`alpha_beta_value`].
///
/// Keeps the first action whose score strictly beats the best so far.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlphaBetaStrategy;

impl AlphaBetaStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Best action and its exact value.
    pub fn best(&self, state: &GameState) -> Result<(Action, i32)> {
        ensure_playable(state)?;

        let mut best: Option<(Action, i32)> = None;
        for action in state.legal_actions() {
            let alpha = best.map_or(-INFINITY, |(_, score)| score);
            let score = -negamax(&state.next(action)?, -INFINITY, -alpha)?;
            if score > alpha {
                best = Some((action, score));
            }
        }

        best.ok_or(Error::TerminalState)
    }
}

impl Strategy for AlphaBetaStrategy {
    fn select_action(&mut self, state: &GameState) -> Result<Action> {
        self.best(state).map(|(action, _)| action)
    }

    fn name(&self) -> &str {
        "alpha-beta"
    }
}
