//! Uniformly random baseline.

use super::{ensure_playable, Strategy};
use crate::core::{Action, GameRng, GameState};
use crate::error::{Error, Result};

/// Picks a legal action uniformly at random.
#[derive(Clone, Debug)]
pub struct RandomStrategy {
    rng: GameRng,
}

impl RandomStrategy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }
}

impl Strategy for RandomStrategy {
    fn select_action(&mut self, state: &GameState) -> Result<Action> {
        ensure_playable(state)?;
        let actions = state.legal_actions();
        self.rng
            .choose(&actions)
            .copied()
            .ok_or(Error::TerminalState)
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_is_legal_and_reproducible() {
        let state = GameState::from_cells("XO- -X- --O").unwrap();
        let mut a = RandomStrategy::new(17);
        let mut b = RandomStrategy::new(17);
        for _ in 0..20 {
            let action = a.select_action(&state).unwrap();
            assert!(state.is_legal(action));
            assert_eq!(action, b.select_action(&state).unwrap());
        }
    }

    #[test]
    fn test_random_rejects_finished_game() {
        let state = GameState::from_cells("XXX OO- ---").unwrap();
        assert!(matches!(
            RandomStrategy::new(0).select_action(&state),
            Err(Error::TerminalState)
        ));
    }
}
