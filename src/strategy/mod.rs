//! Move-selection strategies.
//!
//! Every strategy picks one legal action for the player to move. Ties are
//! always broken on the first maximum in legal-action order, so recorded
//! games are reproducible from their seeds.

pub mod alpha_beta;
pub mod flat_mc;
pub mod random;
pub mod tree;

pub use alpha_beta::{alpha_beta_value, AlphaBetaStrategy};
pub use flat_mc::FlatMonteCarlo;
pub use random::RandomStrategy;
pub use tree::{boltzmann, one_hot_argmax, ActionDistribution, GuidedMcts, PureMcts};

use crate::core::{Action, GameState};
use crate::error::{Error, Result};

/// Picks an action for the player to move.
pub trait Strategy {
    /// Choose a legal action. Fails with [`Error::TerminalState`] when the
    /// game is already over.
    fn select_action(&mut self, state: &GameState) -> Result<Action>;

    /// Short label for logs and reports.
    fn name(&self) -> &str;
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn select_action(&mut self, state: &GameState) -> Result<Action> {
        (**self).select_action(state)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Reject finished positions before any strategy looks at them.
pub(crate) fn ensure_playable(state: &GameState) -> Result<()> {
    if state.is_done() {
        Err(Error::TerminalState)
    } else {
        Ok(())
    }
}
