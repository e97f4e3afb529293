//! Core types: players, actions, game state, RNG, configuration.
//!
//! The rules engine lives in `state`: a `GameState` is immutable and every
//! transition returns a new value.

pub mod action;
pub mod config;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Action, ActionList, ACTION_SPACE};
pub use config::AgentConfig;
pub use player::{to_reference, PlayerId, PlayerMap};
pub use rng::GameRng;
pub use state::{GameOutcome, GameState};
