//! # zero-ttt
//!
//! Search and self-improvement loop for tic-tac-toe.
//!
//! ## Design Principles
//!
//! 1. **Negamax everywhere**: every value is from the point of view of the
//!    player to move. [`core::to_reference`] is the only place a value is
//!    mapped to a fixed player.
//!
//! 2. **Deterministic**: ties break on the first maximum in legal-action
//!    order and every stochastic component takes a seed.
//!
//! 3. **Configuration over constants**: [`AgentConfig`] holds every budget,
//!    temperature, and threshold.
//!
//! ## Architecture
//!
//! - **Arena trees**: nodes live in a flat `Vec` addressed by index and the
//!   search loop is iterative. Trees are rebuilt for every decision.
//!
//! - **Predictor boundary**: the guided search only sees policy and value
//!   estimates through [`nn::Predictor`]; models are fitted behind
//!   [`training::Trainer`].
//!
//! ## Modules
//!
//! - `core`: Players, actions, game state and rules, RNG, configuration
//! - `mcts`: Arena tree, selection policies, leaf evaluators, search loop
//! - `strategy`: Random, alpha-beta, flat Monte Carlo, UCB1 and PUCT searches
//! - `nn`: Predictor contract and state encoding
//! - `training`: Self-play, match play, promotion, training cycle

pub mod core;
pub mod error;
pub mod mcts;
pub mod nn;
pub mod strategy;
pub mod training;

// Re-export commonly used types
pub use crate::core::{
    to_reference, Action, ActionList, AgentConfig, GameOutcome, GameRng, GameState, PlayerId,
    PlayerMap, ACTION_SPACE,
};

pub use crate::error::{Error, Result};

pub use crate::mcts::{
    CancelToken, Puct, SearchBudget, SearchConfig, SearchStats, SearchTree, SelectionPolicy,
    TreeSearch, Ucb1,
};

pub use crate::nn::{EncodedState, PlaneEncoder, Prediction, Predictor, UniformPredictor};

pub use crate::strategy::{
    AlphaBetaStrategy, FlatMonteCarlo, GuidedMcts, PureMcts, RandomStrategy, Strategy,
};

pub use crate::training::{
    Arena, ArenaConfig, CycleConfig, ExampleBatch, MatchReport, SelfPlayConfig, SelfPlayWorker,
    SnapshotRole, Trainer, TrainingCycle, TrainingExample,
};
