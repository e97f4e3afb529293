//! Self-improvement loop.
//!
//! ## Overview
//!
//! - **Self-play**: the guided search plays itself and every ply becomes a
//!   labeled [`TrainingExample`]
//! - **Arena**: two strategies play a seat-alternating match; the promotion
//!   gate decides whether a new model replaces the current best
//! - **Cycle**: self-play, fit, promotion match, and promotion, round after
//!   round, through the [`Trainer`] boundary
//!
//! Model fitting and snapshot storage happen behind [`Trainer`].
//!
//! ## Usage
//!
//! ```rust
//! use zero_ttt::mcts::SearchConfig;
//! use zero_ttt::nn::UniformPredictor;
//! use zero_ttt::training::{SelfPlayConfig, SelfPlayWorker};
//!
//! let worker = SelfPlayWorker::new(
//!     SearchConfig::default().with_guided_iterations(20),
//!     SelfPlayConfig::default().with_game_count(2),
//! );
//! let batch = worker.run(&UniformPredictor).unwrap();
//! assert!(batch.len() >= 10);
//! ```

pub mod arena;
pub mod cycle;
pub mod example;
pub mod self_play;
mod workers;

// Re-export main types
pub use arena::{
    evaluate_against_references, evaluate_promotion, play_game, Arena, ArenaConfig, MatchReport,
    PromotionGate,
};
pub use cycle::{CycleConfig, CycleReport, RoundReport, SnapshotRole, Trainer, TrainingCycle};
pub use example::{ExampleBatch, ExampleHistory, TrainingExample};
pub use self_play::{backward_labels, GameRecord, SelfPlayConfig, SelfPlayWorker};
