//! Outer training loop: self-play, fit, promotion match, optional promotion.
//!
//! Every stage of a round completes before the next starts, and any error
//! aborts the whole cycle. There is no resume across rounds.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::arena::{evaluate_against_references, evaluate_promotion, MatchReport, PromotionGate};
use super::example::{ExampleBatch, ExampleHistory};
use super::self_play::SelfPlayWorker;
use crate::core::AgentConfig;
use crate::error::Result;
use crate::nn::Predictor;

/// Named model snapshot kept by a [`Trainer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapshotRole {
    /// Most recently fitted model.
    Latest,
    /// Model currently used for self-play.
    Best,
}

impl std::fmt::Display for SnapshotRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotRole::Latest => write!(f, "latest"),
            SnapshotRole::Best => write!(f, "best"),
        }
    }
}

/// Fits models and keeps their snapshots.
///
/// `load` must fail with [`crate::Error::MissingSnapshot`] when nothing was
/// saved under `role`; the cycle never substitutes a default model.
pub trait Trainer {
    type Model: Predictor;

    /// Fit a new model on `batch`.
    fn fit(&mut self, batch: &ExampleBatch) -> Result<Self::Model>;

    /// Store `model` under `role`, replacing any previous snapshot.
    fn save(&mut self, model: &Self::Model, role: SnapshotRole) -> Result<()>;

    /// Load the snapshot stored under `role`.
    fn load(&self, role: SnapshotRole) -> Result<Self::Model>;
}

/// Configuration for the outer loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Number of rounds.
    pub rounds: usize,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self { rounds: 10 }
    }
}

impl CycleConfig {
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }
}

/// What happened in one round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: usize,

    /// Examples produced by this round's self-play.
    pub examples: usize,

    /// Latest-vs-best match.
    pub promotion: MatchReport,

    pub promoted: bool,

    /// Matches against the reference strategies; empty unless promoted.
    pub reference: Vec<MatchReport>,
}

/// Every round of a finished cycle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub rounds: Vec<RoundReport>,
}

impl CycleReport {
    /// Number of rounds that ended in a promotion.
    pub fn promotions(&self) -> usize {
        self.rounds.iter().filter(|r| r.promoted).count()
    }
}

/// Drives the training rounds.
#[derive(Clone, Debug)]
pub struct TrainingCycle {
    config: AgentConfig,
    history: ExampleHistory,
}

impl TrainingCycle {
    /// Create a cycle after validating `config`.
    pub fn new(config: AgentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            history: ExampleHistory::new(),
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Batches produced so far.
    pub fn history(&self) -> &ExampleHistory {
        &self.history
    }

    /// Run every configured round.
    ///
    /// The trainer must already hold a `Best` snapshot.
    pub fn run<T: Trainer>(&mut self, trainer: &mut T) -> Result<CycleReport> {
        let mut report = CycleReport::default();
        for round in 0..self.config.cycle.rounds {
            report.rounds.push(self.run_round(round, trainer)?);
        }

        info!(
            rounds = report.rounds.len(),
            promotions = report.promotions(),
            "Training cycle complete"
        );
        Ok(report)
    }

    /// Run one round.
    pub fn run_round<T: Trainer>(&mut self, round: usize, trainer: &mut T) -> Result<RoundReport> {
        let start = Instant::now();
        let search = &self.config.search;
        let arena = &self.config.arena;

        // Self-play with the current best model.
        let best = trainer.load(SnapshotRole::Best)?;
        let mut self_play_config = self.config.self_play.clone();
        self_play_config.seed_offset = self_play_config
            .seed_offset
            .wrapping_add((round * self_play_config.game_count) as u64);
        let batch = SelfPlayWorker::new(search.clone(), self_play_config).run(&best)?;
        let examples = batch.len();

        // Fit on the newest batch.
        let fitted = trainer.fit(&batch)?;
        self.history.push(batch);
        trainer.save(&fitted, SnapshotRole::Latest)?;

        // Promotion match between the stored snapshots.
        let latest = trainer.load(SnapshotRole::Latest)?;
        let incumbent = trainer.load(SnapshotRole::Best)?;
        let promotion = evaluate_promotion(&latest, &incumbent, search, arena)?;
        let promoted = PromotionGate::from_config(arena).should_promote(&promotion);

        let reference = if promoted {
            trainer.save(&latest, SnapshotRole::Best)?;
            evaluate_against_references(&latest, search, arena)?
        } else {
            Vec::new()
        };

        info!(
            round,
            examples,
            average_point = promotion.average_point,
            promoted,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Training round complete"
        );

        Ok(RoundReport {
            round,
            examples,
            promotion,
            promoted,
            reference,
        })
    }
}
