//! Self-play loop for generating training data.
//!
//! Plays complete games with the guided tree search against itself, records
//! the search distribution at every ply, and labels each ply with the final
//! result once the game is over.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::example::{ExampleBatch, TrainingExample};
use super::workers::run_games;
use crate::core::{Action, GameOutcome, GameState, PlayerId};
use crate::error::Result;
use crate::mcts::SearchConfig;
use crate::nn::{PlaneEncoder, Predictor, StateEncoder};
use crate::strategy::GuidedMcts;

/// Configuration for self-play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelfPlayConfig {
    /// Games per run.
    pub game_count: usize,

    /// Temperature applied to root visit counts when picking moves.
    pub temperature: f64,

    /// Threads to shard games across (1 = run on the caller's thread).
    pub workers: usize,

    /// Seed offset for RNG (combined with game index for unique seeds).
    pub seed_offset: u64,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            game_count: 500,
            temperature: 1.0,
            workers: 1,
            seed_offset: 0,
        }
    }
}

impl SelfPlayConfig {
    /// Create a new self-play config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set games per run.
    pub fn with_game_count(mut self, count: usize) -> Self {
        self.game_count = count;
        self
    }

    /// Set the move-selection temperature.
    pub fn with_temperature(mut self, temp: f64) -> Self {
        self.temperature = temp;
        self
    }

    /// Set worker threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set seed offset.
    pub fn with_seed_offset(mut self, offset: u64) -> Self {
        self.seed_offset = offset;
        self
    }

    /// Seed of game number `index`.
    #[must_use]
    pub fn game_seed(&self, index: usize) -> u64 {
        self.seed_offset.wrapping_add(index as u64)
    }
}

/// Value labels for a finished game of `plies` moves.
///
/// `last_mover_value` is the result for the player who made the final move.
/// The pass runs backward from the last ply and negates at every step, since
/// the player to move alternates.
#[must_use]
pub fn backward_labels(plies: usize, last_mover_value: f32) -> Vec<f32> {
    let mut labels = vec![0.0; plies];
    let mut value = last_mover_value;
    for label in labels.iter_mut().rev() {
        *label = value;
        value = -value;
    }
    labels
}

/// One finished self-play game.
#[derive(Clone, Debug)]
pub struct GameRecord {
    /// One labeled example per ply.
    pub examples: Vec<TrainingExample>,

    /// Moves actually played.
    pub actions: Vec<Action>,

    /// Final result.
    pub outcome: GameOutcome,

    /// Seed the game was played with.
    pub seed: u64,
}

impl GameRecord {
    /// Number of moves played.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Worker for running self-play games.
#[derive(Clone, Debug)]
pub struct SelfPlayWorker<E = PlaneEncoder> {
    search: SearchConfig,
    config: SelfPlayConfig,
    encoder: E,
}

impl SelfPlayWorker {
    /// Create a worker using the plane encoding.
    pub fn new(search: SearchConfig, config: SelfPlayConfig) -> Self {
        Self {
            search,
            config,
            encoder: PlaneEncoder,
        }
    }
}

impl<E: StateEncoder> SelfPlayWorker<E> {
    /// Create a worker with a custom encoder.
    pub fn with_encoder(search: SearchConfig, config: SelfPlayConfig, encoder: E) -> Self {
        Self {
            search,
            config,
            encoder,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &SelfPlayConfig {
        &self.config
    }

    /// Play one game from the empty board.
    pub fn play_game<P: Predictor + ?Sized>(&self, predictor: &P, seed: u64) -> Result<GameRecord> {
        let mut mcts = GuidedMcts::new(predictor, &self.search, self.config.temperature, seed);
        let mut state = GameState::new();
        let mut plies = Vec::new();
        let mut actions = Vec::new();

        let outcome = loop {
            if let Some(outcome) = state.outcome() {
                break outcome;
            }

            let distribution = mcts.action_distribution(&state)?;
            plies.push((self.encoder.encode(&state), distribution.policy_vector()));

            let action = mcts.choose(&distribution)?;
            actions.push(action);
            state = state.next(action)?;
        };

        // The player who made the last move is the one not to move now.
        let last_mover = state.to_move().other();
        let labels = backward_labels(plies.len(), outcome.value_for(last_mover) as f32);

        let examples = plies
            .into_iter()
            .zip(labels)
            .map(|((state, policy), value)| TrainingExample {
                state,
                policy,
                value,
            })
            .collect();

        debug!(seed, moves = actions.len(), ?outcome, "Self-play game finished");

        Ok(GameRecord {
            examples,
            actions,
            outcome,
            seed,
        })
    }

    /// Play `game_count` games and collect every ply into one batch.
    pub fn run<P: Predictor + ?Sized>(&self, predictor: &P) -> Result<ExampleBatch> {
        let start = Instant::now();

        let records = run_games(self.config.game_count, self.config.workers, |i| {
            self.play_game(predictor, self.config.game_seed(i))
        })?;

        let mut first_wins = 0;
        let mut draws = 0;
        let mut batch = ExampleBatch::new();
        for record in records {
            match record.outcome {
                GameOutcome::Winner(p) if p == PlayerId::FIRST => first_wins += 1,
                GameOutcome::Draw => draws += 1,
                GameOutcome::Winner(_) => {}
            }
            batch.extend(record.examples);
        }

        info!(
            games = self.config.game_count,
            examples = batch.len(),
            first_wins,
            draws,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Self-play run complete"
        );

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nn::UniformPredictor;

    fn small_worker(games: usize) -> SelfPlayWorker {
        SelfPlayWorker::new(
            SearchConfig::default().with_guided_iterations(10),
            SelfPlayConfig::default().with_game_count(games),
        )
    }

    #[test]
    fn test_self_play_config_default() {
        let config = SelfPlayConfig::default();
        assert_eq!(config.game_count, 500);
        assert_eq!(config.temperature, 1.0);
        assert_eq!(config.workers, 1);
        assert_eq!(config.with_seed_offset(100).game_seed(5), 105);
    }

    #[test]
    fn test_backward_labels_alternate() {
        assert_eq!(backward_labels(5, 1.0), vec![1.0, -1.0, 1.0, -1.0, 1.0]);
        assert_eq!(backward_labels(6, 1.0), vec![-1.0, 1.0, -1.0, 1.0, -1.0, 1.0]);
        assert_eq!(backward_labels(9, 0.0), vec![0.0; 9]);
        assert!(backward_labels(0, 1.0).is_empty());
    }

    #[test]
    fn test_play_game_records_every_ply() {
        let record = small_worker(1).play_game(&UniformPredictor, 42).unwrap();

        assert!(record.len() >= 5 && record.len() <= 9);
        assert_eq!(record.examples.len(), record.len());

        for (example, action) in record.examples.iter().zip(&record.actions) {
            let total: f32 = example.policy.iter().sum();
            assert!((total - 1.0).abs() < 1e-5);
            assert!(example.policy[action.index()] > 0.0);
            assert_eq!(example.state.shape, vec![2, 3, 3]);
        }
    }

    #[test]
    fn test_play_game_labels_match_outcome() {
        let record = small_worker(1).play_game(&UniformPredictor, 7).unwrap();
        let last = record.examples.last().unwrap().value;

        match record.outcome {
            GameOutcome::Draw => assert_eq!(last, 0.0),
            GameOutcome::Winner(_) => assert_eq!(last, 1.0),
        }

        // The first ply belongs to the first player.
        let first_value = record.outcome.value_for(PlayerId::FIRST) as f32;
        assert_eq!(record.examples[0].value, first_value);
    }

    #[test]
    fn test_play_game_is_deterministic() {
        let worker = small_worker(1);
        let a = worker.play_game(&UniformPredictor, 3).unwrap();
        let b = worker.play_game(&UniformPredictor, 3).unwrap();
        assert_eq!(a.actions, b.actions);
    }

    #[test]
    fn test_run_collects_all_games() {
        let worker = small_worker(3);
        let batch = worker.run(&UniformPredictor).unwrap();
        assert!(batch.len() >= 15 && batch.len() <= 27);
    }
}
