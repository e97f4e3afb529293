//! Two-strategy match play and the promotion gate.
//!
//! A match alternates seats every game so neither side keeps the first-move
//! advantage. Points are always reported for strategy A: 1 win, 0.5 draw,
//! 0 loss.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::workers::run_games;
use crate::core::{GameOutcome, GameState, PlayerId};
use crate::error::Result;
use crate::mcts::SearchConfig;
use crate::nn::Predictor;
use crate::strategy::{AlphaBetaStrategy, GuidedMcts, PureMcts, RandomStrategy, Strategy};

/// Configuration for promotion and reference matches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Games in a candidate-vs-incumbent match.
    pub promotion_games: usize,

    /// Games in each match against a fixed reference strategy.
    pub reference_games: usize,

    /// Temperature of both predictors in promotion matches.
    pub promotion_temperature: f64,

    /// Temperature of the predictor in reference matches.
    pub reference_temperature: f64,

    /// The candidate is promoted iff its average point is strictly above this.
    pub promotion_threshold: f64,

    /// Threads to shard games across (1 = run on the caller's thread).
    pub workers: usize,

    /// Seed offset for RNG (combined with game index for unique seeds).
    pub seed_offset: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            promotion_games: 100,
            reference_games: 50,
            promotion_temperature: 1.0,
            reference_temperature: 0.0,
            promotion_threshold: 0.55,
            workers: 1,
            seed_offset: 0,
        }
    }
}

impl ArenaConfig {
    pub fn with_promotion_games(mut self, games: usize) -> Self {
        self.promotion_games = games;
        self
    }

    pub fn with_reference_games(mut self, games: usize) -> Self {
        self.reference_games = games;
        self
    }

    pub fn with_promotion_temperature(mut self, temp: f64) -> Self {
        self.promotion_temperature = temp;
        self
    }

    pub fn with_reference_temperature(mut self, temp: f64) -> Self {
        self.reference_temperature = temp;
        self
    }

    pub fn with_promotion_threshold(mut self, threshold: f64) -> Self {
        self.promotion_threshold = threshold;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_seed_offset(mut self, offset: u64) -> Self {
        self.seed_offset = offset;
        self
    }
}

/// Result of one match, from strategy A's point of view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub label: String,
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,

    /// Mean point per game in [0, 1]. 0 when no games were played.
    pub average_point: f64,
}

impl MatchReport {
    fn from_points(label: &str, points: &[f64]) -> Self {
        let wins = points.iter().filter(|&&p| p == 1.0).count();
        let draws = points.iter().filter(|&&p| p == 0.5).count();
        let games = points.len();
        let average_point = if games == 0 {
            0.0
        } else {
            points.iter().sum::<f64>() / games as f64
        };

        Self {
            label: label.to_string(),
            games,
            wins,
            draws,
            losses: games - wins - draws,
            average_point,
        }
    }
}

impl std::fmt::Display for MatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {:.3} ({}W {}D {}L)",
            self.label, self.average_point, self.wins, self.draws, self.losses
        )
    }
}

/// Play one game to the end; `first` moves first.
pub fn play_game<A, B>(first: &mut A, second: &mut B) -> Result<GameOutcome>
where
    A: Strategy + ?Sized,
    B: Strategy + ?Sized,
{
    let mut state = GameState::new();
    loop {
        if let Some(outcome) = state.outcome() {
            return Ok(outcome);
        }
        let action = if state.is_first_player() {
            first.select_action(&state)?
        } else {
            second.select_action(&state)?
        };
        state = state.next(action)?;
    }
}

/// Match runner for two strategy factories.
///
/// Factories receive a per-game seed and build fresh strategies, so games
/// are independent and may run on any thread.
#[derive(Clone, Debug)]
pub struct Arena {
    games: usize,
    workers: usize,
    seed_offset: u64,
}

impl Arena {
    /// Arena playing `games` games per match on the caller's thread.
    pub fn new(games: usize) -> Self {
        Self {
            games,
            workers: 1,
            seed_offset: 0,
        }
    }

    /// Candidate-vs-incumbent matches.
    pub fn promotion(config: &ArenaConfig) -> Self {
        Self::new(config.promotion_games)
            .with_workers(config.workers)
            .with_seed_offset(config.seed_offset)
    }

    /// Matches against the fixed reference strategies.
    pub fn reference(config: &ArenaConfig) -> Self {
        Self::new(config.reference_games)
            .with_workers(config.workers)
            .with_seed_offset(config.seed_offset)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_seed_offset(mut self, offset: u64) -> Self {
        self.seed_offset = offset;
        self
    }

    pub fn games(&self) -> usize {
        self.games
    }

    /// Play the match. A moves first in even games, B in odd games.
    pub fn evaluate<A, B, FA, FB>(&self, label: &str, make_a: FA, make_b: FB) -> Result<MatchReport>
    where
        A: Strategy,
        B: Strategy,
        FA: Fn(u64) -> A + Sync + Send,
        FB: Fn(u64) -> B + Sync + Send,
    {
        let start = Instant::now();

        let points = run_games(self.games, self.workers, |i| {
            let seed = self.seed_offset.wrapping_add(i as u64).wrapping_mul(2);
            let mut a = make_a(seed);
            let mut b = make_b(seed.wrapping_add(1));

            let point = if i % 2 == 0 {
                play_game(&mut a, &mut b)?.point_for(PlayerId::FIRST)
            } else {
                1.0 - play_game(&mut b, &mut a)?.point_for(PlayerId::FIRST)
            };

            debug!(label, game = i, point, "Arena game finished");
            Ok(point)
        })?;

        let report = MatchReport::from_points(label, &points);
        info!(
            label,
            games = report.games,
            wins = report.wins,
            draws = report.draws,
            losses = report.losses,
            average_point = report.average_point,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Match complete"
        );

        Ok(report)
    }
}

/// Accept/reject decision for a freshly trained predictor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PromotionGate {
    threshold: f64,
}

impl PromotionGate {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn from_config(config: &ArenaConfig) -> Self {
        Self::new(config.promotion_threshold)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Promote iff the candidate's average point is strictly above the
    /// threshold.
    #[must_use]
    pub fn should_promote(&self, report: &MatchReport) -> bool {
        report.average_point > self.threshold
    }
}

/// Candidate predictor against the incumbent, both guided at the promotion
/// temperature. Points are the candidate's.
pub fn evaluate_promotion<C, I>(
    candidate: &C,
    incumbent: &I,
    search: &SearchConfig,
    config: &ArenaConfig,
) -> Result<MatchReport>
where
    C: Predictor + ?Sized,
    I: Predictor + ?Sized,
{
    let temperature = config.promotion_temperature;
    Arena::promotion(config).evaluate(
        "latest vs best",
        |seed| GuidedMcts::new(candidate, search, temperature, seed),
        |seed| GuidedMcts::new(incumbent, search, temperature, seed),
    )
}

/// The predictor (at the reference temperature) against uniform-random,
/// exhaustive alpha-beta, and UCB1 rollout search, in that order.
pub fn evaluate_against_references<P: Predictor + ?Sized>(
    predictor: &P,
    search: &SearchConfig,
    config: &ArenaConfig,
) -> Result<Vec<MatchReport>> {
    let arena = Arena::reference(config);
    let temperature = config.reference_temperature;
    let guided = |seed| GuidedMcts::new(predictor, search, temperature, seed);

    Ok(vec![
        arena.evaluate("vs random", guided, RandomStrategy::new)?,
        arena.evaluate("vs alpha-beta", guided, |_| AlphaBetaStrategy::new())?,
        arena.evaluate("vs pure-mcts", guided, |seed| PureMcts::new(search, seed))?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_config_default() {
        let config = ArenaConfig::default();
        assert_eq!(config.promotion_games, 100);
        assert_eq!(config.reference_games, 50);
        assert_eq!(config.reference_temperature, 0.0);
        assert_eq!(config.promotion_threshold, 0.55);
    }

    #[test]
    fn test_alpha_beta_self_play_is_a_draw() {
        let outcome = play_game(&mut AlphaBetaStrategy, &mut AlphaBetaStrategy).unwrap();
        assert_eq!(outcome, GameOutcome::Draw);
    }

    #[test]
    fn test_alpha_beta_never_loses_to_random() {
        let report = Arena::new(20)
            .evaluate("ab vs random", |_| AlphaBetaStrategy, RandomStrategy::new)
            .unwrap();
        assert_eq!(report.games, 20);
        assert_eq!(report.losses, 0);
        assert!(report.average_point > 0.5);
    }

    #[test]
    fn test_seat_alternation_is_symmetric() {
        let report = Arena::new(6)
            .evaluate("ab vs ab", |_| AlphaBetaStrategy, |_| AlphaBetaStrategy)
            .unwrap();
        assert_eq!(report.draws, 6);
        assert_eq!(report.average_point, 0.5);
    }

    #[test]
    fn test_parallel_match_matches_sequential() {
        let sequential = Arena::new(8)
            .evaluate("random", RandomStrategy::new, RandomStrategy::new)
            .unwrap();
        let parallel = Arena::new(8)
            .with_workers(3)
            .evaluate("random", RandomStrategy::new, RandomStrategy::new)
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_match_report_counts() {
        let report = MatchReport::from_points("x", &[1.0, 0.5, 0.0, 1.0]);
        assert_eq!((report.wins, report.draws, report.losses), (2, 1, 1));
        assert_eq!(report.average_point, 0.625);
        assert_eq!(report.to_string(), "x: 0.625 (2W 1D 1L)");
    }

    #[test]
    fn test_promotion_gate_is_strict() {
        let gate = PromotionGate::new(0.55);
        let mut report = MatchReport::from_points("x", &[]);
        report.average_point = 0.55;
        assert!(!gate.should_promote(&report));
        report.average_point = 0.56;
        assert!(gate.should_promote(&report));
    }
}
