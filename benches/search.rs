//! Search benchmarks.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use zero_ttt::core::GameState;
use zero_ttt::mcts::{
    PredictorEvaluator, Puct, RolloutEvaluator, SearchBudget, SearchConfig, TreeSearch, Ucb1,
};
use zero_ttt::nn::UniformPredictor;
use zero_ttt::strategy::{alpha_beta_value, FlatMonteCarlo, Strategy};
use zero_ttt::training::{SelfPlayConfig, SelfPlayWorker};

// =============================================================================
// Tree Searches
// =============================================================================

fn bench_tree_search_iterations(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_search_iterations");
    let state = GameState::new();

    for iterations in [50u32, 100, 400, 1600] {
        group.throughput(Throughput::Elements(iterations as u64));

        group.bench_with_input(BenchmarkId::new("ucb1", iterations), &iterations, |b, &n| {
            b.iter(|| {
                let mut search = TreeSearch::new(Ucb1::default(), RolloutEvaluator::new(42, 10));
                black_box(search.search(&state, &SearchBudget::iterations(n)).unwrap())
            });
        });

        group.bench_with_input(BenchmarkId::new("puct", iterations), &iterations, |b, &n| {
            b.iter(|| {
                let mut search =
                    TreeSearch::new(Puct::default(), PredictorEvaluator::new(&UniformPredictor));
                black_box(search.search(&state, &SearchBudget::iterations(n)).unwrap())
            });
        });
    }

    group.finish();
}

// =============================================================================
// Exhaustive and Flat Searches
// =============================================================================

fn bench_alpha_beta(c: &mut Criterion) {
    let opening = GameState::new();
    let midgame = GameState::from_cells("X-- -O- --X").unwrap();

    c.bench_function("alpha_beta/opening", |b| {
        b.iter(|| black_box(alpha_beta_value(black_box(&opening)).unwrap()))
    });
    c.bench_function("alpha_beta/midgame", |b| {
        b.iter(|| black_box(alpha_beta_value(black_box(&midgame)).unwrap()))
    });
}

fn bench_flat_monte_carlo(c: &mut Criterion) {
    let state = GameState::new();
    c.bench_function("flat_monte_carlo/opening", |b| {
        let mut flat = FlatMonteCarlo::new(10, 7);
        b.iter(|| black_box(flat.select_action(&state).unwrap()))
    });
}

// =============================================================================
// Self-Play
// =============================================================================

fn bench_self_play_game(c: &mut Criterion) {
    let worker = SelfPlayWorker::new(SearchConfig::default(), SelfPlayConfig::default());
    let mut seed = 0;
    c.bench_function("self_play/game", |b| {
        b.iter(|| {
            seed += 1;
            black_box(worker.play_game(&UniformPredictor, seed).unwrap())
        })
    });
}

criterion_group!(
    benches,
    bench_tree_search_iterations,
    bench_alpha_beta,
    bench_flat_monte_carlo,
    bench_self_play_game,
);
criterion_main!(benches);
