//! Benchmarks for the reference solvers and the Nim AI search.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use puzzle_arcade::games::fog_path::{shortest_path, Edge, Graph};
use puzzle_arcade::games::knapsack::{ExactDp, GreedyRatio, ItemSet, KnapsackSolver};
use puzzle_arcade::games::nim::{decide_ai_move, NimRules, PileSet};
use puzzle_arcade::{FogConfig, GameRng, KnapsackConfig};

fn knapsack_benchmark(c: &mut Criterion) {
    let config = KnapsackConfig::default();
    let items = ItemSet::generate(&config, &mut GameRng::new(42));

    c.bench_function("knapsack_exact_dp", |b| {
        b.iter(|| ExactDp.solve(black_box(items.as_slice()), black_box(config.capacity)))
    });

    c.bench_function("knapsack_greedy_ratio", |b| {
        b.iter(|| GreedyRatio.solve(black_box(items.as_slice()), black_box(config.capacity)))
    });
}

fn nim_ai_benchmark(c: &mut Criterion) {
    let rules = NimRules { max_remove: 5, max_shift: 3 };
    // Losing position: the AI searches every rearrangement
    let losing = PileSet::new([5, 9, 12, 0], 15);

    c.bench_function("nim_ai_rearrange_search", |b| {
        b.iter(|| decide_ai_move(black_box(&losing), 1, &rules))
    });
}

fn dijkstra_benchmark(c: &mut Criterion) {
    let config = FogConfig::default().with_grid(8, 8);
    let graph = Graph::grid(&config, &mut GameRng::new(42));
    let goal = graph.node_count() - 1;

    c.bench_function("dijkstra_true_weights_8x8", |b| {
        b.iter(|| shortest_path(black_box(&graph), 0, goal, |e| e.weight))
    });

    c.bench_function("dijkstra_lower_bounds_8x8", |b| {
        b.iter(|| shortest_path(black_box(&graph), 0, goal, Edge::optimistic_weight))
    });
}

criterion_group!(benches, knapsack_benchmark, nim_ai_benchmark, dijkstra_benchmark);
criterion_main!(benches);
