//! Scoring throughput: cold decomposition, cached lookups, farkle checks and
//! full random games.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use farkle_engine::core::{Dice, DiceMask, FaceCounts, GameConfig, GameRng};
use farkle_engine::env::FarkleEnv;
use farkle_engine::play::{Controller, GreedyPolicy, RandomPolicy};
use farkle_engine::scoring::{is_farkled, legal_lock_selections, score, CombinationTable, ScoringEngine};

fn rolls(count: usize) -> Vec<Dice> {
    let mut rng = GameRng::new(42);
    (0..count).map(|_| Dice::rolled(&mut rng)).collect()
}

fn bench_scoring(c: &mut Criterion) {
    let rolls = rolls(1_000);

    c.bench_function("score_cached_1000", |b| {
        b.iter(|| {
            rolls
                .iter()
                .map(|d| score(black_box(d.values()), DiceMask::ALL))
                .sum::<u32>()
        })
    });

    let table = CombinationTable::standard();
    c.bench_function("score_cold_1000", |b| {
        b.iter(|| {
            let mut engine = ScoringEngine::new(&table);
            rolls
                .iter()
                .map(|d| engine.evaluate(&FaceCounts::from_values(black_box(d.values()))).best)
                .sum::<u32>()
        })
    });

    c.bench_function("is_farkled_1000", |b| {
        b.iter(|| rolls.iter().filter(|d| is_farkled(black_box(d))).count())
    });

    c.bench_function("legal_lock_selections_1000", |b| {
        b.iter(|| {
            rolls
                .iter()
                .map(|d| legal_lock_selections(black_box(d)).len())
                .sum::<usize>()
        })
    });
}

fn bench_games(c: &mut Criterion) {
    let config = GameConfig::default();
    let mut env = FarkleEnv::new(config, GameRng::new(0)).unwrap();
    let mut controller = Controller::new(vec![Box::new(RandomPolicy::new(0.3)), Box::new(GreedyPolicy::new(450))]);
    let mut seed = 0u64;

    c.bench_function("full_game_random_vs_greedy", |b| {
        b.iter(|| {
            seed += 1;
            controller.play_game(&mut env, seed).unwrap()
        })
    });
}

criterion_group!(benches, bench_scoring, bench_games);
criterion_main!(benches);
