//! Whole games: determinism, snapshots, reward attribution and N-player play.

use farkle_engine::core::{GameConfig, GameRng, PlayerId, TurnPhase};
use farkle_engine::env::FarkleEnv;
use farkle_engine::play::{Controller, GreedyPolicy, Policy, RandomPolicy};
use farkle_engine::rules::RulesEngine;

fn greedy_table(seats: usize) -> Controller {
    let policies: Vec<Box<dyn Policy>> = (0..seats)
        .map(|i| Box::new(GreedyPolicy::new(350 + 150 * i as u32)) as Box<dyn Policy>)
        .collect();
    Controller::new(policies)
}

/// Drive a game with the first legal action until it ends.
fn play_first_legal(env: &mut FarkleEnv, limit: usize) -> Vec<i32> {
    let mut rewards = Vec::new();
    for _ in 0..limit {
        if env.awaiting_acknowledge() {
            env.acknowledge().unwrap();
        }
        let action = env.legal_actions()[0];
        let result = env.step(action).unwrap();
        rewards.push(result.reward);
        if result.terminated || result.truncated {
            break;
        }
    }
    rewards
}

/// Same seed, same game.
#[test]
fn test_seed_reproduces_game() {
    let config = GameConfig::default().with_win_score(4_000);
    let mut a = FarkleEnv::new(config.clone(), GameRng::new(0)).unwrap();
    let mut b = FarkleEnv::new(config, GameRng::new(1)).unwrap();

    a.reset(Some(2024));
    b.reset(Some(2024));
    let rewards_a = play_first_legal(&mut a, 300);
    let rewards_b = play_first_legal(&mut b, 300);

    assert_eq!(rewards_a, rewards_b);
    assert_eq!(a.state(), b.state());
}

/// A snapshot taken mid-game continues identically after restore.
#[test]
fn test_snapshot_resumes_mid_game() {
    let config = GameConfig::default().with_win_score(5_000);
    let mut env = FarkleEnv::new(config, GameRng::new(0)).unwrap();
    env.reset(Some(77));
    play_first_legal(&mut env, 10);

    let snapshot = env.snapshot().unwrap();
    let mut twin = env.clone();

    let original = play_first_legal(&mut env, 100);
    twin.restore(&snapshot).unwrap();
    let replay = play_first_legal(&mut twin, 100);

    assert_eq!(original, replay);
    assert_eq!(env.state(), twin.state());
}

/// Restoring into an environment with a different seat count fails.
#[test]
fn test_snapshot_player_count_mismatch() {
    let mut two = FarkleEnv::new(GameConfig::default(), GameRng::new(0)).unwrap();
    let mut three = FarkleEnv::new(GameConfig::default().with_player_count(3), GameRng::new(0)).unwrap();

    let bytes = two.snapshot().unwrap();
    assert!(three.restore(&bytes).is_err());
    assert!(two.restore(&bytes).is_ok());
}

/// Every bank or farkle pays exactly -1; a winning step pays 0.
#[test]
fn test_reward_per_turn() {
    let config = GameConfig::default().with_win_score(3_000).with_max_steps(None);
    let mut env = FarkleEnv::new(config, GameRng::new(0)).unwrap();
    let mut controller = greedy_table(2);

    let outcome = controller.play_game(&mut env, 31).unwrap();
    assert!(outcome.winner.is_some());

    // turns played = turns - skipped openings; all but the winning one cost 1
    let total: i32 = outcome.rewards.iter().sum();
    let played = outcome.turns - outcome.skipped_turns;
    assert_eq!((-total) as u32, played - 1);
    assert!(outcome.rewards.iter().all(|&r| r <= 0));
}

/// Banked totals never decrease over a game.
#[test]
fn test_banked_totals_monotonic() {
    let config = GameConfig::default().with_player_count(4).with_win_score(3_000);
    let mut env = FarkleEnv::new(config, GameRng::new(0)).unwrap();
    env.reset(Some(5));
    let mut last = env.observation().player_scores;

    for _ in 0..400 {
        if env.awaiting_acknowledge() {
            env.acknowledge().unwrap();
        }
        let action = *env.legal_actions().last().unwrap();
        let result = env.step(action).unwrap();

        for (now, before) in result.observation.player_scores.iter().zip(&last) {
            assert!(now >= before);
        }
        last = result.observation.player_scores;
        if result.terminated || result.truncated {
            break;
        }
    }
}

/// Games run for any seat count, including solitaire.
#[test]
fn test_n_player_games() {
    for seats in [1, 2, 3, 6] {
        let config = GameConfig::default()
            .with_player_count(seats)
            .with_win_score(2_000)
            .with_max_steps(None);
        let mut env = FarkleEnv::new(config, GameRng::new(0)).unwrap();
        let mut controller = greedy_table(seats);

        let outcome = controller.play_game(&mut env, seats as u64).unwrap();
        let winner = outcome.winner.unwrap();

        assert_eq!(outcome.scores.len(), seats);
        assert!(winner.index() < seats);
        assert!(outcome.scores[winner.index()] >= 2_000);
        assert_eq!(env.state().phase, TurnPhase::GameWon { winner });
    }
}

/// Random and greedy seats play a batch of games to completion.
#[test]
fn test_mixed_table_batch() {
    let config = GameConfig::default().with_player_count(3).with_win_score(2_500);
    let mut env = FarkleEnv::new(config, GameRng::new(0)).unwrap();
    let mut controller = Controller::new(vec![
        Box::new(RandomPolicy::new(0.4)),
        Box::new(GreedyPolicy::new(500)),
        Box::new(RandomPolicy::new(0.8)),
    ]);

    let outcomes = controller.play_games(&mut env, 1_000, 10).unwrap();
    assert_eq!(outcomes.len(), 10);

    for outcome in &outcomes {
        if outcome.truncated {
            assert!(outcome.winner.is_none());
            assert_eq!(outcome.steps, 500);
        } else {
            let winner = outcome.winner.unwrap();
            assert!(outcome.scores[winner.index()] >= 2_500);
        }
    }
}

/// The rules engine sees the same config as the environment.
#[test]
fn test_rules_terminal_matches_env() {
    let config = GameConfig::default().with_win_score(1_500).with_max_steps(None);
    let mut env = FarkleEnv::new(config.clone(), GameRng::new(0)).unwrap();
    let mut controller = greedy_table(2);
    controller.play_game(&mut env, 8).unwrap();

    let rules = farkle_engine::rules::FarkleRules::new(config);
    let result = rules.is_terminal(env.state()).unwrap();
    assert_eq!(Some(result.clone()), env.result());
    assert!(result.is_winner(result.winner));
    assert!(!result.is_winner(PlayerId::new((result.winner.0 + 1) % 2)));
}
