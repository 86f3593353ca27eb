//! Turn sequencing: seats policies at a `FarkleEnv` and plays whole games.
//!
//! The environment decides whose turn it is, including after skipped
//! openings; the controller only routes decisions and acknowledgments. Each
//! seat receives the summed reward of its turn once that turn ends.

use serde::{Deserialize, Serialize};

use crate::core::{FarkleError, GameRng, PlayerId};
use crate::env::FarkleEnv;

use super::policy::Policy;

/// How one turn stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TurnEnd {
    /// Banked or farkled; acknowledged and handed on.
    Passed,
    Won,
    Truncated,
}

/// Summary of a finished game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub seed: u64,
    /// `None` when the game was truncated.
    pub winner: Option<PlayerId>,
    pub scores: Vec<u32>,
    /// Summed rewards per seat.
    pub rewards: Vec<i32>,
    /// Accepted actions.
    pub steps: u32,
    /// Turns played, skipped openings included.
    pub turns: u32,
    /// Turns lost to a farkled opening roll.
    pub skipped_turns: u32,
    pub truncated: bool,
}

/// Plays games between a fixed set of policies, one per seat.
pub struct Controller {
    policies: Vec<Box<dyn Policy>>,
}

impl Controller {
    #[must_use]
    pub fn new(policies: Vec<Box<dyn Policy>>) -> Self {
        Self { policies }
    }

    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.policies.len()
    }

    /// Play one game from a fresh reset with `seed`.
    ///
    /// Dice come from the environment's stream; policy randomness comes from
    /// a separate stream derived from the same seed.
    pub fn play_game(&mut self, env: &mut FarkleEnv, seed: u64) -> Result<GameOutcome, FarkleError> {
        let player_count = env.config().player_count;
        if self.policies.len() != player_count {
            return Err(FarkleError::InvalidConfig {
                reason: format!(
                    "{} policies seated for a {player_count}-player game",
                    self.policies.len()
                ),
            });
        }

        let (_, info) = env.reset(Some(seed));
        let mut rng = GameRng::new(seed).fork();
        let mut rewards = vec![0; player_count];
        let mut skipped_turns = info.skipped.len() as u32;

        let end = loop {
            let seat = env.state().active_player;
            let (reward, end) = self.play_turn(env, &mut rng)?;
            rewards[seat.index()] += reward;

            match end {
                TurnEnd::Passed => {
                    let (_, info) = env.acknowledge()?;
                    skipped_turns += info.skipped.len() as u32;
                }
                TurnEnd::Won | TurnEnd::Truncated => break end,
            }
        };

        let outcome = GameOutcome {
            seed,
            winner: env.state().winner(),
            scores: env.state().banked.to_vec(),
            rewards,
            steps: env.steps(),
            turns: env.state().turn_number,
            skipped_turns,
            truncated: end == TurnEnd::Truncated,
        };

        match outcome.winner {
            Some(winner) => log::info!(
                "seed {seed}: {winner} ({}) wins after {} turns, scores {:?}",
                self.policies[winner.index()].name(),
                outcome.turns,
                outcome.scores
            ),
            None => log::info!("seed {seed}: truncated after {} steps", outcome.steps),
        }

        Ok(outcome)
    }

    /// Play `count` games with consecutive seeds starting at `first_seed`.
    pub fn play_games(
        &mut self,
        env: &mut FarkleEnv,
        first_seed: u64,
        count: usize,
    ) -> Result<Vec<GameOutcome>, FarkleError> {
        (0..count as u64)
            .map(|i| self.play_game(env, first_seed.wrapping_add(i)))
            .collect()
    }

    /// Prompt the active seat until its turn ends.
    fn play_turn(&mut self, env: &mut FarkleEnv, rng: &mut GameRng) -> Result<(i32, TurnEnd), FarkleError> {
        let seat = env.state().active_player;
        let policy = &mut self.policies[seat.index()];
        let mut total = 0;

        let end = loop {
            let observation = env.observation();
            let legal = env.legal_actions();
            let action = policy
                .choose(&observation, &legal, rng)
                .ok_or_else(|| FarkleError::Validation {
                    reason: format!("{} policy for {seat} returned no action", policy.name()),
                })?;

            let result = env.step(action)?;
            total += result.reward;

            if result.terminated {
                break TurnEnd::Won;
            }
            if result.truncated {
                break TurnEnd::Truncated;
            }
            if env.awaiting_acknowledge() {
                break TurnEnd::Passed;
            }
        };

        log::trace!("{seat} ({}) turn reward {total}", policy.name());
        policy.update(total);
        Ok((total, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::play::{GreedyPolicy, RandomPolicy};

    fn env(config: GameConfig) -> FarkleEnv {
        FarkleEnv::new(config, GameRng::new(0)).unwrap()
    }

    #[test]
    fn test_seat_count_must_match() {
        let mut controller = Controller::new(vec![Box::new(RandomPolicy::default())]);
        let mut env = env(GameConfig::default());

        assert!(matches!(
            controller.play_game(&mut env, 1),
            Err(FarkleError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_greedy_game_finishes() {
        let config = GameConfig::default().with_win_score(2_000).with_max_steps(None);
        let mut env = env(config);
        let mut controller = Controller::new(vec![
            Box::new(GreedyPolicy::new(300)),
            Box::new(GreedyPolicy::new(600)),
        ]);

        let outcome = controller.play_game(&mut env, 5).unwrap();
        let winner = outcome.winner.unwrap();

        assert!(!outcome.truncated);
        assert!(outcome.scores[winner.index()] >= 2_000);
        assert!(outcome.rewards.iter().all(|&r| r <= 0));
        assert_eq!(env.result().map(|r| r.winner), Some(winner));
    }

    #[test]
    fn test_truncated_game_has_no_winner() {
        let config = GameConfig::default().with_max_steps(Some(3));
        let mut env = env(config);
        let mut controller = Controller::new(vec![
            Box::new(RandomPolicy::new(0.0)),
            Box::new(RandomPolicy::new(0.0)),
        ]);

        let outcome = controller.play_game(&mut env, 9).unwrap();
        assert!(outcome.truncated);
        assert!(outcome.winner.is_none());
        assert_eq!(outcome.steps, 3);
    }

    #[test]
    fn test_games_are_reproducible() {
        let config = GameConfig::default().with_win_score(3_000);
        let mut env = env(config);
        let mut controller = Controller::new(vec![
            Box::new(RandomPolicy::new(0.3)),
            Box::new(GreedyPolicy::new(400)),
        ]);

        let first = controller.play_games(&mut env, 100, 3).unwrap();
        let second = controller.play_games(&mut env, 100, 3).unwrap();
        assert_eq!(first, second);
        assert_eq!(first[2].seed, 102);
    }
}
