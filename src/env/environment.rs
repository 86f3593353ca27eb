//! The step/reset environment wrapped around `FarkleRules`.
//!
//! `FarkleEnv` owns the game state and the dice RNG. Each `step` applies one
//! action for the active player. When a step ends the round (bank or farkle)
//! the caller must `acknowledge` before the next player can act; a step that
//! wins the game terminates the episode.

use serde::{Deserialize, Serialize};

use crate::core::{Action, FarkleError, GameConfig, GameRng, GameRngState, GameState};
use crate::rules::{check_action, check_bank_legal, check_lock_legal, check_phase, check_state};
use crate::rules::{FarkleRules, GameResult, RulesEngine, Transition};

use super::observation::{Info, Observation, StepResult};

/// Reward for an action that leaves the turn running or wins.
pub const REWARD_NEUTRAL: i32 = 0;
/// Reward for an action that ends the turn by bank or farkle.
pub const REWARD_TURN_END: i32 = -1;

/// Everything needed to continue an environment exactly where it stopped.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct Snapshot {
    state: GameState,
    rng: GameRngState,
    steps: u32,
}

/// A seeded Farkle game exposed as an episodic environment.
///
/// ```
/// use farkle_engine::core::{GameConfig, GameRng};
/// use farkle_engine::env::FarkleEnv;
///
/// let mut env = FarkleEnv::new(GameConfig::default(), GameRng::new(7)).unwrap();
/// let (obs, _info) = env.reset(Some(7));
/// assert_eq!(obs.player_scores, vec![0, 0]);
///
/// let action = env.legal_actions()[0];
/// let result = env.step(action).unwrap();
/// assert!(!result.terminated);
/// ```
#[derive(Clone, Debug)]
pub struct FarkleEnv {
    rules: FarkleRules,
    state: GameState,
    rng: GameRng,
    steps: u32,
}

impl FarkleEnv {
    /// Validate `config` and deal the first roll.
    pub fn new(config: GameConfig, mut rng: GameRng) -> Result<Self, FarkleError> {
        config.validate()?;
        let rules = FarkleRules::new(config);
        let (state, _) = rules.new_game(&mut rng);
        Ok(Self {
            rules,
            state,
            rng,
            steps: 0,
        })
    }

    /// Resume from an explicit state, e.g. a hand-built position.
    ///
    /// The state must be playable under `config`; see `rules::check_state`.
    pub fn from_state(config: GameConfig, state: GameState, rng: GameRng) -> Result<Self, FarkleError> {
        config.validate()?;
        check_state(&state, &config)?;
        Ok(Self {
            rules: FarkleRules::new(config),
            state,
            rng,
            steps: 0,
        })
    }

    /// Start a new game. `Some(seed)` reseeds the dice; `None` keeps drawing
    /// from the current stream.
    pub fn reset(&mut self, seed: Option<u64>) -> (Observation, Info) {
        if let Some(seed) = seed {
            self.rng = GameRng::new(seed);
        }

        let (state, handoff) = self.rules.new_game(&mut self.rng);
        self.state = state;
        self.steps = 0;
        log::debug!(
            "new game: {} players, {} to win, seed {}",
            self.state.player_count(),
            self.state.win_score,
            self.rng.seed()
        );

        let info = Info {
            skipped: handoff.skipped.to_vec(),
            ..Info::default()
        };
        (self.observation(), info)
    }

    /// Apply one action for the active player.
    ///
    /// Rejected actions leave the environment unchanged and do not count
    /// toward the step limit.
    pub fn step(&mut self, action: Action) -> Result<StepResult, FarkleError> {
        let transition = self.rules.apply_action(&mut self.state, &action, &mut self.rng)?;
        self.steps += 1;

        let mut info = Info {
            winner: self.state.winner(),
            ..Info::default()
        };
        let reward = match transition {
            Transition::Continue { hot_dice, .. } => {
                info.hot_dice = hot_dice;
                REWARD_NEUTRAL
            }
            Transition::Farkled { .. } => {
                info.farkled = true;
                REWARD_TURN_END
            }
            Transition::Banked { .. } => REWARD_TURN_END,
            Transition::Won { .. } => REWARD_NEUTRAL,
        };

        let terminated = info.winner.is_some();
        let truncated = !terminated && self.step_limit_reached();
        if truncated {
            log::debug!("episode truncated after {} steps", self.steps);
        }

        Ok(StepResult {
            observation: self.observation(),
            reward,
            terminated,
            truncated,
            info,
        })
    }

    /// Close a banked or farkled round and hand the dice on.
    pub fn acknowledge(&mut self) -> Result<(Observation, Info), FarkleError> {
        let handoff = self.rules.acknowledge(&mut self.state, &mut self.rng)?;
        let info = Info {
            skipped: handoff.skipped.to_vec(),
            ..Info::default()
        };
        Ok((self.observation(), info))
    }

    /// Whether the lock part of `action` is legal now.
    #[must_use]
    pub fn check_lock_legal(&self, action: &Action) -> bool {
        check_phase(&self.state).is_ok() && check_lock_legal(&self.state, action).is_ok()
    }

    /// Whether the bank part of `action` is legal now.
    #[must_use]
    pub fn check_bank_legal(&self, action: &Action) -> bool {
        check_phase(&self.state).is_ok() && check_bank_legal(&self.state, self.config(), action).is_ok()
    }

    /// The error `step` would return for `action`, if any.
    pub fn validate(&self, action: &Action) -> Result<(), FarkleError> {
        check_phase(&self.state)?;
        check_action(&self.state, self.config(), action)
    }

    /// Every action `step` would accept now.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<Action> {
        self.rules.legal_actions(&self.state)
    }

    #[must_use]
    pub fn observation(&self) -> Observation {
        Observation::from_state(&self.state)
    }

    /// The winner and final scores once the game is over.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.rules.is_terminal(&self.state)
    }

    /// Whether `acknowledge` is required before the next step.
    #[must_use]
    pub fn awaiting_acknowledge(&self) -> bool {
        self.state.phase.is_round_over()
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        self.rules.config()
    }

    /// Accepted actions since the last reset.
    #[must_use]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Serialize the state and RNG position.
    pub fn snapshot(&self) -> Result<Vec<u8>, FarkleError> {
        let snapshot = Snapshot {
            state: self.state.clone(),
            rng: self.rng.state(),
            steps: self.steps,
        };
        Ok(bincode::serialize(&snapshot)?)
    }

    /// Continue from a `snapshot`. The environment is unchanged on error,
    /// including when the decoded state is not playable under this config.
    pub fn restore(&mut self, bytes: &[u8]) -> Result<(), FarkleError> {
        let snapshot: Snapshot = bincode::deserialize(bytes)?;
        check_state(&snapshot.state, self.config())?;

        self.state = snapshot.state;
        self.rng = GameRng::from_state(&snapshot.rng);
        self.steps = snapshot.steps;
        Ok(())
    }

    fn step_limit_reached(&self) -> bool {
        self.config().max_steps.is_some_and(|max| self.steps >= max)
    }
}
