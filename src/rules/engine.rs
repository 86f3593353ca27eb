//! Rules engine trait and the Farkle turn state machine.
//!
//! `RulesEngine` defines:
//! - What actions are legal
//! - How actions modify state
//! - When and how a finished turn hands off to the next player
//! - Win conditions
//!
//! ## Turn lifecycle
//!
//! ```text
//!                 lock (no bank)            reroll farkles
//!   AwaitingAction ─────────────► roll ───────────────────► RoundFarkled
//!        │  ▲                      │                             │
//!        │  └──────────────────────┘ scoring dice                │
//!        │ bank                                                  │
//!        ▼                                                       │
//!   RoundBanked ──────────── acknowledge ◄───────────────────────┘
//!                                 │
//!                                 ▼
//!                next player's opening roll (farkled openings are skipped)
//! ```
//!
//! Reaching the win score on any action moves straight to `GameWon`,
//! overriding both bank and farkle.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{
    Action, Dice, FarkleError, GameConfig, GameRng, GameState, PlayerId, TurnPhase,
};
use crate::scoring::{is_farkled, legal_lock_selections, score};

use super::legal::{check_action, check_bank_legal, check_phase};

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: PlayerId,
    /// Final banked totals, indexed by player.
    pub scores: Vec<u32>,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winner == player
    }
}

/// What an applied action did to the turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// The turn goes on with freshly rolled dice.
    Continue {
        /// Points the locked dice scored.
        points: u32,
        /// All six dice were locked and rerolled.
        hot_dice: bool,
    },
    /// The reroll had no scoring dice; `lost` turn points were discarded.
    Farkled { lost: u32 },
    /// The turn's `points` were added to the player's banked total.
    Banked { points: u32 },
    /// The action carried `winner` to the win score.
    Won { winner: PlayerId, points: u32 },
}

impl Transition {
    /// The turn is over, by bank or farkle.
    #[must_use]
    pub const fn ends_round(self) -> bool {
        matches!(self, Transition::Farkled { .. } | Transition::Banked { .. })
    }
}

/// Where play resumed after a turn ended.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handoff {
    /// The player now awaiting an action.
    pub next_player: PlayerId,
    /// Players whose opening roll farkled, in seat order.
    pub skipped: SmallVec<[PlayerId; 4]>,
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `apply_action` and `acknowledge` must validate before mutating: an
///   `Err` leaves the state untouched
/// - All randomness comes from the `GameRng` argument
/// - `is_terminal`: Return None if game continues
pub trait RulesEngine {
    /// Get the game configuration.
    fn config(&self) -> &GameConfig;

    /// Start a game: player 0 rolls, skipping ahead past farkled openings.
    fn new_game(&self, rng: &mut GameRng) -> (GameState, Handoff);

    /// Every legal action in the current state.
    ///
    /// Returns empty outside `AwaitingAction`.
    fn legal_actions(&self, state: &GameState) -> Vec<Action>;

    /// Apply an action for the active player.
    fn apply_action(
        &self,
        state: &mut GameState,
        action: &Action,
        rng: &mut GameRng,
    ) -> Result<Transition, FarkleError>;

    /// Close a banked or farkled round and start the next player's turn.
    fn acknowledge(&self, state: &mut GameState, rng: &mut GameRng) -> Result<Handoff, FarkleError>;

    /// Check if the game is over.
    ///
    /// Returns `Some(result)` if the game has ended, `None` if it continues.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult>;

    // === Convenience Methods ===

    /// Whether `action` would be accepted right now.
    fn is_legal(&self, state: &GameState, action: &Action) -> bool {
        check_phase(state).is_ok() && check_action(state, self.config(), action).is_ok()
    }
}

/// Standard Farkle rules.
#[derive(Clone, Debug, Default)]
pub struct FarkleRules {
    config: GameConfig,
}

impl FarkleRules {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    /// Move points from the turn record to the active player's bank.
    fn commit_turn(state: &mut GameState) -> u32 {
        let points = std::mem::take(&mut state.turn_points);
        let player = state.active_player;
        state.banked[player] += points;
        state.has_banked[player] = true;
        points
    }

    /// Pass the dice to the next seat and roll for them.
    fn pass_turn(&self, state: &mut GameState, rng: &mut GameRng) {
        state.active_player = state.active_player.next(state.player_count());
        state.turn_number += 1;
        state.turn_points = 0;
        state.phase = TurnPhase::AwaitingAction;
        state.dice = Dice::rolled(rng);
    }

    /// Keep passing while the opening roll has nothing to score.
    fn skip_farkled_openings(&self, state: &mut GameState, rng: &mut GameRng) -> Handoff {
        let mut skipped = SmallVec::new();
        while is_farkled(&state.dice) {
            log::debug!(
                "{} farkled on opening roll {}, turn {} skipped",
                state.active_player,
                state.dice,
                state.turn_number
            );
            skipped.push(state.active_player);
            self.pass_turn(state, rng);
        }

        Handoff {
            next_player: state.active_player,
            skipped,
        }
    }
}

impl RulesEngine for FarkleRules {
    fn config(&self) -> &GameConfig {
        &self.config
    }

    fn new_game(&self, rng: &mut GameRng) -> (GameState, Handoff) {
        let mut state = GameState::new(self.config.player_count, self.config.win_score, Dice::rolled(rng));
        let handoff = self.skip_farkled_openings(&mut state, rng);
        (state, handoff)
    }

    fn legal_actions(&self, state: &GameState) -> Vec<Action> {
        if state.phase != TurnPhase::AwaitingAction {
            return Vec::new();
        }

        let mut actions = Vec::new();
        let bank_only = Action::bank_only();
        if check_bank_legal(state, &self.config, &bank_only).is_ok() {
            actions.push(bank_only);
        }

        for mask in legal_lock_selections(&state.dice) {
            actions.push(Action::lock(mask));
            let banked = Action::lock_and_bank(mask);
            if check_bank_legal(state, &self.config, &banked).is_ok() {
                actions.push(banked);
            }
        }

        actions
    }

    fn apply_action(
        &self,
        state: &mut GameState,
        action: &Action,
        rng: &mut GameRng,
    ) -> Result<Transition, FarkleError> {
        check_phase(state)?;
        check_action(state, &self.config, action)?;

        let points = score(state.dice.values(), action.lock);
        log::trace!("{} locks {} from {} for {points}", state.active_player, action.lock, state.dice);

        state.dice.lock(action.lock);
        state.turn_points += points;
        state.record_action(*action, points);

        let player = state.active_player;
        if state.active_banked() + state.turn_points >= state.win_score {
            let points = Self::commit_turn(state);
            state.phase = TurnPhase::GameWon { winner: player };
            log::info!("{player} wins with {} (turn worth {points})", state.banked[player]);
            return Ok(Transition::Won { winner: player, points });
        }

        if action.bank {
            let points = Self::commit_turn(state);
            state.phase = TurnPhase::RoundBanked;
            log::debug!("{player} banks {points}, total {}", state.banked[player]);
            return Ok(Transition::Banked { points });
        }

        let hot_dice = state.dice.all_locked();
        if hot_dice {
            state.dice.reroll_all(rng);
            log::debug!("{player} has hot dice with {} on the turn", state.turn_points);
        } else {
            state.dice.roll_unlocked(rng);
        }

        if is_farkled(&state.dice) {
            let lost = std::mem::take(&mut state.turn_points);
            state.phase = TurnPhase::RoundFarkled;
            log::debug!("{player} farkled on {}, losing {lost}", state.dice);
            return Ok(Transition::Farkled { lost });
        }

        Ok(Transition::Continue { points, hot_dice })
    }

    fn acknowledge(&self, state: &mut GameState, rng: &mut GameRng) -> Result<Handoff, FarkleError> {
        match state.phase {
            TurnPhase::RoundFarkled | TurnPhase::RoundBanked => {}
            TurnPhase::AwaitingAction => return Err(FarkleError::NothingToAcknowledge),
            TurnPhase::GameWon { winner } => return Err(FarkleError::GameOver { winner }),
        }

        self.pass_turn(state, rng);
        let handoff = self.skip_farkled_openings(state, rng);
        log::debug!("turn {} passes to {}", state.turn_number, handoff.next_player);
        Ok(handoff)
    }

    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        state.winner().map(|winner| GameResult {
            winner,
            scores: state.banked.to_vec(),
        })
    }
}
