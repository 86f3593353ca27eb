//! Game state: everything needed to resume a game at any point.
//!
//! ## GameState
//!
//! - Dice values and lock flags
//! - Banked totals and first-bank flags per player
//! - Active player and the points earned so far this turn
//! - Current phase of the turn state machine
//! - Action history
//!
//! The state is a plain record. Rules transitions (`crate::rules`) are the
//! only code that mutates it during play.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::{Action, ActionRecord};
use super::dice::Dice;
use super::error::FarkleError;
use super::player::{PlayerId, PlayerMap};

/// Where the active turn stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Dice are rolled and the active player must lock and/or bank.
    AwaitingAction,
    /// The last roll had no scoring dice; the turn is lost.
    RoundFarkled,
    /// The active player banked; points are committed.
    RoundBanked,
    /// Terminal: `winner` reached the win score.
    GameWon { winner: PlayerId },
}

impl TurnPhase {
    /// A finished round waiting for acknowledgment.
    #[must_use]
    pub const fn is_round_over(self) -> bool {
        matches!(self, TurnPhase::RoundFarkled | TurnPhase::RoundBanked)
    }
}

/// Complete game state.
///
/// Uses `im::Vector` for history so cloning a state for lookahead is O(1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// The six dice.
    pub dice: Dice,

    /// Banked total per player. Never decreases.
    pub banked: PlayerMap<u32>,

    /// Whether each player has banked at least once.
    pub has_banked: PlayerMap<bool>,

    /// Whose turn it is.
    pub active_player: PlayerId,

    /// Points earned this turn and not yet banked.
    pub turn_points: u32,

    /// Banked total that wins the game.
    pub win_score: u32,

    pub phase: TurnPhase,

    /// Turn number (starts at 1, increments at every hand-off).
    pub turn_number: u32,

    /// Actions applied so far in the game.
    pub action_sequence: u32,

    /// Every applied action in order.
    pub history: Vector<ActionRecord>,
}

impl GameState {
    /// Create a state at the start of player 0's first turn.
    #[must_use]
    pub fn new(player_count: usize, win_score: u32, dice: Dice) -> Self {
        Self {
            dice,
            banked: PlayerMap::with_default(player_count),
            has_banked: PlayerMap::with_default(player_count),
            active_player: PlayerId::new(0),
            turn_points: 0,
            win_score,
            phase: TurnPhase::AwaitingAction,
            turn_number: 1,
            action_sequence: 0,
            history: Vector::new(),
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.banked.player_count()
    }

    /// Banked total of the active player.
    #[must_use]
    pub fn active_banked(&self) -> u32 {
        self.banked[self.active_player]
    }

    /// The winner, once the game is over.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self.phase {
            TurnPhase::GameWon { winner } => Some(winner),
            _ => None,
        }
    }

    /// Record an action in history, assigning the next sequence number.
    pub fn record_action(&mut self, action: Action, points: u32) {
        let record = ActionRecord::new(
            self.active_player,
            action,
            self.turn_number,
            self.action_sequence,
            points,
        );
        self.history.push_back(record);
        self.action_sequence += 1;
    }

    /// Check that the fields agree with each other.
    ///
    /// Rejects dice off the `1..=6` range, seats past the player count and
    /// unbanked points outside `AwaitingAction`. Whether the state fits a
    /// particular config is checked by `rules::check_state`.
    pub fn validate(&self) -> Result<(), FarkleError> {
        let players = self.player_count();
        let invalid = |reason: String| Err(FarkleError::InvalidState { reason });

        if players == 0 || self.has_banked.player_count() != players {
            return invalid(format!(
                "{} banked totals but {} first-bank flags",
                players,
                self.has_banked.player_count()
            ));
        }
        if !self.dice.is_valid() {
            return invalid(format!("dice out of range: {:?}", self.dice));
        }
        if self.active_player.index() >= players {
            return invalid(format!("{} is not seated in a {players}-player game", self.active_player));
        }
        if let TurnPhase::GameWon { winner } = self.phase {
            if winner.index() >= players {
                return invalid(format!("winner {winner} is not seated in a {players}-player game"));
            }
        }
        if self.phase != TurnPhase::AwaitingAction && self.turn_points != 0 {
            return invalid(format!("{} unbanked points in {:?}", self.turn_points, self.phase));
        }
        Ok(())
    }
}
