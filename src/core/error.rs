//! Engine error types.
//!
//! Every error here is raised before any state mutation: a rejected call
//! leaves the game exactly as it was, so callers can surface the error to the
//! acting player and ask again.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::PlayerId;
use super::state::TurnPhase;

/// Why a lock selection was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum LockViolation {
    #[error("die {die} is already locked")]
    AlreadyLocked { die: usize },
    #[error("an action must lock at least one die or bank")]
    NothingLocked,
    #[error("selected dice do not split exactly into scoring combinations")]
    NotACombination,
    #[error("selected dice score no points")]
    ZeroScore,
}

#[derive(Debug, Error)]
pub enum FarkleError {
    /// Malformed action shape (wrong length, bad characters).
    #[error("malformed action: {reason}")]
    Validation { reason: String },

    #[error("illegal lock: {0}")]
    IllegalLock(#[from] LockViolation),

    #[error("cannot bank {total} points, minimum is {minimum}")]
    IllegalBank { total: u32, minimum: u32 },

    /// An action arrived while a finished round awaits acknowledgment.
    #[error("round ended ({phase:?}); acknowledge before acting")]
    Precedence { phase: TurnPhase },

    #[error("no finished round to acknowledge")]
    NothingToAcknowledge,

    #[error("game is over, {winner} won")]
    GameOver { winner: PlayerId },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// A supplied or restored state that play could never reach.
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },

    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),
}

impl FarkleError {
    /// True for errors a player can fix by choosing a different action.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FarkleError::Validation { .. } | FarkleError::IllegalLock(_) | FarkleError::IllegalBank { .. }
        )
    }
}
