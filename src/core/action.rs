//! Action representation: a lock selection plus a bank flag.
//!
//! Every decision in Farkle is "set these dice aside, then either roll the
//! rest or bank". The lock part names only dice that are currently
//! unlocked; the bank part ends the turn and keeps the accumulated points.

use serde::{Deserialize, Serialize};

use super::dice::{DiceMask, DICE_COUNT};
use super::error::FarkleError;
use super::player::PlayerId;

/// A complete player decision.
///
/// ## Example
///
/// ```
/// use farkle_engine::core::{Action, DiceMask};
///
/// // Set aside the first die and keep rolling
/// let keep_going = Action::lock(DiceMask::from_indices(&[0]));
///
/// // Set aside two dice and bank
/// let stop = Action::lock_and_bank(DiceMask::from_indices(&[0, 4]));
///
/// // Parse the "010011" text form used by prompts
/// let parsed = Action::parse("100010", true).unwrap();
/// assert_eq!(parsed, stop);
/// # let _ = keep_going;
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    /// Dice to lock this step.
    pub lock: DiceMask,

    /// End the turn after locking.
    pub bank: bool,
}

impl Action {
    /// Lock dice and roll the rest.
    #[must_use]
    pub const fn lock(lock: DiceMask) -> Self {
        Self { lock, bank: false }
    }

    /// Lock dice, then bank.
    #[must_use]
    pub const fn lock_and_bank(lock: DiceMask) -> Self {
        Self { lock, bank: true }
    }

    /// Bank the points already earned this turn.
    #[must_use]
    pub const fn bank_only() -> Self {
        Self {
            lock: DiceMask::EMPTY,
            bank: true,
        }
    }

    /// Build an action from a per-die flag slice.
    ///
    /// Fails with `Validation` if the slice does not have one flag per die.
    pub fn from_flags(flags: &[bool], bank: bool) -> Result<Self, FarkleError> {
        let flags: [bool; DICE_COUNT] = flags.try_into().map_err(|_| FarkleError::Validation {
            reason: format!("expected {DICE_COUNT} lock flags, got {}", flags.len()),
        })?;
        Ok(Self {
            lock: DiceMask::from_flags(flags),
            bank,
        })
    }

    /// Parse a lock string of `0`/`1` characters, die 0 first.
    pub fn parse(lock: &str, bank: bool) -> Result<Self, FarkleError> {
        let lock = lock.trim();
        if lock.chars().count() != DICE_COUNT {
            return Err(FarkleError::Validation {
                reason: format!("lock string must have {DICE_COUNT} characters, got {:?}", lock),
            });
        }

        let mut mask = DiceMask::EMPTY;
        for (i, c) in lock.chars().enumerate() {
            match c {
                '1' => mask = mask.with(i),
                '0' => {}
                other => {
                    return Err(FarkleError::Validation {
                        reason: format!("lock string may only contain '0' and '1', found {other:?}"),
                    })
                }
            }
        }

        Ok(Self { lock: mask, bank })
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lock {}", self.lock)?;
        if self.bank {
            f.write_str(" + bank")?;
        }
        Ok(())
    }
}

/// A recorded action with metadata for history tracking.
///
/// Used for replay, debugging and training data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Turn number when the action was taken.
    pub turn: u32,

    /// Sequence number within the game (for ordering).
    pub sequence: u32,

    /// Points the lock selection scored.
    pub points: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32, sequence: u32, points: u32) -> Self {
        Self {
            player,
            action,
            turn,
            sequence,
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let mask = DiceMask::from_indices(&[2]);
        assert!(!Action::lock(mask).bank);
        assert!(Action::lock_and_bank(mask).bank);
        assert!(Action::bank_only().lock.is_empty());
        assert!(Action::bank_only().bank);
    }

    #[test]
    fn test_from_flags() {
        let action = Action::from_flags(&[true, false, false, false, false, true], false).unwrap();
        assert_eq!(action.lock, DiceMask::from_indices(&[0, 5]));

        let err = Action::from_flags(&[true, false], false).unwrap_err();
        assert!(matches!(err, FarkleError::Validation { .. }));
    }

    #[test]
    fn test_parse() {
        let action = Action::parse("010011", false).unwrap();
        assert_eq!(action.lock, DiceMask::from_indices(&[1, 4, 5]));
        assert_eq!(action.to_string(), "lock 010011");

        assert!(Action::parse(" 000000\n", true).is_ok());
        assert!(matches!(Action::parse("0100", false), Err(FarkleError::Validation { .. })));
        assert!(matches!(Action::parse("01002x", false), Err(FarkleError::Validation { .. })));
    }

    #[test]
    fn test_display_bank() {
        assert_eq!(Action::bank_only().to_string(), "lock 000000 + bank");
    }

    #[test]
    fn test_action_record_serialization() {
        let action = Action::lock(DiceMask::from_indices(&[0, 1, 2]));
        let record = ActionRecord::new(PlayerId::new(1), action, 2, 3, 300);

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: ActionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, deserialized);
    }
}
