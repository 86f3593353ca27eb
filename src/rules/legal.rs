//! Action legality.
//!
//! Pure checks against a state snapshot. Each returns the first violation
//! found; none of them touch the state.

use crate::core::{Action, BankRule, FarkleError, GameConfig, GameState, LockViolation, TurnPhase};
use crate::scoring::{is_farkled, selected_counts, standard_engine};

/// Actions are only accepted while the active player is awaiting one.
///
/// A finished round must be acknowledged first; a won game accepts nothing.
pub fn check_phase(state: &GameState) -> Result<(), FarkleError> {
    match state.phase {
        TurnPhase::AwaitingAction => Ok(()),
        TurnPhase::GameWon { winner } => Err(FarkleError::GameOver { winner }),
        phase => Err(FarkleError::Precedence { phase }),
    }
}

/// Validate the lock part of `action`.
///
/// - No selected die may already be locked.
/// - A nonempty selection must split exactly into scoring patterns.
/// - An empty selection is only allowed together with a bank.
pub fn check_lock_legal(state: &GameState, action: &Action) -> Result<(), FarkleError> {
    let already = action.lock.intersection(state.dice.locked());
    if let Some(die) = already.iter().next() {
        return Err(LockViolation::AlreadyLocked { die }.into());
    }

    if action.lock.is_empty() {
        return if action.bank {
            Ok(())
        } else {
            Err(LockViolation::NothingLocked.into())
        };
    }

    let eval = standard_engine().evaluation(&selected_counts(state.dice.values(), action.lock));
    if !eval.full {
        return Err(LockViolation::NotACombination.into());
    }
    if eval.best == 0 {
        return Err(LockViolation::ZeroScore.into());
    }
    Ok(())
}

/// Validate the bank part of `action`. Always passes when `bank` is false.
pub fn check_bank_legal(state: &GameState, config: &GameConfig, action: &Action) -> Result<(), FarkleError> {
    if !action.bank {
        return Ok(());
    }

    let lock_points = standard_engine()
        .evaluation(&selected_counts(state.dice.values(), action.lock))
        .best;
    let turn_total = state.turn_points + lock_points;

    let total = match config.bank_rule {
        BankRule::FirstBankOnly if state.has_banked[state.active_player] => return Ok(()),
        BankRule::FirstBankOnly => state.active_banked() + turn_total,
        BankRule::EveryBank => turn_total,
    };

    if total < config.min_bank_score {
        return Err(FarkleError::IllegalBank {
            total,
            minimum: config.min_bank_score,
        });
    }
    Ok(())
}

/// Check that `state` can be played under `config`.
///
/// Beyond `GameState::validate`, the seat count and win score must match
/// `config`, and a player awaiting an action must have something to lock.
pub fn check_state(state: &GameState, config: &GameConfig) -> Result<(), FarkleError> {
    state.validate()?;

    if state.player_count() != config.player_count {
        return Err(FarkleError::InvalidConfig {
            reason: format!(
                "state has {} players but config expects {}",
                state.player_count(),
                config.player_count
            ),
        });
    }
    if state.win_score != config.win_score {
        return Err(FarkleError::InvalidConfig {
            reason: format!(
                "state plays to {} but config plays to {}",
                state.win_score, config.win_score
            ),
        });
    }
    if state.phase == TurnPhase::AwaitingAction && is_farkled(&state.dice) {
        return Err(FarkleError::InvalidState {
            reason: format!("{} awaits an action on farkled dice {}", state.active_player, state.dice),
        });
    }
    Ok(())
}

/// Lock check, then bank check.
pub fn check_action(state: &GameState, config: &GameConfig, action: &Action) -> Result<(), FarkleError> {
    check_lock_legal(state, action)?;
    check_bank_legal(state, config, action)
}
