//! Farkle rules: action legality and the turn state machine.
//!
//! `legal` holds pure checks over a state snapshot. `engine` drives the turn
//! lifecycle through the `RulesEngine` trait and never touches state before
//! an action has been validated.

pub mod engine;
pub mod legal;

pub use engine::{FarkleRules, GameResult, Handoff, RulesEngine, Transition};
pub use legal::{check_action, check_bank_legal, check_lock_legal, check_phase, check_state};
