//! Core engine types: dice, players, state, actions, RNG, configuration, errors.
//!
//! These are plain data types with no rules knowledge. Scoring lives in
//! `crate::scoring` and turn transitions in `crate::rules`.

pub mod action;
pub mod config;
pub mod dice;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Action, ActionRecord};
pub use config::{BankRule, GameConfig};
pub use dice::{Dice, DiceMask, FaceCounts, DICE_COUNT, FACES};
pub use error::{FarkleError, LockViolation};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{GameState, TurnPhase};
