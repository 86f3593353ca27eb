//! # farkle-engine
//!
//! A Farkle dice game engine for scripted and learning agents.
//!
//! ## Design Principles
//!
//! 1. **Exact scoring**: A selection scores the best split into table
//!    patterns, matched by face counts. Position never matters.
//!
//! 2. **Validate, then mutate**: Every rejected call leaves the game exactly
//!    as it was.
//!
//! 3. **Deterministic**: All dice come from one seeded `GameRng`, so a seed
//!    reproduces a game and a snapshot resumes it.
//!
//! ## Architecture
//!
//! - **Shared tables**: The combination table and a fully prewarmed scoring
//!   cache are built once per process.
//!
//! - **Two-phase turn end**: A bank or farkle parks the game until the caller
//!   acknowledges it, so the final reward of a turn is always observable.
//!
//! - **Persistent Data Structures**: O(1) cloning of action history via `im-rs`.
//!
//! ## Modules
//!
//! - `core`: Dice, players, state, actions, RNG, configuration, errors
//! - `scoring`: Combination table, decomposition scoring, farkle detection
//! - `rules`: Action legality and the `RulesEngine` turn state machine
//! - `env`: Reset/step environment with observations and rewards
//! - `play`: Reference policies and a game controller

pub mod core;
pub mod env;
pub mod play;
pub mod rules;
pub mod scoring;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, BankRule, Dice, DiceMask, FaceCounts, FarkleError, GameConfig, GameRng,
    GameRngState, GameState, LockViolation, PlayerId, PlayerMap, TurnPhase,
};

pub use crate::scoring::{is_farkled, legal_lock_selections, score, verify_full_decomposition};

pub use crate::rules::{FarkleRules, GameResult, Handoff, RulesEngine, Transition};

pub use crate::env::{FarkleEnv, Info, Observation, ReducedObservation, StepResult};

pub use crate::play::{Controller, GameOutcome, GreedyPolicy, Policy, RandomPolicy};
