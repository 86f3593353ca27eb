//! Farkle scoring: the combination table, decomposition scoring and farkle
//! detection.
//!
//! Everything here is a pure function of dice values. The standard table and
//! a prewarmed engine are shared process-wide.

pub mod engine;
pub mod farkle;
pub mod table;

pub use engine::{
    best_decomposition, fully_decomposes, score, score_counts, selected_counts, standard_engine,
    verify_full_decomposition, Evaluation, ScoringEngine,
};
pub use farkle::{is_farkled, legal_lock_selections};
pub use table::{standard_table, Combination, CombinationKind, CombinationTable, TableError};
