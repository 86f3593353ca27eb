//! Reference policies and a controller that plays complete games.

pub mod controller;
pub mod policy;

pub use controller::{Controller, GameOutcome};
pub use policy::{GreedyPolicy, Policy, RandomPolicy};
