//! Episodic environment: reset, step, acknowledge, observations and rewards.

pub mod environment;
pub mod observation;

pub use environment::{FarkleEnv, REWARD_NEUTRAL, REWARD_TURN_END};
pub use observation::{Info, Observation, ReducedObservation, StepResult};
