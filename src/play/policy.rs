//! Decision policies.
//!
//! A policy picks one action from the legal set each time its seat must act,
//! and is told the total reward at the end of each of its turns.

use crate::core::{Action, DiceMask, GameRng};
use crate::env::Observation;
use crate::scoring::score;

/// A seat at the table.
pub trait Policy {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Pick an action from `legal`. `None` only when `legal` is empty.
    fn choose(&mut self, observation: &Observation, legal: &[Action], rng: &mut GameRng) -> Option<Action>;

    /// Reward earned over the turn that just ended.
    fn update(&mut self, _reward: i32) {}
}

/// Distinct lock selections in `legal`, in first-seen order.
fn lock_masks(legal: &[Action]) -> Vec<DiceMask> {
    let mut masks: Vec<DiceMask> = Vec::new();
    for action in legal.iter().filter(|a| !a.lock.is_empty()) {
        if !masks.contains(&action.lock) {
            masks.push(action.lock);
        }
    }
    masks
}

/// Banking variant of `mask`, when legal.
fn bank_variant(legal: &[Action], mask: DiceMask) -> Option<Action> {
    let banked = Action::lock_and_bank(mask);
    legal.contains(&banked).then_some(banked)
}

/// Locks a uniformly random legal selection, then banks with a fixed
/// probability whenever banking is allowed.
#[derive(Clone, Debug)]
pub struct RandomPolicy {
    pub bank_probability: f64,
    total_reward: i64,
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl RandomPolicy {
    #[must_use]
    pub fn new(bank_probability: f64) -> Self {
        Self {
            bank_probability,
            total_reward: 0,
        }
    }

    /// Sum of all turn rewards received.
    #[must_use]
    pub fn total_reward(&self) -> i64 {
        self.total_reward
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn choose(&mut self, _observation: &Observation, legal: &[Action], rng: &mut GameRng) -> Option<Action> {
        let masks = lock_masks(legal);
        let Some(&mask) = rng.choose(&masks) else {
            return legal.first().copied();
        };

        match bank_variant(legal, mask) {
            Some(banked) if rng.gen_bool(self.bank_probability) => Some(banked),
            _ => Some(Action::lock(mask)),
        }
    }

    fn update(&mut self, reward: i32) {
        self.total_reward += i64::from(reward);
    }
}

/// Locks the highest-scoring selection (fewest dice on ties) and banks once
/// the turn is worth `bank_at`.
#[derive(Clone, Debug)]
pub struct GreedyPolicy {
    pub bank_at: u32,
}

impl Default for GreedyPolicy {
    fn default() -> Self {
        Self { bank_at: 500 }
    }
}

impl GreedyPolicy {
    #[must_use]
    pub fn new(bank_at: u32) -> Self {
        Self { bank_at }
    }

    pub fn with_bank_at(mut self, bank_at: u32) -> Self {
        self.bank_at = bank_at;
        self
    }
}

impl Policy for GreedyPolicy {
    fn name(&self) -> &str {
        "greedy"
    }

    fn choose(&mut self, observation: &Observation, legal: &[Action], _rng: &mut GameRng) -> Option<Action> {
        let best = lock_masks(legal)
            .into_iter()
            .map(|mask| (mask, score(&observation.dice_values, mask)))
            .max_by(|(a_mask, a_points), (b_mask, b_points)| {
                a_points.cmp(b_points).then_with(|| b_mask.len().cmp(&a_mask.len()))
            });

        let Some((mask, points)) = best else {
            return legal.first().copied();
        };

        if observation.turn_points + points >= self.bank_at {
            if let Some(banked) = bank_variant(legal, mask) {
                return Some(banked);
            }
        }
        Some(Action::lock(mask))
    }
}
