//! What an agent sees after each call into the environment.

use serde::{Deserialize, Serialize};

use crate::core::{DiceMask, GameState, PlayerId, DICE_COUNT};

/// Full view of the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub dice_values: [u8; DICE_COUNT],
    pub dice_locked: [bool; DICE_COUNT],
    /// Banked totals, indexed by player.
    pub player_scores: Vec<u32>,
    pub active_player: usize,
    /// Unbanked points of the active turn.
    pub turn_points: u32,
}

impl Observation {
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        Self {
            dice_values: *state.dice.values(),
            dice_locked: state.dice.locked().to_flags(),
            player_scores: state.banked.to_vec(),
            active_player: state.active_player.index(),
            turn_points: state.turn_points,
        }
    }

    /// Lock flags as a mask.
    #[must_use]
    pub fn locked_mask(&self) -> DiceMask {
        DiceMask::from_flags(self.dice_locked)
    }

    /// Order-free view of the dice: locked dice become 0 and everything is
    /// sorted ascending, so equivalent rolls look identical.
    ///
    /// ```
    /// use farkle_engine::env::Observation;
    ///
    /// let obs = Observation {
    ///     dice_values: [5, 2, 1, 6, 1, 3],
    ///     dice_locked: [false, false, true, false, false, false],
    ///     player_scores: vec![0, 0],
    ///     active_player: 0,
    ///     turn_points: 100,
    /// };
    /// assert_eq!(obs.reduced().dice_values, [0, 1, 2, 3, 5, 6]);
    /// ```
    #[must_use]
    pub fn reduced(&self) -> ReducedObservation {
        let key = |i: usize| if self.dice_locked[i] { 0 } else { self.dice_values[i] };

        let mut positions: [usize; DICE_COUNT] = std::array::from_fn(|i| i);
        positions.sort_by_key(|&i| key(i));

        ReducedObservation {
            dice_values: positions.map(key),
            positions,
            player_scores: self.player_scores.clone(),
            active_player: self.active_player,
            turn_points: self.turn_points,
        }
    }

    /// Flat feature vector, scores normalized by `win_score`.
    ///
    /// Layout: per die `value / 6` and `locked`, then per player the
    /// normalized score and an active-player indicator, then the normalized
    /// turn points. Length is `2 * 6 + 2 * players + 1`.
    #[must_use]
    pub fn features(&self, win_score: u32) -> Vec<f32> {
        let scale = win_score.max(1) as f32;
        let mut out = Vec::with_capacity(2 * DICE_COUNT + 2 * self.player_scores.len() + 1);

        for (&value, &locked) in self.dice_values.iter().zip(&self.dice_locked) {
            out.push(f32::from(value) / 6.0);
            out.push(if locked { 1.0 } else { 0.0 });
        }

        for (idx, &score) in self.player_scores.iter().enumerate() {
            out.push((score as f32 / scale).clamp(0.0, 1.0));
            out.push(if idx == self.active_player { 1.0 } else { 0.0 });
        }

        out.push((self.turn_points as f32 / scale).clamp(0.0, 1.0));
        out
    }
}

/// Dice sorted by value with locked dice shown as 0.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReducedObservation {
    pub dice_values: [u8; DICE_COUNT],
    /// `positions[i]` is the real die behind reduced slot `i`.
    pub positions: [usize; DICE_COUNT],
    pub player_scores: Vec<u32>,
    pub active_player: usize,
    pub turn_points: u32,
}

impl ReducedObservation {
    /// Translate a selection over reduced slots into real die positions.
    #[must_use]
    pub fn to_lock(&self, reduced: DiceMask) -> DiceMask {
        reduced
            .iter()
            .fold(DiceMask::EMPTY, |mask, slot| mask.with(self.positions[slot]))
    }
}

/// Side information for a step, reset or acknowledgment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// The last roll ended the turn with no scoring dice.
    pub farkled: bool,
    /// All six dice were locked and rerolled.
    pub hot_dice: bool,
    pub winner: Option<PlayerId>,
    /// Players whose opening roll farkled before play resumed.
    pub skipped: Vec<PlayerId>,
}

/// Outcome of one `step`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub observation: Observation,
    /// 0 while the turn continues or on a win, -1 when it ends by bank or farkle.
    pub reward: i32,
    /// The game has a winner.
    pub terminated: bool,
    /// The step limit was reached without a winner.
    pub truncated: bool,
    pub info: Info,
}
