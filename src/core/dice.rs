//! Dice, lock selections and face-count signatures.
//!
//! ## Dice
//!
//! Six positional dice, each with a value in `1..=6` and a locked flag.
//! Locked dice keep their value across rerolls until the whole set is reset
//! (new round or hot dice).
//!
//! ## DiceMask
//!
//! A selection of die positions packed into the low six bits of a `u8`.
//! Used both for lock flags and for the lock part of an action.
//!
//! ## FaceCounts
//!
//! Position-free signature of a multiset of dice: how many of each face.
//! Scoring works exclusively on counts, so it is permutation-invariant by
//! construction.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use super::rng::GameRng;

/// Number of dice in play.
pub const DICE_COUNT: usize = 6;

/// Number of faces on each die.
pub const FACES: usize = 6;

/// Selection of die positions (bit `i` = die `i`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiceMask(u8);

impl DiceMask {
    /// No dice selected.
    pub const EMPTY: Self = Self(0);

    /// All six dice selected.
    pub const ALL: Self = Self(0b11_1111);

    /// Create a mask from raw bits. Bits above the sixth are dropped.
    #[must_use]
    pub const fn new(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Create a mask from per-die flags.
    #[must_use]
    pub fn from_flags(flags: [bool; DICE_COUNT]) -> Self {
        flags
            .iter()
            .enumerate()
            .filter(|&(_, &set)| set)
            .fold(Self::EMPTY, |mask, (i, _)| mask.with(i))
    }

    /// Create a mask from die positions.
    ///
    /// ```
    /// use farkle_engine::core::DiceMask;
    ///
    /// let mask = DiceMask::from_indices(&[0, 3]);
    /// assert!(mask.contains(0));
    /// assert!(mask.contains(3));
    /// assert_eq!(mask.len(), 2);
    /// ```
    #[must_use]
    pub fn from_indices(indices: &[usize]) -> Self {
        indices.iter().fold(Self::EMPTY, |mask, &i| mask.with(i))
    }

    /// Copy of this mask with `die` added. Positions `>= 6` are ignored.
    #[must_use]
    pub const fn with(self, die: usize) -> Self {
        if die < DICE_COUNT {
            Self(self.0 | (1 << die))
        } else {
            self
        }
    }

    /// Is `die` in this selection?
    #[must_use]
    pub const fn contains(self, die: usize) -> bool {
        die < DICE_COUNT && (self.0 >> die) & 1 == 1
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of selected dice.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Dice in `self` but not in `other`.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Every die of `self` is also in `other`.
    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// Iterate over selected positions in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..DICE_COUNT).filter(move |&i| self.contains(i))
    }

    /// Expand into per-die flags.
    #[must_use]
    pub fn to_flags(self) -> [bool; DICE_COUNT] {
        std::array::from_fn(|i| self.contains(i))
    }

    /// Iterate over every nonempty sub-selection of this mask, ascending.
    pub fn subsets(self) -> impl Iterator<Item = Self> {
        (1..=Self::ALL.0)
            .map(DiceMask)
            .filter(move |m| m.is_subset(self))
    }
}

impl fmt::Display for DiceMask {
    /// Renders die 0 first: `"100001"` selects the first and last die.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..DICE_COUNT {
            f.write_str(if self.contains(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Count of each face value among some dice. Index 0 holds the count of 1s.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FaceCounts([u8; FACES]);

impl FaceCounts {
    /// No dice.
    pub const EMPTY: Self = Self([0; FACES]);

    /// Create from raw counts, index 0 = count of 1s.
    #[must_use]
    pub const fn new(counts: [u8; FACES]) -> Self {
        Self(counts)
    }

    /// Count faces in a list of die values.
    ///
    /// Values outside `1..=6` are ignored.
    #[must_use]
    pub fn from_values(values: &[u8]) -> Self {
        let mut counts = [0u8; FACES];
        for &v in values {
            if (1..=FACES as u8).contains(&v) {
                counts[usize::from(v) - 1] += 1;
            }
        }
        Self(counts)
    }

    /// `n` dice all showing `face`.
    #[must_use]
    pub fn of_a_kind(face: u8, n: u8) -> Self {
        let mut counts = [0u8; FACES];
        counts[usize::from(face) - 1] = n;
        Self(counts)
    }

    /// Count of dice showing `face` (1-based).
    #[must_use]
    pub fn count(&self, face: u8) -> u8 {
        self.0[usize::from(face) - 1]
    }

    /// Raw counts.
    #[must_use]
    pub const fn as_array(&self) -> &[u8; FACES] {
        &self.0
    }

    /// Total number of dice.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().map(|&c| usize::from(c)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    /// Can `other` be taken out of these dice?
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(have, need)| have >= need)
    }

    /// Remove `other` from these dice, or `None` if it does not fit.
    #[must_use]
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        if !self.contains(other) {
            return None;
        }
        Some(Self(std::array::from_fn(|i| self.0[i] - other.0[i])))
    }

    /// Sum of two multisets.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] + other.0[i]))
    }

    /// Dice values in ascending order, the canonical sorted signature.
    #[must_use]
    pub fn sorted_values(&self) -> SmallVec<[u8; DICE_COUNT]> {
        let mut out = SmallVec::new();
        for (i, &c) in self.0.iter().enumerate() {
            for _ in 0..c {
                out.push(i as u8 + 1);
            }
        }
        out
    }
}

impl fmt::Display for FaceCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.sorted_values().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("]")
    }
}

/// The six dice on the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dice {
    values: [u8; DICE_COUNT],
    locked: DiceMask,
}

impl Dice {
    /// Create unlocked dice with the given values.
    ///
    /// # Panics
    ///
    /// Panics if a value is outside `1..=6`.
    #[must_use]
    pub fn new(values: [u8; DICE_COUNT]) -> Self {
        Self::with_locked(values, DiceMask::EMPTY)
    }

    /// Create dice with explicit lock flags.
    ///
    /// # Panics
    ///
    /// Panics if a value is outside `1..=6`.
    #[must_use]
    pub fn with_locked(values: [u8; DICE_COUNT], locked: DiceMask) -> Self {
        let dice = Self { values, locked };
        assert!(dice.is_valid(), "Die values must be in 1..=6");
        dice
    }

    /// Roll six fresh, unlocked dice.
    #[must_use]
    pub fn rolled(rng: &mut GameRng) -> Self {
        Self {
            values: std::array::from_fn(|_| rng.roll_die()),
            locked: DiceMask::EMPTY,
        }
    }

    /// Every value is in `1..=6` and only real positions are locked.
    ///
    /// Always true for dice built here; deserialized dice skip the
    /// constructor check.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.values.iter().all(|v| (1..=FACES as u8).contains(v)) && self.locked.is_subset(DiceMask::ALL)
    }

    #[must_use]
    pub const fn values(&self) -> &[u8; DICE_COUNT] {
        &self.values
    }

    #[must_use]
    pub const fn locked(&self) -> DiceMask {
        self.locked
    }

    /// Positions still free to roll or lock.
    #[must_use]
    pub const fn unlocked(&self) -> DiceMask {
        DiceMask::ALL.difference(self.locked)
    }

    /// Hot dice: every die is locked.
    #[must_use]
    pub const fn all_locked(&self) -> bool {
        self.locked.bits() == DiceMask::ALL.bits()
    }

    /// Face counts of the dice in `mask`.
    #[must_use]
    pub fn counts(&self, mask: DiceMask) -> FaceCounts {
        let mut counts = FaceCounts::EMPTY;
        for i in mask.iter() {
            counts = counts.add(&FaceCounts::of_a_kind(self.values[i], 1));
        }
        counts
    }

    /// Face counts of the unlocked dice.
    #[must_use]
    pub fn unlocked_counts(&self) -> FaceCounts {
        self.counts(self.unlocked())
    }

    /// Mark dice as locked.
    pub fn lock(&mut self, mask: DiceMask) {
        self.locked = self.locked.union(mask);
    }

    /// Release every lock without changing values.
    pub fn unlock_all(&mut self) {
        self.locked = DiceMask::EMPTY;
    }

    /// Give every unlocked die a new value.
    pub fn roll_unlocked(&mut self, rng: &mut GameRng) {
        for i in self.unlocked().iter() {
            self.values[i] = rng.roll_die();
        }
    }

    /// Unlock and reroll all six dice.
    pub fn reroll_all(&mut self, rng: &mut GameRng) {
        self.unlock_all();
        self.roll_unlocked(rng);
    }
}

impl fmt::Display for Dice {
    /// Locked dice are shown in brackets: `1 [5] 3 4 [5] 6`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if self.locked.contains(i) {
                write!(f, "[{v}]")?;
            } else {
                write!(f, "{v}")?;
            }
        }
        Ok(())
    }
}
