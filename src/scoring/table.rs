//! The combination table: every scoring pattern, grouped by dice consumed.
//!
//! | Pattern                      | Dice | Points        |
//! |------------------------------|------|---------------|
//! | single 1                     | 1    | 100           |
//! | single 5                     | 1    | 50            |
//! | three of a kind              | 3    | 300 for 1s, face x 100 otherwise |
//! | four of a kind               | 4    | 1000          |
//! | five of a kind               | 5    | 2000          |
//! | six of a kind                | 6    | 3000          |
//! | three distinct pairs         | 6    | 1500          |
//! | two distinct triples         | 6    | 2500          |
//! | four of a kind + other pair  | 6    | 1500          |
//! | straight 1-6                 | 6    | 1500          |
//!
//! Pairs never score on their own, and neither do single 2s, 3s, 4s or 6s,
//! so none of them appear in the table.
//!
//! The standard table is built once per process and shared by reference.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

use crate::core::{FaceCounts, DICE_COUNT};

/// What shape of dice a combination is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombinationKind {
    Single,
    ThreeOfAKind,
    FourOfAKind,
    FiveOfAKind,
    SixOfAKind,
    ThreePairs,
    TwoTriples,
    FourWithPair,
    Straight,
}

/// One scoring pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Combination {
    pub kind: CombinationKind,
    /// Dice the pattern consumes.
    pub counts: FaceCounts,
    pub points: u32,
}

impl Combination {
    #[must_use]
    pub fn new(kind: CombinationKind, counts: FaceCounts, points: u32) -> Self {
        Self { kind, counts, points }
    }

    /// Number of dice the pattern consumes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.counts.total()
    }
}

impl std::fmt::Display for Combination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {} = {}", self.kind, self.counts, self.points)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("duplicate {size}-dice pattern {pattern}")]
    DuplicatePattern { size: usize, pattern: FaceCounts },
    #[error("pattern {pattern} must use 1-6 dice")]
    BadSize { pattern: FaceCounts },
    #[error("pattern {pattern} scores zero")]
    ZeroValue { pattern: FaceCounts },
}

/// Scoring patterns grouped by size. Immutable once built.
#[derive(Clone, Debug)]
pub struct CombinationTable {
    /// `groups[n - 1]` holds the patterns consuming `n` dice.
    groups: [Vec<Combination>; DICE_COUNT],
}

impl CombinationTable {
    /// Build a table, rejecting malformed or duplicate patterns.
    pub fn from_combinations(
        combinations: impl IntoIterator<Item = Combination>,
    ) -> Result<Self, TableError> {
        let mut groups: [Vec<Combination>; DICE_COUNT] = Default::default();

        for combo in combinations {
            let size = combo.size();
            if !(1..=DICE_COUNT).contains(&size) {
                return Err(TableError::BadSize { pattern: combo.counts });
            }
            if combo.points == 0 {
                return Err(TableError::ZeroValue { pattern: combo.counts });
            }

            let group = &mut groups[size - 1];
            if group.iter().any(|c| c.counts == combo.counts) {
                return Err(TableError::DuplicatePattern {
                    size,
                    pattern: combo.counts,
                });
            }
            group.push(combo);
        }

        Ok(Self { groups })
    }

    /// The standard Farkle table.
    #[must_use]
    pub fn standard() -> Self {
        // Generated patterns are pairwise distinct by construction.
        Self::from_combinations(standard_combinations())
            .expect("standard combinations contain no duplicates")
    }

    /// Patterns consuming exactly `size` dice. Empty outside `1..=6`.
    #[must_use]
    pub fn lookup(&self, size: usize) -> &[Combination] {
        match size {
            1..=DICE_COUNT => self.groups[size - 1].as_slice(),
            _ => &[],
        }
    }

    /// All patterns, largest groups first.
    pub fn iter(&self) -> impl Iterator<Item = &Combination> {
        self.groups.iter().rev().flatten()
    }

    /// Total number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The pattern with exactly these dice, if any.
    #[must_use]
    pub fn find(&self, counts: &FaceCounts) -> Option<&Combination> {
        self.lookup(counts.total()).iter().find(|c| &c.counts == counts)
    }
}

/// The process-wide standard table.
pub fn standard_table() -> &'static CombinationTable {
    static TABLE: OnceLock<CombinationTable> = OnceLock::new();
    TABLE.get_or_init(CombinationTable::standard)
}

fn standard_combinations() -> Vec<Combination> {
    use CombinationKind::*;

    let faces = 1..=6u8;
    let mut out = vec![
        Combination::new(Single, FaceCounts::of_a_kind(1, 1), 100),
        Combination::new(Single, FaceCounts::of_a_kind(5, 1), 50),
    ];

    for face in faces.clone() {
        let triple = if face == 1 { 300 } else { u32::from(face) * 100 };
        out.push(Combination::new(ThreeOfAKind, FaceCounts::of_a_kind(face, 3), triple));
        out.push(Combination::new(FourOfAKind, FaceCounts::of_a_kind(face, 4), 1000));
        out.push(Combination::new(FiveOfAKind, FaceCounts::of_a_kind(face, 5), 2000));
        out.push(Combination::new(SixOfAKind, FaceCounts::of_a_kind(face, 6), 3000));
    }

    for a in faces.clone() {
        for b in faces.clone().filter(|&b| b != a) {
            let four_and_pair = FaceCounts::of_a_kind(a, 4).add(&FaceCounts::of_a_kind(b, 2));
            out.push(Combination::new(FourWithPair, four_and_pair, 1500));

            if b > a {
                let triples = FaceCounts::of_a_kind(a, 3).add(&FaceCounts::of_a_kind(b, 3));
                out.push(Combination::new(TwoTriples, triples, 2500));

                for c in (b + 1)..=6 {
                    let pairs = FaceCounts::new(std::array::from_fn(|i| {
                        let face = i as u8 + 1;
                        if face == a || face == b || face == c {
                            2
                        } else {
                            0
                        }
                    }));
                    out.push(Combination::new(ThreePairs, pairs, 1500));
                }
            }
        }
    }

    out.push(Combination::new(Straight, FaceCounts::new([1; 6]), 1500));
    out
}
