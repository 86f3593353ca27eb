//! Scoring by recursive decomposition.
//!
//! A selection of dice scores the best total over every way of splitting it
//! into non-overlapping table patterns. Patterns are matched by face counts
//! (a pattern fits when it is a sub-multiset of the remaining dice), so die
//! positions never matter.
//!
//! For each face-count vector the engine records two facts:
//!
//! - `best`: the maximum points, where dice outside any pattern score 0
//! - `full`: whether some split uses every die
//!
//! Results are memoized per count vector. The shared engine is prewarmed for
//! every vector of at most six dice, so lookups during play never recurse.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::sync::OnceLock;

use crate::core::{DiceMask, FaceCounts, DICE_COUNT, FACES};

use super::table::{standard_table, Combination, CombinationTable};

/// Best score and exact-split flag for one multiset of dice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Maximum points over all decompositions.
    pub best: u32,
    /// Some decomposition leaves no die unscored.
    pub full: bool,
}

/// Memoized decomposition search over a combination table.
#[derive(Clone, Debug)]
pub struct ScoringEngine<'t> {
    table: &'t CombinationTable,
    memo: FxHashMap<FaceCounts, Evaluation>,
}

impl<'t> ScoringEngine<'t> {
    /// Create an engine with an empty cache.
    #[must_use]
    pub fn new(table: &'t CombinationTable) -> Self {
        Self {
            table,
            memo: FxHashMap::default(),
        }
    }

    /// Create an engine with every count vector of up to six dice cached.
    #[must_use]
    pub fn prewarmed(table: &'t CombinationTable) -> Self {
        let mut engine = Self::new(table);
        for counts in all_counts(DICE_COUNT) {
            engine.evaluate(&counts);
        }
        log::debug!("scoring cache prewarmed with {} dice multisets", engine.memo.len());
        engine
    }

    #[must_use]
    pub fn table(&self) -> &'t CombinationTable {
        self.table
    }

    /// Number of cached count vectors.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.memo.len()
    }

    /// Evaluate `counts`, filling the cache along the way.
    pub fn evaluate(&mut self, counts: &FaceCounts) -> Evaluation {
        if let Some(&hit) = self.memo.get(counts) {
            return hit;
        }

        let table = self.table;
        let eval = decompose(table, counts, |rest| self.evaluate(rest));
        self.memo.insert(*counts, eval);
        eval
    }

    /// Evaluate without touching the cache. Cached entries are reused.
    #[must_use]
    pub fn evaluation(&self, counts: &FaceCounts) -> Evaluation {
        match self.memo.get(counts) {
            Some(&hit) => hit,
            None => decompose(self.table, counts, |rest| self.evaluation(rest)),
        }
    }

    /// The patterns of one maximizing decomposition, largest first.
    ///
    /// Dice outside every pattern are left out. Empty when nothing scores.
    #[must_use]
    pub fn best_decomposition(&self, counts: &FaceCounts) -> SmallVec<[&'t Combination; DICE_COUNT]> {
        let table = self.table;
        let mut out = SmallVec::new();
        let mut remaining = *counts;

        loop {
            let target = self.evaluation(&remaining).best;
            if target == 0 {
                break;
            }

            let next = table.iter().find_map(|combo| {
                let rest = remaining.checked_sub(&combo.counts)?;
                (combo.points + self.evaluation(&rest).best == target).then_some((combo, rest))
            });

            match next {
                Some((combo, rest)) => {
                    out.push(combo);
                    remaining = rest;
                }
                None => break,
            }
        }

        out
    }
}

/// One level of the decomposition search over every pattern that fits in
/// `counts`, largest first. `rest` evaluates what each pattern leaves over.
fn decompose(
    table: &CombinationTable,
    counts: &FaceCounts,
    mut rest: impl FnMut(&FaceCounts) -> Evaluation,
) -> Evaluation {
    let mut eval = Evaluation {
        best: 0,
        full: counts.is_empty(),
    };

    for size in (1..=counts.total().min(DICE_COUNT)).rev() {
        for combo in table.lookup(size) {
            if let Some(remaining) = counts.checked_sub(&combo.counts) {
                let sub = rest(&remaining);
                eval.best = eval.best.max(combo.points + sub.best);
                eval.full |= sub.full;
            }
        }
    }
    eval
}

/// The process-wide prewarmed engine over the standard table.
pub fn standard_engine() -> &'static ScoringEngine<'static> {
    static ENGINE: OnceLock<ScoringEngine<'static>> = OnceLock::new();
    ENGINE.get_or_init(|| ScoringEngine::prewarmed(standard_table()))
}

/// Face counts of the dice at the selected positions.
#[must_use]
pub fn selected_counts(values: &[u8; DICE_COUNT], selection: DiceMask) -> FaceCounts {
    let selected: SmallVec<[u8; DICE_COUNT]> = selection.iter().map(|i| values[i]).collect();
    FaceCounts::from_values(&selected)
}

/// Maximum points the selected dice can score.
///
/// ```
/// use farkle_engine::core::DiceMask;
/// use farkle_engine::scoring::score;
///
/// // Two triples beat 1-1-1 plus 5-5-5 scored separately
/// assert_eq!(score(&[1, 1, 1, 5, 5, 5], DiceMask::ALL), 2500);
/// // The unselected 1 does not count
/// assert_eq!(score(&[1, 2, 3, 5, 5, 5], DiceMask::from_indices(&[3, 4, 5])), 500);
/// ```
#[must_use]
pub fn score(values: &[u8; DICE_COUNT], selection: DiceMask) -> u32 {
    score_counts(&selected_counts(values, selection))
}

/// True iff the selected dice split exactly into scoring patterns.
#[must_use]
pub fn verify_full_decomposition(values: &[u8; DICE_COUNT], selection: DiceMask) -> bool {
    fully_decomposes(&selected_counts(values, selection))
}

/// Maximum points for a multiset of dice.
#[must_use]
pub fn score_counts(counts: &FaceCounts) -> u32 {
    standard_engine().evaluation(counts).best
}

/// True iff the multiset splits exactly into scoring patterns.
#[must_use]
pub fn fully_decomposes(counts: &FaceCounts) -> bool {
    standard_engine().evaluation(counts).full
}

/// One maximizing decomposition under the standard table.
#[must_use]
pub fn best_decomposition(counts: &FaceCounts) -> SmallVec<[&'static Combination; DICE_COUNT]> {
    standard_engine().best_decomposition(counts)
}

/// Every face-count vector with at most `max_dice` dice, fewest dice first.
fn all_counts(max_dice: usize) -> Vec<FaceCounts> {
    fn fill(face: usize, left: u8, current: &mut [u8; FACES], out: &mut Vec<FaceCounts>) {
        if face == FACES {
            out.push(FaceCounts::new(*current));
            return;
        }
        for n in 0..=left {
            current[face] = n;
            fill(face + 1, left - n, current, out);
        }
        current[face] = 0;
    }

    let mut out = Vec::new();
    fill(0, max_dice as u8, &mut [0; FACES], &mut out);
    out.sort_by_key(FaceCounts::total);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::table::CombinationKind;

    fn counts(values: &[u8]) -> FaceCounts {
        FaceCounts::from_values(values)
    }

    #[test]
    fn test_empty_scores_zero_and_decomposes() {
        assert_eq!(score_counts(&FaceCounts::EMPTY), 0);
        assert!(fully_decomposes(&FaceCounts::EMPTY));
        assert_eq!(score(&[2, 3, 4, 6, 2, 3], DiceMask::EMPTY), 0);
    }

    #[test]
    fn test_singles() {
        assert_eq!(score_counts(&counts(&[1])), 100);
        assert_eq!(score_counts(&counts(&[5])), 50);
        assert_eq!(score_counts(&counts(&[1, 5])), 150);
        assert_eq!(score_counts(&counts(&[1, 1])), 200);
        assert_eq!(score_counts(&counts(&[3])), 0);
    }

    #[test]
    fn test_maximizing_grouping() {
        assert_eq!(score_counts(&counts(&[1, 1, 1, 5, 5, 5])), 2500);
        assert_eq!(score_counts(&counts(&[1, 1, 1, 1])), 1000);
        assert_eq!(score_counts(&counts(&[1, 1, 1, 1, 1, 1])), 3000);
        assert_eq!(score_counts(&counts(&[2, 2, 3, 3, 4, 4])), 1500);
        assert_eq!(score_counts(&counts(&[1, 2, 3, 4, 5, 6])), 1500);
        assert_eq!(score_counts(&counts(&[1, 1, 1, 1, 5, 5])), 1500);
    }

    #[test]
    fn test_unmatched_dice_are_ignored_by_score() {
        assert_eq!(score_counts(&counts(&[1, 2])), 100);
        assert_eq!(score_counts(&counts(&[2, 2, 2, 3])), 200);
        assert_eq!(score_counts(&counts(&[2, 3, 4, 6])), 0);
    }

    #[test]
    fn test_full_decomposition() {
        assert!(fully_decomposes(&counts(&[1, 5])));
        assert!(fully_decomposes(&counts(&[2, 2, 2, 1])));
        assert!(fully_decomposes(&counts(&[3, 3, 4, 4, 6, 6])));
        assert!(!fully_decomposes(&counts(&[3])));
        assert!(!fully_decomposes(&counts(&[1, 1, 2])));
        assert!(fully_decomposes(&counts(&[5, 5])));
        assert!(!fully_decomposes(&counts(&[2, 2])));
    }

    #[test]
    fn test_selection_by_position() {
        let values = [3, 1, 4, 1, 5, 2];
        assert_eq!(score(&values, DiceMask::from_indices(&[1, 3])), 200);
        assert_eq!(score(&values, DiceMask::from_indices(&[0, 2])), 0);
        assert!(verify_full_decomposition(&values, DiceMask::from_indices(&[1, 4])));
        assert!(!verify_full_decomposition(&values, DiceMask::from_indices(&[1, 5])));
    }

    #[test]
    fn test_best_decomposition() {
        let parts = best_decomposition(&counts(&[1, 1, 1, 5, 5, 5]));
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].kind, CombinationKind::TwoTriples);

        let parts = best_decomposition(&counts(&[2, 2, 2, 1, 5, 3]));
        let total: u32 = parts.iter().map(|c| c.points).sum();
        assert_eq!(total, 350);
        assert_eq!(parts.len(), 3);

        assert!(best_decomposition(&counts(&[2, 3, 4, 6])).is_empty());
    }

    #[test]
    fn test_prewarmed_cache_covers_all_rolls() {
        // C(12, 6) multisets of at most six dice over six faces
        assert_eq!(all_counts(6).len(), 924);
        assert_eq!(standard_engine().cached_len(), 924);
    }

    #[test]
    fn test_cold_engine_matches_prewarmed() {
        let table = CombinationTable::standard();
        let mut cold = ScoringEngine::new(&table);

        for c in all_counts(6) {
            assert_eq!(cold.evaluate(&c), standard_engine().evaluation(&c), "counts {c}");
        }
    }
}
