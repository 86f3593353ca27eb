//! Farkle detection and enumeration of lockable selections.

use crate::core::{Dice, DiceMask};

use super::engine::{selected_counts, standard_engine};
use super::table::standard_table;

/// True iff no scoring pattern can be taken from the unlocked dice.
///
/// Any single pattern is enough to avoid a farkle; the unlocked dice do not
/// need to decompose completely.
///
/// ```
/// use farkle_engine::core::{Dice, DiceMask};
/// use farkle_engine::scoring::is_farkled;
///
/// assert!(is_farkled(&Dice::new([2, 3, 4, 6, 2, 3])));
/// assert!(!is_farkled(&Dice::new([2, 3, 4, 6, 2, 5])));
///
/// // Only unlocked dice count
/// let dice = Dice::with_locked([1, 2, 3, 4, 6, 6], DiceMask::from_indices(&[0]));
/// assert!(is_farkled(&dice));
/// ```
#[must_use]
pub fn is_farkled(dice: &Dice) -> bool {
    let available = dice.unlocked_counts();
    !standard_table()
        .iter()
        .any(|combo| available.contains(&combo.counts))
}

/// Every nonempty selection of unlocked dice that splits exactly into
/// scoring patterns, in ascending mask order.
///
/// Selections are positional: two dice of equal value yield two distinct
/// single-die selections.
#[must_use]
pub fn legal_lock_selections(dice: &Dice) -> Vec<DiceMask> {
    let engine = standard_engine();
    dice.unlocked()
        .subsets()
        .filter(|&mask| engine.evaluation(&selected_counts(dice.values(), mask)).full)
        .collect()
}
