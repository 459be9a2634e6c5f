use rand::Rng;

use crate::catalog::{Catalog, TechItem};
use crate::types::Difficulty;

/// Pick a question uniformly from the items of `difficulty`.
/// Falls back to a uniform pick over the whole catalog when the tier is empty.
/// Returns `None` only for an empty catalog.
pub fn select_question<'a, R: Rng + ?Sized>(
    catalog: &'a Catalog,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<&'a TechItem> {
    let tier = catalog.by_difficulty(difficulty);
    if !tier.is_empty() {
        return Some(tier[rng.gen_range(0..tier.len())]);
    }
    if catalog.is_empty() {
        return None;
    }
    let k = rng.gen_range(0..catalog.len());
    catalog.iter().nth(k)
}
