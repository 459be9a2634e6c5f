use crate::rules::Rules;

/// Points for a correct answer.
///
/// Base reward is `rules.base_points` while the hint is unused, `rules.hinted_points` after.
/// The combo multiplier `1 + 0.1 * combo` uses the streak before this answer; the product
/// is floored. Integer arithmetic keeps e.g. 5 x 1.3 at exactly 6.
#[inline]
pub fn points_for(rules: &Rules, hint_available: bool, combo: u32) -> u32 {
    let base = if hint_available {
        rules.base_points
    } else {
        rules.hinted_points
    };
    let tenths = 10u64 + u64::from(rules.combo_step_tenths) * u64::from(combo);
    let points = u64::from(base) * tenths / 10;
    u32::try_from(points).unwrap_or(u32::MAX)
}
