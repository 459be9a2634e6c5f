use crate::catalog::TechItem;

/// Trim surrounding whitespace and lowercase.
#[inline]
pub fn normalize_answer(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Exact match against the canonical name or any alias, ignoring case and
/// surrounding whitespace on both sides. No partial matching.
pub fn is_correct(item: &TechItem, text: &str) -> bool {
    let guess = normalize_answer(text);
    if guess.is_empty() {
        return false;
    }
    item.accepted_names().any(|n| normalize_answer(n) == guess)
}

/// The hint reveals the first letter of the canonical name.
#[inline]
pub fn hint_letter(item: &TechItem) -> Option<char> {
    item.name.chars().next()
}
