//! Ingredient name normalization shared by manual entry and image detection.

use std::collections::HashSet;

/// Longest ingredient name a pantry row may hold.
pub const MAX_NAME_LEN: usize = 100;

pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalize a batch of names: drop empties, collapse duplicates, keep the
/// first-seen order.
pub fn normalize_list<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .map(normalize_name)
        .filter(|n| !n.is_empty())
        .filter(|n| seen.insert(n.clone()))
        .collect()
}

/// Split comma-separated classifier output into normalized names.
pub fn parse_detected(text: &str) -> Vec<String> {
    normalize_list(text.split(','))
}
