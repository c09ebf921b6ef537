//! Shared text helpers for the Trackify crate.

use std::cmp::Ordering;

/// Split free-text label input on whitespace and commas, dropping blanks.
///
/// `"ui, backend  urgent,,"` → `["ui", "backend", "urgent"]`.
pub fn parse_labels(input: &str) -> Vec<String> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

/// Title ordering in the style of a browser's `localeCompare`: letters
/// compare case-insensitively first, and only on a tie does lowercase sort
/// ahead of uppercase.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a.to_lowercase().cmp(&b.to_lowercase());
    if folded != Ordering::Equal {
        return folded;
    }
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca == cb {
            continue;
        }
        match (ca.is_lowercase(), cb.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => return ca.cmp(&cb),
        }
    }
    a.len().cmp(&b.len())
}

/// Case-insensitive substring test. An empty needle always matches.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
