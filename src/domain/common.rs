//! Shared helpers for wish-list domain types.

use uuid::Uuid;

/// Stable, in-memory identifier of an item. Never persisted.
pub type ItemId = Uuid;

/// Collapses runs of whitespace into single spaces and trims both ends.
pub fn normalize_str(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes every line like [`normalize_str`] and drops blank lines.
pub fn normalize_text(value: &str) -> String {
    value
        .lines()
        .map(normalize_str)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ceiling division for non-negative money amounts.
pub fn div_ceil(amount: i64, divisor: i64) -> i64 {
    let quotient = amount / divisor;
    if amount % divisor != 0 {
        quotient + 1
    } else {
        quotient
    }
}
