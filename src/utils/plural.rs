//! Pluralization helpers for summary output.

/// Return the "s" suffix for a count.
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format a count with its noun: `plural_count(2, "folder")` -> `"2 folders"`.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}
