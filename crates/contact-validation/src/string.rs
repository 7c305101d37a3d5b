//! String measures shared by the field rules

/// Length in characters, not bytes. Inputs on the site are mostly Japanese.
pub fn char_length(s: &str) -> usize {
    s.chars().count()
}

/// True if `s` has at least `min` characters
pub fn meets_min_length(s: &str, min: usize) -> bool {
    char_length(s) >= min
}

/// Whitespace-only input counts as empty
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
