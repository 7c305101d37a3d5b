//! Email validation functions

use once_cell::sync::Lazy;
use regex::Regex;

/// Loose email shape: something@something.something with no whitespace
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("EMAIL_PATTERN is a valid regex"));

/// Compiled [`EMAIL_PATTERN`]
pub fn email_regex() -> &'static Regex {
    &EMAIL_REGEX
}

/// Validates the email shape the contact form accepts
///
/// Not RFC 5322. One `@`, no whitespace, at least one dot after the `@`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}
