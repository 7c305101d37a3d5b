//! Field rules and the single validator every field goes through

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::string::{is_blank, meets_min_length};

/// Static validation rules for one form field
///
/// A spec with no rules accepts any input; optional fields such as `phone`
/// are declared that way.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub required: bool,
    pub min_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub empty_message: String,
    pub too_short_message: String,
    pub pattern_message: String,
}

impl FieldSpec {
    /// Create an optional field with no rules
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            min_length: None,
            pattern: None,
            empty_message: String::new(),
            too_short_message: String::new(),
            pattern_message: String::new(),
        }
    }

    /// Mark the field as required
    pub fn required(mut self, empty_message: impl Into<String>) -> Self {
        self.required = true;
        self.empty_message = empty_message.into();
        self
    }

    /// Minimum length in characters after trimming
    pub fn min_length(mut self, min: usize, too_short_message: impl Into<String>) -> Self {
        self.min_length = Some(min);
        self.too_short_message = too_short_message.into();
        self
    }

    /// Trimmed value must match `pattern`
    pub fn pattern(mut self, pattern: Regex, pattern_message: impl Into<String>) -> Self {
        self.pattern = Some(pattern);
        self.pattern_message = pattern_message.into();
        self
    }

    /// Returns true if the spec carries no rule at all
    pub fn is_unconstrained(&self) -> bool {
        !self.required && self.min_length.is_none() && self.pattern.is_none()
    }
}

/// Validity snapshot of one field for one raw value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldState {
    pub name: String,
    /// Raw value as entered, untrimmed
    pub value: String,
    pub is_valid: bool,
    /// Empty when valid
    pub error_message: String,
}

impl FieldState {
    fn valid(spec: &FieldSpec, raw: &str) -> Self {
        Self {
            name: spec.name.clone(),
            value: raw.to_string(),
            is_valid: true,
            error_message: String::new(),
        }
    }

    fn invalid(spec: &FieldSpec, raw: &str, message: &str) -> Self {
        Self {
            name: spec.name.clone(),
            value: raw.to_string(),
            is_valid: false,
            error_message: message.to_string(),
        }
    }
}

/// Validate a raw value against its spec
///
/// Rules are checked on the trimmed value in order: required, minimum
/// length, pattern. The first failing rule decides the message.
pub fn validate(spec: &FieldSpec, raw: &str) -> FieldState {
    if spec.required && is_blank(raw) {
        return FieldState::invalid(spec, raw, &spec.empty_message);
    }

    let value = raw.trim();
    if let Some(min) = spec.min_length {
        if !meets_min_length(value, min) {
            return FieldState::invalid(spec, raw, &spec.too_short_message);
        }
    }

    if let Some(ref pattern) = spec.pattern {
        if !pattern.is_match(value) {
            return FieldState::invalid(spec, raw, &spec.pattern_message);
        }
    }

    FieldState::valid(spec, raw)
}
