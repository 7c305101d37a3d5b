//! Form-level rules: the field table and the validity aggregator

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::email::email_regex;
use crate::field::{validate, FieldSpec, FieldState};

pub const COMPANY: &str = "company";
pub const NAME: &str = "name";
pub const EMAIL: &str = "email";
pub const PHONE: &str = "phone";
pub const SERVICE: &str = "service";
pub const MESSAGE: &str = "message";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),
}

/// Ordered table of field specs with unique names
#[derive(Debug, Clone, Default)]
pub struct FormSpecs {
    specs: Vec<FieldSpec>,
}

impl FormSpecs {
    /// Build a table, rejecting duplicate field names
    pub fn new(specs: Vec<FieldSpec>) -> Result<Self, SpecError> {
        for (i, spec) in specs.iter().enumerate() {
            if specs[..i].iter().any(|s| s.name == spec.name) {
                return Err(SpecError::DuplicateField(spec.name.clone()));
            }
        }
        Ok(Self { specs })
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.specs.iter()
    }

    /// Specs of required fields, in declaration order
    pub fn required(&self) -> impl Iterator<Item = &FieldSpec> {
        self.specs.iter().filter(|s| s.required)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Source of raw field values, keyed by field name
pub trait FieldValues {
    fn field_value(&self, name: &str) -> Option<String>;
}

impl FieldValues for BTreeMap<String, String> {
    fn field_value(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl FieldValues for HashMap<String, String> {
    fn field_value(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Outcome of validating every required field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub overall_valid: bool,
    pub per_field: BTreeMap<String, FieldState>,
}

impl ValidationResult {
    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.per_field.get(name)
    }

    /// Invalid field states only
    pub fn errors(&self) -> impl Iterator<Item = &FieldState> {
        self.per_field.values().filter(|s| !s.is_valid)
    }
}

/// Validate every required field
///
/// All required fields are evaluated even after one fails, so every error
/// can be shown at once. Missing values count as empty.
pub fn validate_form(specs: &FormSpecs, values: &impl FieldValues) -> ValidationResult {
    let mut per_field = BTreeMap::new();
    let mut overall_valid = true;

    for spec in specs.required() {
        let raw = values.field_value(&spec.name).unwrap_or_default();
        let state = validate(spec, &raw);
        if !state.is_valid {
            overall_valid = false;
        }
        per_field.insert(spec.name.clone(), state);
    }

    ValidationResult {
        overall_valid,
        per_field,
    }
}

/// The site's contact form
pub fn contact_form_specs() -> FormSpecs {
    FormSpecs {
        specs: vec![
            FieldSpec::new(COMPANY)
                .required("会社名を入力してください")
                .min_length(2, "会社名は2文字以上で入力してください"),
            FieldSpec::new(NAME)
                .required("お名前を入力してください")
                .min_length(2, "お名前は2文字以上で入力してください"),
            FieldSpec::new(EMAIL)
                .required("メールアドレスを入力してください")
                .pattern(
                    email_regex().clone(),
                    "正しいメールアドレス形式で入力してください",
                ),
            FieldSpec::new(PHONE),
            FieldSpec::new(SERVICE),
            FieldSpec::new(MESSAGE)
                .required("お問い合わせ内容を入力してください")
                .min_length(10, "お問い合わせ内容は10文字以上で入力してください"),
        ],
    }
}
