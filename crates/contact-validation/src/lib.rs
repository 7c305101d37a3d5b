//! Contact Form Validation
//!
//! Pure validation for the contact form. Used by the submission engine in
//! `contact-form` and by the WASM bindings the page loads for inline checks.
//!
//! Field rules are data: a form is a table of [`FieldSpec`] entries and every
//! field goes through the same [`validate`] function.
//!
//! ```
//! use contact_validation::{contact_form_specs, validate_form};
//! use std::collections::BTreeMap;
//!
//! let specs = contact_form_specs();
//! let mut values = BTreeMap::new();
//! values.insert("company".to_string(), "Acme".to_string());
//! values.insert("name".to_string(), "Jo".to_string());
//! values.insert("email".to_string(), "jo@acme.com".to_string());
//! values.insert("message".to_string(), "Hello there, this works".to_string());
//!
//! assert!(validate_form(&specs, &values).overall_valid);
//! ```

pub mod email;
pub mod field;
pub mod form;
pub mod string;

pub use email::*;
pub use field::{validate, FieldSpec, FieldState};
pub use form::{
    contact_form_specs, validate_form, FieldValues, FormSpecs, SpecError, ValidationResult,
};
pub use string::*;
