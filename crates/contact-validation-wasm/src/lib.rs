//! Contact Validation WASM
//!
//! WebAssembly bindings for the contact form's inline validation.
//! The page gets the same rules and messages the submission engine uses.

use contact_validation as validation;
use contact_validation::{contact_form_specs, FieldState, FormSpecs};
use serde::Deserialize;
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

/// Set panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Form values as sent from JavaScript: `{ company: "...", email: "..." }`
#[derive(Deserialize, Debug, Default)]
#[serde(transparent)]
pub struct FormValues(pub BTreeMap<String, String>);

/// Validate one contact form field
///
/// # Returns
/// The field state (`{ name, value, isValid, errorMessage }`), or `null`
/// for a field the form does not declare.
///
/// # Example (JavaScript)
/// ```javascript
/// const state = validateField('email', 'user@example.com');
/// if (!state.isValid) errorLabel.textContent = state.errorMessage;
/// ```
#[wasm_bindgen(js_name = validateField)]
pub fn validate_field(field_name: &str, value: &str) -> Result<JsValue, JsValue> {
    let specs = contact_form_specs();
    let state = field_state(&specs, field_name, value);
    Ok(serde_wasm_bindgen::to_value(&state)?)
}

/// Validate every required field of the contact form
///
/// # Returns
/// `{ overallValid, perField: { company: {...}, ... } }`
#[wasm_bindgen(js_name = validateForm)]
pub fn validate_form(values: JsValue) -> Result<JsValue, JsValue> {
    let values: FormValues = serde_wasm_bindgen::from_value(values)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse form values: {}", e)))?;

    let result = validation::validate_form(&contact_form_specs(), &values.0);
    if !result.overall_valid {
        web_sys::console::debug_1(&JsValue::from_str(&format!(
            "contact form: {} invalid field(s)",
            result.errors().count()
        )));
    }

    Ok(serde_wasm_bindgen::to_value(&result)?)
}

/// Quick email shape check
#[wasm_bindgen(js_name = isValidEmail)]
pub fn is_valid_email_js(email: &str) -> bool {
    validation::is_valid_email(email.trim())
}

fn field_state(specs: &FormSpecs, field_name: &str, value: &str) -> Option<FieldState> {
    specs.get(field_name).map(|spec| validation::validate(spec, value))
}
