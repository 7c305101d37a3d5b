//! In-memory field registry

use crate::host::FieldRegistry;
use contact_validation::{FieldValues, FormSpecs};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Everything the page shows for one field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSlot {
    pub value: String,
    /// `None` is neutral styling
    pub visually_valid: Option<bool>,
    pub error_text: String,
}

/// Field registry backed by a HashMap
///
/// Stands in for the page in tests and in the demo binary. Writes to
/// unknown fields are ignored, as they would be on a page without that input.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    fields: RwLock<HashMap<String, FieldSlot>>,
}

impl MemoryRegistry {
    /// Create a registry with the given empty fields
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = names
            .into_iter()
            .map(|name| (name.into(), FieldSlot::default()))
            .collect();
        Self {
            fields: RwLock::new(fields),
        }
    }

    /// One empty field per spec
    pub fn for_specs(specs: &FormSpecs) -> Self {
        Self::new(specs.names())
    }

    /// Snapshot of one field
    pub fn slot(&self, name: &str) -> Option<FieldSlot> {
        self.read(|fields| fields.get(name).cloned())
    }

    /// Fill several fields at once
    pub fn fill(&self, values: &[(&str, &str)]) {
        for (name, value) in values {
            self.set_value(name, value);
        }
    }

    fn read<R>(&self, f: impl FnOnce(&HashMap<String, FieldSlot>) -> R) -> R {
        let fields = self.fields.read().unwrap_or_else(PoisonError::into_inner);
        f(&fields)
    }

    fn update(&self, name: &str, f: impl FnOnce(&mut FieldSlot)) {
        let mut fields = self.fields.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = fields.get_mut(name) {
            f(slot);
        }
    }
}

impl FieldRegistry for MemoryRegistry {
    fn value(&self, name: &str) -> Option<String> {
        self.read(|fields| fields.get(name).map(|slot| slot.value.clone()))
    }

    fn set_value(&self, name: &str, value: &str) {
        self.update(name, |slot| slot.value = value.to_string());
    }

    fn set_visual_validity(&self, name: &str, valid: bool) {
        self.update(name, |slot| slot.visually_valid = Some(valid));
    }

    fn clear_visual_validity(&self, name: &str) {
        self.update(name, |slot| slot.visually_valid = None);
    }

    fn set_error_text(&self, name: &str, text: &str) {
        self.update(name, |slot| slot.error_text = text.to_string());
    }
}

impl FieldValues for MemoryRegistry {
    fn field_value(&self, name: &str) -> Option<String> {
        self.value(name)
    }
}
