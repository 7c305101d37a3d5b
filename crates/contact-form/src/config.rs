// File: src/config.rs
// Purpose: Configuration parsing from contact-form.toml

use anyhow::{Context, Result};
use contact_validation::{contact_form_specs, FieldSpec, FormSpecs};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Contact form configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub form: FormConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,

    #[serde(default)]
    pub transport: TransportConfig,

    /// Replaces the built-in field table when non-empty
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

/// Validation and submission timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// Quiescence window before input re-validates a field
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// No timeout when unset
    #[serde(default)]
    pub transport_timeout_ms: Option<u64>,
}

/// Texts and lifetime of the transient form messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_dismiss_after_ms")]
    pub dismiss_after_ms: u64,

    #[serde(default = "default_review_message")]
    pub review_message: String,

    #[serde(default = "default_success_message")]
    pub success_message: String,

    #[serde(default = "default_failure_message")]
    pub failure_message: String,
}

/// Settings for the simulated transport the site ships with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    #[serde(default = "default_simulated_delay_ms")]
    pub simulated_delay_ms: u64,
}

/// One `[[fields]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub min_length: Option<usize>,

    #[serde(default)]
    pub pattern: Option<String>,

    #[serde(default)]
    pub empty_message: String,

    #[serde(default)]
    pub too_short_message: String,

    #[serde(default)]
    pub pattern_message: String,
}

// Default values
fn default_debounce_ms() -> u64 {
    300
}

fn default_dismiss_after_ms() -> u64 {
    5000
}

fn default_simulated_delay_ms() -> u64 {
    2000
}

fn default_review_message() -> String {
    "入力内容をご確認ください".to_string()
}

fn default_success_message() -> String {
    "お問い合わせを受け付けました。担当者より3営業日以内にご連絡いたします。".to_string()
}

fn default_failure_message() -> String {
    "送信中にエラーが発生しました。お手数ですが、もう一度お試しください。".to_string()
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            transport_timeout_ms: None,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dismiss_after_ms: default_dismiss_after_ms(),
            review_message: default_review_message(),
            success_message: default_success_message(),
            failure_message: default_failure_message(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            simulated_delay_ms: default_simulated_delay_ms(),
        }
    }
}

impl FormConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn transport_timeout(&self) -> Option<Duration> {
        self.transport_timeout_ms.map(Duration::from_millis)
    }
}

impl NotificationConfig {
    pub fn dismiss_after(&self) -> Duration {
        Duration::from_millis(self.dismiss_after_ms)
    }
}

impl TransportConfig {
    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }
}

impl FieldConfig {
    fn to_spec(&self) -> Result<FieldSpec, ConfigError> {
        let mut spec = FieldSpec::new(&self.name);
        spec.required = self.required;
        spec.min_length = self.min_length;
        spec.empty_message = self.empty_message.clone();
        spec.too_short_message = self.too_short_message.clone();
        spec.pattern_message = self.pattern_message.clone();

        if let Some(ref pattern) = self.pattern {
            let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                field: self.name.clone(),
                source,
            })?;
            spec.pattern = Some(regex);
        }

        Ok(spec)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from default path (./contact-form.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("contact-form.toml")
    }

    /// Parse configuration from TOML text; empty text means defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Field table: `[[fields]]` entries if any, the built-in contact form otherwise
    pub fn field_specs(&self) -> Result<FormSpecs, ConfigError> {
        if self.fields.is_empty() {
            return Ok(contact_form_specs());
        }

        let specs = self
            .fields
            .iter()
            .map(FieldConfig::to_spec)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FormSpecs::new(specs)?)
    }
}
