//! Error types for submission and configuration

use std::time::Duration;

use contact_validation::SpecError;
use thiserror::Error;

/// Why a submission did not go through
///
/// Stored as text so the error can sit inside [`crate::FormSubmissionState`]
/// and be cloned out to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("transport failed: {0}")]
    Transport(String),

    #[error("transport timed out after {0:?}")]
    TimedOut(Duration),
}

/// Invalid field table in the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid pattern for field `{field}`")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Spec(#[from] SpecError),
}
