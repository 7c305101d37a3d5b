//! # Contact Form
//!
//! Submission engine for the site's contact form, plus the small pieces of
//! page state (header, menu, reveal-on-scroll, focus cycling) the page
//! script drives.
//!
//! The engine never touches the page directly. It reads and writes fields
//! through a [`FieldRegistry`], submits through a [`Transport`], reports
//! through a [`NotificationSink`], and broadcasts [`FormEvent`]s for
//! whatever renders the form.
//!
//! ## Example
//!
//! ```rust
//! use contact_form::{Collaborators, Config, FormValidationEngine, SubmitOutcome};
//! use contact_form::host::{MemoryRegistry, NotificationCenter, SimulatedTransport};
//! use contact_validation::contact_form_specs;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let specs = contact_form_specs();
//!     let registry = Arc::new(MemoryRegistry::for_specs(&specs));
//!     let collaborators = Collaborators {
//!         registry: registry.clone(),
//!         transport: Arc::new(SimulatedTransport::new(Duration::from_millis(1))),
//!         notifications: Arc::new(NotificationCenter::new()),
//!     };
//!     let engine = FormValidationEngine::new(specs, collaborators, &Config::default());
//!
//!     // Nothing filled in yet
//!     assert!(matches!(engine.submit().await, SubmitOutcome::Rejected(_)));
//! }
//! ```

pub mod chrome;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod notification;
pub mod schedule;

pub use config::Config;
pub use engine::{
    Collaborators, FormEvent, FormSubmissionState, FormValidationEngine, SubmissionPayload,
    SubmitOutcome,
};
pub use error::{ConfigError, SubmissionError};
pub use host::{FieldRegistry, NotificationSink, Transport};
pub use notification::{Notification, NotificationKind};
pub use schedule::{Debouncer, Throttle};
