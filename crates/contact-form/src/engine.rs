//! Submission engine: field validation and the submit lifecycle
//!
//! ```text
//! Idle -> Validating -> Submitting -> Succeeded -> Idle
//!                   \              \-> Failed    -> Idle
//!                    \-> Idle (rejected)
//! ```

use crate::config::{Config, NotificationConfig};
use crate::error::SubmissionError;
use crate::host::{FieldRegistry, NotificationSink, Transport};
use crate::notification::{Notification, NotificationKind};
use crate::schedule::Debouncer;
use chrono::{DateTime, Utc};
use contact_validation::{validate, validate_form, FieldState, FormSpecs, ValidationResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

const EVENT_CAPACITY: usize = 64;

/// Where the form is in its submit cycle
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum FormSubmissionState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed(String),
}

/// What the rendering layer is told
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    StateChanged(FormSubmissionState),
    FieldValidated(FieldState),
    /// Submit affordance disabled (`true`) or released (`false`)
    BusyChanged(bool),
    /// All values and error displays were reset after a successful submit
    FieldsCleared,
}

/// Result of one `submit` call
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Another submission was in flight
    Ignored,
    /// Validation failed, transport not called
    Rejected(ValidationResult),
    Submitted(Uuid),
    Failed(SubmissionError),
}

/// What the transport receives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub submission_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    /// Raw values of every declared field, optional ones included
    pub fields: BTreeMap<String, String>,
}

/// Host side of the engine
#[derive(Clone)]
pub struct Collaborators {
    pub registry: Arc<dyn FieldRegistry>,
    pub transport: Arc<dyn Transport>,
    pub notifications: Arc<dyn NotificationSink>,
}

struct Inner {
    specs: FormSpecs,
    registry: Arc<dyn FieldRegistry>,
    transport: Arc<dyn Transport>,
    notifications: Arc<dyn NotificationSink>,
    messages: NotificationConfig,
    transport_timeout: Option<Duration>,
    state: Mutex<FormSubmissionState>,
    busy: AtomicBool,
    events: broadcast::Sender<FormEvent>,
}

/// Contact form engine
///
/// Owns the field table and the submission state of one form. Cloning
/// yields another handle to the same form.
#[derive(Clone)]
pub struct FormValidationEngine {
    inner: Arc<Inner>,
    debouncers: Arc<HashMap<String, Debouncer<String>>>,
}

impl FormValidationEngine {
    pub fn new(specs: FormSpecs, collaborators: Collaborators, config: &Config) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let inner = Arc::new(Inner {
            specs,
            registry: collaborators.registry,
            transport: collaborators.transport,
            notifications: collaborators.notifications,
            messages: config.notifications.clone(),
            transport_timeout: config.form.transport_timeout(),
            state: Mutex::new(FormSubmissionState::Idle),
            busy: AtomicBool::new(false),
            events,
        });

        let debounce = config.form.debounce();
        let debouncers = inner
            .specs
            .names()
            .map(|name| {
                let target = Arc::clone(&inner);
                let field = name.to_string();
                let debouncer = Debouncer::new(debounce, move |value: String| {
                    target.check_field(&field, &value);
                });
                (name.to_string(), debouncer)
            })
            .collect();

        Self {
            inner,
            debouncers: Arc::new(debouncers),
        }
    }

    pub fn specs(&self) -> &FormSpecs {
        &self.inner.specs
    }

    pub fn state(&self) -> FormSubmissionState {
        self.inner.current_state()
    }

    /// True while a submission holds the submit affordance
    pub fn is_busy(&self) -> bool {
        self.inner.busy.load(Ordering::SeqCst)
    }

    /// Subscribe to engine events
    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.inner.events.subscribe()
    }

    /// Validate one field now (blur)
    ///
    /// Returns `None` for names outside the field table.
    pub fn validate_field(&self, name: &str) -> Option<FieldState> {
        let value = self.inner.registry.value(name).unwrap_or_default();
        self.inner.check_field(name, &value)
    }

    /// Schedule re-validation after the debounce window (input)
    ///
    /// The value is read now; only the last call within a window runs.
    pub fn field_input(&self, name: &str) {
        match self.debouncers.get(name) {
            Some(debouncer) => {
                let value = self.inner.registry.value(name).unwrap_or_default();
                debouncer.trigger(value);
            }
            None => debug!("input on unknown field {:?} ignored", name),
        }
    }

    /// Validate and render every required field without submitting
    pub fn validate_all(&self) -> ValidationResult {
        self.inner.check_form()
    }

    /// Run one submit cycle
    ///
    /// A call made while another submission is in flight returns
    /// [`SubmitOutcome::Ignored`] without touching anything.
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(mut busy) = BusyGuard::acquire(&self.inner) else {
            debug!("submit ignored, a submission is already in flight");
            return SubmitOutcome::Ignored;
        };
        let inner = &self.inner;

        inner.transition(FormSubmissionState::Validating);
        let result = inner.check_form();

        if !result.overall_valid {
            debug!(
                "submit rejected, {} invalid field(s)",
                result.errors().count()
            );
            inner.notify(NotificationKind::Error, &inner.messages.review_message);
            inner.transition(FormSubmissionState::Idle);
            return SubmitOutcome::Rejected(result);
        }

        busy.announce();
        inner.transition(FormSubmissionState::Submitting);

        let payload = inner.payload();
        let submission_id = payload.submission_id;
        info!(
            submission_id = %submission_id,
            fields = payload.fields.len(),
            "submitting contact form"
        );

        match inner.send(&payload).await {
            Ok(()) => {
                info!(submission_id = %submission_id, "contact form submitted");
                inner.transition(FormSubmissionState::Succeeded);
                inner.notify(NotificationKind::Success, &inner.messages.success_message);
                inner.clear_fields();
                inner.transition(FormSubmissionState::Idle);
                SubmitOutcome::Submitted(submission_id)
            }
            Err(err) => {
                warn!(submission_id = %submission_id, error = %err, "contact form submission failed");
                inner.transition(FormSubmissionState::Failed(err.to_string()));
                inner.notify(NotificationKind::Error, &inner.messages.failure_message);
                inner.transition(FormSubmissionState::Idle);
                SubmitOutcome::Failed(err)
            }
        }
    }
}

impl Inner {
    fn current_state(&self) -> FormSubmissionState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn transition(&self, next: FormSubmissionState) {
        let previous = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *state, next.clone())
        };
        debug!("form state {:?} -> {:?}", previous, next);
        self.emit(FormEvent::StateChanged(next));
    }

    fn emit(&self, event: FormEvent) {
        // Nobody listening is fine
        let _ = self.events.send(event);
    }

    /// Validate one field and render the result
    ///
    /// Fields without rules have no error label on the page and are left
    /// untouched.
    fn check_field(&self, name: &str, raw: &str) -> Option<FieldState> {
        let spec = self.specs.get(name)?;
        let state = validate(spec, raw);
        if !spec.is_unconstrained() {
            self.render_field(&state);
        }
        Some(state)
    }

    fn check_form(&self) -> ValidationResult {
        let values: BTreeMap<String, String> = self.field_values();
        let result = validate_form(&self.specs, &values);
        for state in result.per_field.values() {
            self.render_field(state);
        }
        result
    }

    fn render_field(&self, state: &FieldState) {
        debug!(
            "field {:?} valid={} {:?}",
            state.name, state.is_valid, state.error_message
        );
        self.registry.set_visual_validity(&state.name, state.is_valid);
        self.registry.set_error_text(&state.name, &state.error_message);
        self.emit(FormEvent::FieldValidated(state.clone()));
    }

    fn field_values(&self) -> BTreeMap<String, String> {
        self.specs
            .names()
            .map(|name| {
                let value = self.registry.value(name).unwrap_or_default();
                (name.to_string(), value)
            })
            .collect()
    }

    fn payload(&self) -> SubmissionPayload {
        SubmissionPayload {
            submission_id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            fields: self.field_values(),
        }
    }

    async fn send(&self, payload: &SubmissionPayload) -> Result<(), SubmissionError> {
        let call = self.transport.submit_form(payload);
        let outcome = match self.transport_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_) => return Err(SubmissionError::TimedOut(limit)),
            },
            None => call.await,
        };
        outcome.map_err(|e| SubmissionError::Transport(format!("{:#}", e)))
    }

    fn notify(&self, kind: NotificationKind, message: &str) {
        let notification = Notification::new(message, kind, self.messages.dismiss_after());
        if let Err(e) = self.notifications.show(&notification) {
            warn!("failed to show {:?} notification: {:#}", kind, e);
        }
    }

    fn clear_fields(&self) {
        for name in self.specs.names() {
            self.registry.set_value(name, "");
            self.registry.set_error_text(name, "");
            self.registry.clear_visual_validity(name);
        }
        self.emit(FormEvent::FieldsCleared);
    }
}

/// Holds the in-flight flag for one submit call
///
/// Dropping releases the flag on every path out of `submit`. A future
/// dropped mid-cycle also puts the form back to Idle.
struct BusyGuard<'a> {
    inner: &'a Inner,
    announced: bool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(inner: &'a Inner) -> Option<Self> {
        inner
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self {
                inner,
                announced: false,
            })
    }

    /// Tell the rendering layer the submit affordance is disabled
    fn announce(&mut self) {
        self.announced = true;
        self.inner.emit(FormEvent::BusyChanged(true));
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if self.inner.current_state() != FormSubmissionState::Idle {
            debug!("submit abandoned mid-cycle");
            self.inner.transition(FormSubmissionState::Idle);
        }
        self.inner.busy.store(false, Ordering::SeqCst);
        if self.announced {
            self.inner.emit(FormEvent::BusyChanged(false));
        }
    }
}
