//! Integration tests for the contact form engine
//!
//! Covers:
//! - Rejected, successful and failed submissions
//! - Event order seen by the rendering layer
//! - Busy release, re-entrancy and transport timeout
//! - Debounced input validation

use anyhow::Result;
use async_trait::async_trait;
use contact_form::host::{MemoryRegistry, NotificationCenter, SimulatedTransport};
use contact_form::{
    Collaborators, Config, FieldRegistry, FormEvent, FormSubmissionState, FormValidationEngine,
    Notification, NotificationKind, NotificationSink, SubmissionError, SubmissionPayload,
    SubmitOutcome, Transport,
};
use contact_validation::contact_form_specs;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Notify};

const VALID: &[(&str, &str)] = &[
    ("company", "Acme"),
    ("name", "Jo"),
    ("email", "jo@acme.com"),
    ("phone", "03-1234-5678"),
    ("message", "Hello there, this works"),
];

struct Harness {
    engine: FormValidationEngine,
    registry: Arc<MemoryRegistry>,
    notifications: Arc<NotificationCenter>,
}

fn harness(transport: Arc<dyn Transport>, config: Config) -> Harness {
    let specs = contact_form_specs();
    let registry = Arc::new(MemoryRegistry::for_specs(&specs));
    let notifications = Arc::new(NotificationCenter::new());
    let collaborators = Collaborators {
        registry: registry.clone(),
        transport,
        notifications: notifications.clone(),
    };
    Harness {
        engine: FormValidationEngine::new(specs, collaborators, &config),
        registry,
        notifications,
    }
}

fn drain(rx: &mut broadcast::Receiver<FormEvent>) -> Vec<FormEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn states(events: &[FormEvent]) -> Vec<FormSubmissionState> {
    events
        .iter()
        .filter_map(|e| match e {
            FormEvent::StateChanged(s) => Some(s.clone()),
            _ => None,
        })
        .collect()
}

/// Resolves only when the test opens the gate
#[derive(Default)]
struct GatedTransport {
    gate: Notify,
    calls: AtomicUsize,
}

#[async_trait]
impl Transport for GatedTransport {
    async fn submit_form(&self, _payload: &SubmissionPayload) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(())
    }
}

struct BrokenSink;

impl NotificationSink for BrokenSink {
    fn show(&self, _notification: &Notification) -> Result<()> {
        anyhow::bail!("message area missing")
    }
}

#[tokio::test(start_paused = true)]
async fn test_invalid_form_never_reaches_transport() {
    let transport = Arc::new(SimulatedTransport::new(Duration::from_secs(2)));
    let h = harness(transport.clone(), Config::default());
    h.registry.fill(&[("company", "Acme"), ("message", "short")]);
    let mut rx = h.engine.subscribe();

    let outcome = h.engine.submit().await;

    let SubmitOutcome::Rejected(result) = outcome.clone() else {
        panic!("expected rejection, got {:?}", outcome);
    };
    assert!(!result.overall_valid);
    assert!(result.field("company").unwrap().is_valid);
    assert_eq!(result.errors().count(), 3);

    assert_eq!(transport.calls(), 0);
    assert_eq!(h.engine.state(), FormSubmissionState::Idle);
    assert!(!h.engine.is_busy());

    let shown = h.notifications.current().unwrap();
    assert_eq!(shown.kind, NotificationKind::Error);
    assert_eq!(shown.message, "入力内容をご確認ください");

    // Every required field shows its own error
    let message = h.registry.slot("message").unwrap();
    assert_eq!(message.visually_valid, Some(false));
    assert_eq!(message.error_text, "お問い合わせ内容は10文字以上で入力してください");
    assert_eq!(h.registry.slot("company").unwrap().visually_valid, Some(true));
    // Values are untouched
    assert_eq!(h.registry.value("message").as_deref(), Some("short"));

    let events = drain(&mut rx);
    assert_eq!(
        states(&events),
        vec![FormSubmissionState::Validating, FormSubmissionState::Idle]
    );
    assert!(!events.iter().any(|e| matches!(e, FormEvent::BusyChanged(_))));
}

#[tokio::test(start_paused = true)]
async fn test_successful_submission_clears_form() {
    let transport = Arc::new(SimulatedTransport::new(Duration::from_secs(2)));
    let h = harness(transport.clone(), Config::default());
    h.registry.fill(VALID);
    let mut rx = h.engine.subscribe();

    let outcome = h.engine.submit().await;

    let SubmitOutcome::Submitted(id) = outcome.clone() else {
        panic!("expected submission, got {:?}", outcome);
    };

    let received = transport.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].submission_id, id);
    assert_eq!(received[0].fields["phone"], "03-1234-5678");
    assert_eq!(received[0].fields["service"], "");
    assert_eq!(received[0].fields.len(), 6);

    let events = drain(&mut rx);
    assert_eq!(
        states(&events),
        vec![
            FormSubmissionState::Validating,
            FormSubmissionState::Submitting,
            FormSubmissionState::Succeeded,
            FormSubmissionState::Idle,
        ]
    );
    assert!(events.contains(&FormEvent::FieldsCleared));
    assert_eq!(events.first(), Some(&FormEvent::StateChanged(FormSubmissionState::Validating)));
    assert_eq!(events.last(), Some(&FormEvent::BusyChanged(false)));

    for name in ["company", "name", "email", "phone", "service", "message"] {
        let slot = h.registry.slot(name).unwrap();
        assert_eq!(slot.value, "", "{name} should be cleared");
        assert_eq!(slot.error_text, "");
        assert_eq!(slot.visually_valid, None);
    }

    let shown = h.notifications.current().unwrap();
    assert_eq!(shown.kind, NotificationKind::Success);
    assert_eq!(
        shown.message,
        "お問い合わせを受け付けました。担当者より3営業日以内にご連絡いたします。"
    );
    assert_eq!(h.engine.state(), FormSubmissionState::Idle);
    assert!(!h.engine.is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_failed_submission_preserves_values() {
    let transport = Arc::new(SimulatedTransport::failing(
        Duration::from_secs(2),
        "503 Service Unavailable",
    ));
    let h = harness(transport.clone(), Config::default());
    h.registry.fill(VALID);
    let mut rx = h.engine.subscribe();

    let outcome = h.engine.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Failed(SubmissionError::Transport(
            "503 Service Unavailable".to_string()
        ))
    );
    assert_eq!(transport.calls(), 1);

    let events = drain(&mut rx);
    assert_eq!(
        states(&events),
        vec![
            FormSubmissionState::Validating,
            FormSubmissionState::Submitting,
            FormSubmissionState::Failed(
                "transport failed: 503 Service Unavailable".to_string()
            ),
            FormSubmissionState::Idle,
        ]
    );
    assert!(!events.contains(&FormEvent::FieldsCleared));
    assert!(events.contains(&FormEvent::BusyChanged(true)));
    assert_eq!(events.last(), Some(&FormEvent::BusyChanged(false)));

    for (name, value) in VALID {
        assert_eq!(h.registry.value(name).as_deref(), Some(*value));
    }

    let shown = h.notifications.current().unwrap();
    assert_eq!(shown.kind, NotificationKind::Error);
    assert_eq!(
        shown.message,
        "送信中にエラーが発生しました。お手数ですが、もう一度お試しください。"
    );
    assert!(!h.engine.is_busy());
}

#[tokio::test]
async fn test_second_submit_while_in_flight_is_ignored() {
    let transport = Arc::new(GatedTransport::default());
    let h = harness(transport.clone(), Config::default());
    h.registry.fill(VALID);

    let first = h.engine.submit();
    let second = async {
        while h.engine.state() != FormSubmissionState::Submitting {
            tokio::task::yield_now().await;
        }
        assert!(h.engine.is_busy());
        let outcome = h.engine.submit().await;
        transport.gate.notify_one();
        outcome
    };

    let (first, second) = tokio::join!(first, second);

    assert!(matches!(first, SubmitOutcome::Submitted(_)));
    assert_eq!(second, SubmitOutcome::Ignored);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    assert!(!h.engine.is_busy());

    // Usable again afterwards
    h.registry.fill(VALID);
    transport.gate.notify_one();
    assert!(matches!(h.engine.submit().await, SubmitOutcome::Submitted(_)));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_transport_timeout_is_a_failure() {
    let transport = Arc::new(SimulatedTransport::new(Duration::from_secs(30)));
    let config = Config::from_toml_str("[form]\ntransport_timeout_ms = 5000\n").unwrap();
    let h = harness(transport.clone(), config);
    h.registry.fill(VALID);

    let outcome = h.engine.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Failed(SubmissionError::TimedOut(Duration::from_secs(5)))
    );
    assert_eq!(h.registry.value("company").as_deref(), Some("Acme"));
    assert!(transport.received().is_empty());
    assert!(!h.engine.is_busy());
    assert_eq!(h.engine.state(), FormSubmissionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_busy_released_when_notification_fails() {
    let specs = contact_form_specs();
    let registry = Arc::new(MemoryRegistry::for_specs(&specs));
    let collaborators = Collaborators {
        registry: registry.clone(),
        transport: Arc::new(SimulatedTransport::failing(Duration::from_millis(10), "down")),
        notifications: Arc::new(BrokenSink),
    };
    let engine = FormValidationEngine::new(specs, collaborators, &Config::default());
    registry.fill(VALID);

    let outcome = engine.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert!(!engine.is_busy());
    assert_eq!(engine.state(), FormSubmissionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_debounced_input_validates_once_with_last_value() {
    let transport = Arc::new(SimulatedTransport::new(Duration::ZERO));
    let h = harness(transport, Config::default());
    let mut rx = h.engine.subscribe();

    for value in ["A", "Ac", "Acme"] {
        h.registry.set_value("company", value);
        h.engine.field_input("company");
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    // Last trigger at t=200, window ends at t=500
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(drain(&mut rx).is_empty());

    tokio::time::sleep(Duration::from_millis(100)).await;
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }

    let validated: Vec<_> = drain(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            FormEvent::FieldValidated(state) => Some(state),
            _ => None,
        })
        .collect();
    assert_eq!(validated.len(), 1);
    assert_eq!(validated[0].value, "Acme");
    assert!(validated[0].is_valid);
    assert_eq!(h.registry.slot("company").unwrap().visually_valid, Some(true));
}

#[tokio::test(start_paused = true)]
async fn test_blur_and_input_last_write_wins() {
    let transport = Arc::new(SimulatedTransport::new(Duration::ZERO));
    let h = harness(transport, Config::default());

    h.registry.set_value("email", "jo@acme");
    h.engine.field_input("email");

    // Blur with a corrected value before the debounce fires
    h.registry.set_value("email", "jo@acme.com");
    assert!(h.engine.validate_field("email").unwrap().is_valid);

    // The pending input validation still runs with the value it captured
    tokio::time::sleep(Duration::from_millis(400)).await;
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    let slot = h.registry.slot("email").unwrap();
    assert_eq!(slot.visually_valid, Some(false));
    assert_eq!(slot.error_text, "正しいメールアドレス形式で入力してください");

    // Next blur recomputes from the current value
    h.engine.validate_field("email");
    assert_eq!(h.registry.slot("email").unwrap().visually_valid, Some(true));
}

#[tokio::test]
async fn test_input_on_unknown_field_is_ignored() {
    let transport = Arc::new(SimulatedTransport::new(Duration::ZERO));
    let h = harness(transport, Config::default());
    let mut rx = h.engine.subscribe();

    h.engine.field_input("fax");
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_validate_all_does_not_submit() {
    let transport = Arc::new(SimulatedTransport::new(Duration::ZERO));
    let h = harness(transport.clone(), Config::default());
    h.registry.fill(VALID);

    let result = h.engine.validate_all();

    assert!(result.overall_valid);
    assert_eq!(transport.calls(), 0);
    assert_eq!(h.engine.state(), FormSubmissionState::Idle);
    assert!(h.notifications.current().is_none());
}
