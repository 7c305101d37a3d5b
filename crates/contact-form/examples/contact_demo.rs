//! Drives the contact form engine end to end against the simulated backend.
//!
//! ```sh
//! cargo run -p contact-form --example contact_demo
//! ```

use anyhow::Result;
use contact_form::host::{MemoryRegistry, NotificationCenter, SimulatedTransport};
use contact_form::{Collaborators, Config, FormEvent, FormValidationEngine, SubmitOutcome};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::load_default()?;
    let specs = config.field_specs()?;

    let registry = Arc::new(MemoryRegistry::for_specs(&specs));
    let transport = Arc::new(SimulatedTransport::new(config.transport.simulated_delay()));
    let notifications = Arc::new(NotificationCenter::new());

    let engine = FormValidationEngine::new(
        specs,
        Collaborators {
            registry: registry.clone(),
            transport: transport.clone(),
            notifications: notifications.clone(),
        },
        &config,
    );

    let mut events = engine.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let FormEvent::StateChanged(state) = event {
                println!("state -> {}", serde_json::to_string(&state).unwrap_or_default());
            }
        }
    });

    // First attempt: incomplete
    registry.fill(&[("name", "J"), ("email", "not-an-email")]);
    if let SubmitOutcome::Rejected(result) = engine.submit().await {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    registry.fill(&[
        ("company", "株式会社サンプル"),
        ("name", "山田 太郎"),
        ("email", "taro@example.com"),
        ("message", "新規サイト制作についてご相談させてください。"),
    ]);
    let outcome = engine.submit().await;
    println!("outcome: {:?}", outcome);

    if let Some(notification) = notifications.current() {
        println!("[{:?}] {}", notification.kind, notification.message);
    }
    for payload in transport.received() {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }

    Ok(())
}
