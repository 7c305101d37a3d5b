//! Transport that waits and then resolves, standing in for a real endpoint

use crate::engine::SubmissionPayload;
use crate::host::Transport;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Simulated submission endpoint
///
/// Sleeps for `delay`, then succeeds, or fails with the configured reason.
/// Keeps the payloads it received.
#[derive(Debug)]
pub struct SimulatedTransport {
    delay: Duration,
    failure: Option<String>,
    calls: AtomicUsize,
    received: Mutex<Vec<SubmissionPayload>>,
}

impl SimulatedTransport {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failure: None,
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Fail every submission with `reason` after the delay
    pub fn failing(delay: Duration, reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::new(delay)
        }
    }

    /// Number of submit calls started
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn received(&self) -> Vec<SubmissionPayload> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Transport for SimulatedTransport {
    async fn submit_form(&self, payload: &SubmissionPayload) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        if let Some(ref reason) = self.failure {
            anyhow::bail!("{}", reason);
        }

        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(payload.clone());
        Ok(())
    }
}
