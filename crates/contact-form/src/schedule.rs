//! Timing wrappers: debounce for input validation, throttle for scroll handlers

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Coalesces rapid triggers into one delayed call
///
/// Each [`trigger`](Debouncer::trigger) restarts the quiescence window. When
/// the window passes without another trigger, the action runs once with the
/// argument of the last trigger. Earlier scheduled calls are discarded when
/// they wake up, so an action never runs twice for one window.
///
/// Triggering spawns onto the current tokio runtime.
pub struct Debouncer<T> {
    delay: Duration,
    generation: Arc<AtomicU64>,
    action: Arc<dyn Fn(T) + Send + Sync>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(delay: Duration, action: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            action: Arc::new(action),
        }
    }

    /// Schedule the action, superseding any pending call
    pub fn trigger(&self, arg: T) {
        let scheduled = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let action = Arc::clone(&self.action);
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::SeqCst) == scheduled {
                action(arg);
            } else {
                tracing::trace!("debounced call superseded");
            }
        });
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Leading-edge rate limiter
///
/// The first call goes through immediately; calls within `limit` of the last
/// accepted one are dropped.
#[derive(Debug)]
pub struct Throttle {
    limit: Duration,
    last_fired: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            last_fired: Mutex::new(None),
        }
    }

    /// Returns true if a call is allowed now, and starts a new limit window
    pub fn try_fire(&self) -> bool {
        let now = Instant::now();
        let mut last = self.last_fired.lock().unwrap_or_else(PoisonError::into_inner);

        let open = match *last {
            Some(at) => now.duration_since(at) >= self.limit,
            None => true,
        };
        if open {
            *last = Some(now);
        }
        open
    }

    /// Run `f` unless throttled
    pub fn call<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        if self.try_fire() {
            Some(f())
        } else {
            None
        }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }
}
