//! Notification sink that keeps the shown message in memory

use crate::host::NotificationSink;
use crate::notification::Notification;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Notifications kept by [`NotificationCenter::history`]
pub const HISTORY_LIMIT: usize = 32;

/// Holds at most one visible notification
///
/// Showing a new one replaces the old one. A notification stops being
/// current once its dismiss time has passed.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    shown: Mutex<Option<Notification>>,
    history: Mutex<VecDeque<Notification>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The notification visible at `now`, if any
    pub fn current_at(&self, now: DateTime<Utc>) -> Option<Notification> {
        let shown = self.shown.lock().unwrap_or_else(PoisonError::into_inner);
        shown.as_ref().filter(|n| !n.is_expired_at(now)).cloned()
    }

    pub fn current(&self) -> Option<Notification> {
        self.current_at(Utc::now())
    }

    /// The last [`HISTORY_LIMIT`] notifications shown, oldest first
    ///
    /// For tests and the demo; a page only ever needs [`current`](Self::current).
    pub fn history(&self) -> Vec<Notification> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn dismiss(&self) {
        *self.shown.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl NotificationSink for NotificationCenter {
    fn show(&self, notification: &Notification) -> Result<()> {
        *self.shown.lock().unwrap_or_else(PoisonError::into_inner) = Some(notification.clone());
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        if history.len() == HISTORY_LIMIT {
            history.pop_front();
        }
        history.push_back(notification.clone());
        Ok(())
    }
}
