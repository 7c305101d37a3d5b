//! Transient form messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A message shown above the form until it is dismissed or replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub shown_at: DateTime<Utc>,
    pub dismiss_after: Duration,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind, dismiss_after: Duration) -> Self {
        Self {
            message: message.into(),
            kind,
            shown_at: Utc::now(),
            dismiss_after,
        }
    }

    pub fn success(message: impl Into<String>, dismiss_after: Duration) -> Self {
        Self::new(message, NotificationKind::Success, dismiss_after)
    }

    pub fn error(message: impl Into<String>, dismiss_after: Duration) -> Self {
        Self::new(message, NotificationKind::Error, dismiss_after)
    }

    /// When the host removes the message
    pub fn expires_at(&self) -> DateTime<Utc> {
        // Durations past chrono's range never expire
        match chrono::Duration::from_std(self.dismiss_after) {
            Ok(d) => self.shown_at.checked_add_signed(d).unwrap_or(DateTime::<Utc>::MAX_UTC),
            Err(_) => DateTime::<Utc>::MAX_UTC,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let n = Notification::success("ok", Duration::from_secs(5));
        assert_eq!(n.expires_at() - n.shown_at, chrono::Duration::seconds(5));
        assert!(!n.is_expired_at(n.shown_at));
        assert!(!n.is_expired_at(n.shown_at + chrono::Duration::milliseconds(4999)));
        assert!(n.is_expired_at(n.shown_at + chrono::Duration::seconds(5)));
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let n = Notification::error("bad", Duration::from_secs(1));
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["kind"], "error");
        assert_eq!(json["message"], "bad");
    }
}
