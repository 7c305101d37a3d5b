//! Collaborators the engine drives, and in-process implementations of them

use crate::engine::SubmissionPayload;
use crate::notification::Notification;
use anyhow::Result;
use async_trait::async_trait;

pub mod memory;
pub mod notifications;
pub mod simulated;

pub use memory::{FieldSlot, MemoryRegistry};
pub use notifications::NotificationCenter;
pub use simulated::SimulatedTransport;

/// Page fields as the engine sees them
///
/// Implementations own the actual inputs and their error labels.
pub trait FieldRegistry: Send + Sync {
    /// Current raw value, `None` if the page has no such field
    fn value(&self, name: &str) -> Option<String>;

    fn set_value(&self, name: &str, value: &str);

    /// Valid/invalid styling of the input
    fn set_visual_validity(&self, name: &str, valid: bool);

    /// Back to neutral styling, neither valid nor invalid
    fn clear_visual_validity(&self, name: &str);

    /// Inline error label; empty string hides it
    fn set_error_text(&self, name: &str, text: &str);
}

/// Performs the actual submission
#[async_trait]
pub trait Transport: Send + Sync {
    async fn submit_form(&self, payload: &SubmissionPayload) -> Result<()>;
}

/// Displays transient messages
///
/// A new notification replaces the one currently shown.
pub trait NotificationSink: Send + Sync {
    fn show(&self, notification: &Notification) -> Result<()>;
}
