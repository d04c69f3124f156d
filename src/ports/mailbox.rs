//! Host mailbox port: the open message and the notification banner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The message currently open in the host mail client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContext {
    /// Message subject.
    pub subject: String,
    /// Sender address.
    pub sender: String,
    /// Host-specific unique item id.
    pub item_id: String,
    /// When the message was created.
    pub created_at: DateTime<Utc>,
}

/// Read access to the open message and write access to a transient banner.
pub trait Mailbox: Send + Sync {
    /// Returns the message currently open in the host.
    ///
    /// # Errors
    ///
    /// Returns an error if no message is open.
    fn current_message(&self) -> Result<MessageContext, String>;

    /// Posts a transient informational notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the notification.
    fn notify(&self, message: &str) -> Result<(), String>;
}
