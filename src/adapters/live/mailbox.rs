//! Console mailbox: the message comes from command-line flags and
//! notifications go to stdout.

use crate::ports::{Mailbox, MessageContext};

/// Mailbox for the command-line front end.
pub struct ConsoleMailbox {
    message: Option<MessageContext>,
}

impl ConsoleMailbox {
    /// A mailbox with `message` open.
    #[must_use]
    pub fn with_message(message: MessageContext) -> Self {
        Self { message: Some(message) }
    }

    /// A mailbox with no message open.
    #[must_use]
    pub fn detached() -> Self {
        Self { message: None }
    }
}

impl Mailbox for ConsoleMailbox {
    fn current_message(&self) -> Result<MessageContext, String> {
        self.message.clone().ok_or_else(|| "No email item found".to_string())
    }

    fn notify(&self, message: &str) -> Result<(), String> {
        println!("{message}");
        Ok(())
    }
}
