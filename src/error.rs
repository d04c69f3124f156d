//! Error taxonomy shared by the cache, settings, catalog client and workflow.

use thiserror::Error;

use crate::record::RecordId;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong between a task draft and a Notion record.
#[derive(Debug, Error)]
pub enum Error {
    /// A required setting (token, database id) is missing.
    #[error("missing required setting: {setting}")]
    Configuration {
        /// Name of the missing setting.
        setting: &'static str,
    },

    /// The Notion API answered with a non-success status, or could not be reached.
    #[error("{message}")]
    Remote {
        /// HTTP status when a response was received.
        status: Option<u16>,
        /// Server-provided message, untouched, or a status-based fallback.
        message: String,
    },

    /// A blob or response body could not be decoded.
    #[error("failed to decode {what}: {message}")]
    Decode {
        /// What was being decoded.
        what: &'static str,
        /// Underlying parser message.
        message: String,
    },

    /// A task draft is missing a required selection.
    #[error("a {field} must be selected")]
    Validation {
        /// The empty field.
        field: &'static str,
    },

    /// The primary record exists but the dependent record could not be created.
    #[error("planning record {primary_id} was created but the task record failed: {source}")]
    PartialCompletion {
        /// Identifier of the primary record left behind.
        primary_id: RecordId,
        /// Why the dependent create failed.
        #[source]
        source: Box<Error>,
    },

    /// Persisting settings failed.
    #[error("failed to save settings: {message}")]
    Storage {
        /// Underlying storage message.
        message: String,
    },
}

impl Error {
    /// Builds a [`Error::Remote`] from a status code and an optional server message.
    #[must_use]
    pub fn remote(status: u16, message: Option<String>) -> Self {
        Self::Remote {
            status: Some(status),
            message: message.unwrap_or_else(|| format!("HTTP error: status {status}")),
        }
    }
}
