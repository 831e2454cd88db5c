//! Messages exchanged with application pages.

use serde::{Deserialize, Serialize};

/// Command posted from a page to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum WorkerMessage {
    /// Activate immediately (idempotent).
    #[serde(rename = "SKIP_WAITING")]
    SkipWaiting,
    /// Delete every bucket of this application, any version.
    #[serde(rename = "CLEAR_CACHE")]
    ClearCache,
    /// Anything else; ignored.
    #[serde(other)]
    Unknown,
}

impl WorkerMessage {
    /// Interpret arbitrary message data. Malformed input is [`WorkerMessage::Unknown`].
    pub fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or(Self::Unknown)
    }
}

/// Notification posted from the worker to every open page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// A new version took control.
    #[serde(rename = "SW_UPDATED")]
    Updated { version: String },
}
