//! Chat message values handed to the hub.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// An immutable chat message.
///
/// Constructed by the session layer before it reaches the hub. The hub only
/// ever reads [`ChatMessage::sender`]; everything else is carried opaquely to
/// observers and history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    msgid: String,
    sender: String,
    content: String,
    timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message stamped with a fresh msgid and the current time.
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_timestamp(sender, content, Utc::now())
    }

    /// Create a message with an explicit timestamp (replay, tests).
    pub fn with_timestamp(
        sender: impl Into<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            msgid: Uuid::new_v4().to_string(),
            sender: sender.into(),
            content: content.into(),
            timestamp,
        }
    }

    pub fn msgid(&self) -> &str {
        &self.msgid
    }

    /// Username of the session that sent the message.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// RFC 3339 timestamp with millisecond precision, e.g. `2024-01-01T12:00:00.000Z`.
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.timestamp.format("%H:%M:%S"),
            self.sender,
            self.content
        )
    }
}
