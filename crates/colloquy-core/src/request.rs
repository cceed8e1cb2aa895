// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Caller-facing inputs for store write operations.

use serde::{Deserialize, Serialize};

use crate::error::HistoryError;
use crate::records::{MessageContent, Source};
use crate::types::{FeedbackDirection, MessageId, Role};

/// Input for appending one message turn to a thread.
///
/// `message_id` and `timestamp` are assigned by the writer, not the store:
/// a retry with the same id and content is idempotent and produces exactly
/// one stored record. Thread-level fields (`origin`, `is_temporary`,
/// `title`) seed the metadata row on first append and are ignored once set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub message_id: MessageId,
    /// Epoch milliseconds, writer-assigned, immutable once stored.
    pub timestamp: u64,
    pub role: Role,
    pub content: MessageContent,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub response_metadata: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub sources: Option<Vec<Source>>,
    /// Client or channel the thread originated from.
    pub origin: String,
    /// Whether the owning thread is temporary (short retention window).
    #[serde(default)]
    pub is_temporary: bool,
    #[serde(default)]
    pub title: Option<String>,
}

impl NewMessage {
    /// Creates a user-authored turn with the given body.
    pub fn user(message_id: MessageId, timestamp: u64, content: MessageContent) -> Self {
        Self {
            message_id,
            timestamp,
            role: Role::User,
            content,
            stop_reason: None,
            response_metadata: None,
            sources: None,
            origin: String::new(),
            is_temporary: false,
            title: None,
        }
    }

    /// Creates a model-generated turn with the given body.
    pub fn assistant(message_id: MessageId, timestamp: u64, content: MessageContent) -> Self {
        Self {
            role: Role::Assistant,
            ..Self::user(message_id, timestamp, content)
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn temporary(mut self) -> Self {
        self.is_temporary = true;
        self
    }

    pub fn with_stop_reason(mut self, stop_reason: impl Into<String>) -> Self {
        self.stop_reason = Some(stop_reason.into());
        self
    }

    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = Some(sources);
        self
    }

    pub fn with_response_metadata(
        mut self,
        metadata: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        self.response_metadata = Some(metadata);
        self
    }

    /// Checks role/field coherence: `stop_reason` and `response_metadata`
    /// belong to assistant turns only.
    pub fn validate(&self) -> Result<(), HistoryError> {
        if self.role == Role::User {
            if self.stop_reason.is_some() {
                return Err(HistoryError::InvalidState(
                    "stop_reason is only valid on assistant messages".into(),
                ));
            }
            if self.response_metadata.is_some() {
                return Err(HistoryError::InvalidState(
                    "response_metadata is only valid on assistant messages".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Partial feedback update for an assistant turn.
///
/// Only the supplied fields are written; an update carrying neither field
/// is rejected before reaching the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackUpdate {
    #[serde(default)]
    pub direction: Option<FeedbackDirection>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl FeedbackUpdate {
    pub fn direction(direction: FeedbackDirection) -> Self {
        Self {
            direction: Some(direction),
            comment: None,
        }
    }

    pub fn comment(comment: impl Into<String>) -> Self {
        Self {
            direction: None,
            comment: Some(comment.into()),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.direction.is_none() && self.comment.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_turn_rejects_assistant_only_fields() {
        let msg = NewMessage::user(
            MessageId("m-1".into()),
            100,
            MessageContent::Text("hi".into()),
        )
        .with_stop_reason("end_turn");
        assert!(matches!(msg.validate(), Err(HistoryError::InvalidState(_))));

        let mut msg = NewMessage::user(
            MessageId("m-2".into()),
            100,
            MessageContent::Text("hi".into()),
        );
        msg.response_metadata = Some(serde_json::Map::new());
        assert!(matches!(msg.validate(), Err(HistoryError::InvalidState(_))));
    }

    #[test]
    fn assistant_turn_accepts_all_fields() {
        let msg = NewMessage::assistant(
            MessageId("m-1".into()),
            100,
            MessageContent::Text("answer".into()),
        )
        .with_stop_reason("end_turn")
        .with_sources(vec![Source {
            id: Some("s-1".into()),
            title: None,
            url: Some("https://example.com".into()),
            snippet: None,
        }]);
        assert!(msg.validate().is_ok());
    }

    #[test]
    fn feedback_update_emptiness() {
        assert!(FeedbackUpdate::default().is_empty());
        assert!(!FeedbackUpdate::direction(FeedbackDirection::Up).is_empty());
        assert!(!FeedbackUpdate::comment("helpful").is_empty());
    }
}
