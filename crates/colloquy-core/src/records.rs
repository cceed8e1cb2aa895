// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted record shapes for messages and thread metadata.
//!
//! Serde renames pin the persisted attribute names (`verso`, `feedback`,
//! `ExpiryTime`); they are part of the stored schema and must not change.
//! `created_at`/`updated_at` serialize as ISO-8601 text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{FeedbackDirection, MessageId, OrgId, Role, TenantId, ThreadId, UserId};

/// Message body: either plain text or a structured sequence of elements.
///
/// The store persists whichever shape it receives and returns it unchanged.
/// It never inspects, escapes, or rewrites content; sanitization is the
/// rendering boundary's contract, not this layer's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Structured(Vec<serde_json::Value>),
}

/// A citation record attached to an assistant turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// One turn in a conversation thread.
///
/// Immutable after creation except for the two feedback fields; `updated_at`
/// advances on any mutation, including feedback updates. `timestamp` is
/// writer-assigned epoch milliseconds and participates in the physical
/// ordering key, so it can never change once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub thread_id: ThreadId,
    pub message_id: MessageId,
    pub timestamp: u64,
    pub role: Role,
    pub content: MessageContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_metadata: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
    #[serde(rename = "verso", default, skip_serializing_if = "Option::is_none")]
    pub feedback_direction: Option<FeedbackDirection>,
    #[serde(rename = "feedback", default, skip_serializing_if = "Option::is_none")]
    pub feedback_comment: Option<String>,
    #[serde(rename = "ExpiryTime", default, skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Summary record for one thread; exactly one exists per thread.
///
/// Created lazily on the first append to an unseen thread id, then updated
/// in place on every subsequent append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadRecord {
    pub thread_id: ThreadId,
    pub org_id: OrgId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,
    pub user_id: UserId,
    pub origin: String,
    pub is_temporary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Count of user-authored turns. Incremented with a backend-atomic add,
    /// so concurrent appends from independent writers never lose counts.
    #[serde(default)]
    pub user_message_count: u64,
    #[serde(rename = "ExpiryTime", default, skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_accepts_text_and_structured_shapes() {
        let text: MessageContent = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(text, MessageContent::Text("hello".into()));

        let structured: MessageContent =
            serde_json::from_str(r#"[{"type":"text","text":"hi"},{"type":"tool_use"}]"#).unwrap();
        match &structured {
            MessageContent::Structured(elements) => assert_eq!(elements.len(), 2),
            other => panic!("expected structured content, got {other:?}"),
        }

        // Round-trip must preserve the original shape byte-for-byte.
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"hello\"");
    }

    #[test]
    fn feedback_attributes_use_schema_names() {
        let record = MessageRecord {
            thread_id: ThreadId("t-1".into()),
            message_id: MessageId("m-1".into()),
            timestamp: 42,
            role: Role::Assistant,
            content: MessageContent::Text("answer".into()),
            stop_reason: Some("end_turn".into()),
            response_metadata: None,
            sources: None,
            feedback_direction: Some(FeedbackDirection::Down),
            feedback_comment: Some("wrong".into()),
            expiry_time: Some(1_700_000_000),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["verso"], "down");
        assert_eq!(value["feedback"], "wrong");
        assert_eq!(value["ExpiryTime"], 1_700_000_000);
        assert!(value.get("feedback_direction").is_none());
    }

    #[test]
    fn thread_record_defaults_missing_counter_to_zero() {
        // A thread whose first turn was assistant-authored has no counter
        // attribute yet; deserialization must treat it as zero.
        let value = serde_json::json!({
            "thread_id": "t-1",
            "org_id": "acme",
            "user_id": "u-1",
            "origin": "web",
            "is_temporary": false,
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z",
        });
        let record: ThreadRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.user_message_count, 0);
        assert!(record.tenant_id.is_none());
        assert!(record.title.is_none());
    }
}
