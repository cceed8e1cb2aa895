// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixture builders for scopes and messages.

use colloquy_core::{
    MessageContent, MessageId, NewMessage, OrgId, TenantId, ThreadId, ThreadScope, UserId,
};
use uuid::Uuid;

/// A thread scope under a non-multi-tenant org.
pub fn thread_scope(org: &str, user: &str, thread: &str) -> ThreadScope {
    ThreadScope {
        org_id: OrgId(org.to_string()),
        tenant_id: None,
        user_id: UserId(user.to_string()),
        thread_id: ThreadId(thread.to_string()),
    }
}

/// A thread scope under a multi-tenant org.
pub fn tenant_thread_scope(org: &str, tenant: &str, user: &str, thread: &str) -> ThreadScope {
    ThreadScope {
        tenant_id: Some(TenantId(tenant.to_string())),
        ..thread_scope(org, user, thread)
    }
}

/// A fresh random message id.
pub fn random_message_id() -> MessageId {
    MessageId(Uuid::new_v4().to_string())
}

/// A user turn with plain-text content and a test origin.
pub fn user_message(id: &str, timestamp: u64, text: &str) -> NewMessage {
    NewMessage::user(
        MessageId(id.to_string()),
        timestamp,
        MessageContent::Text(text.to_string()),
    )
    .with_origin("test")
}

/// An assistant turn with plain-text content and a test origin.
pub fn assistant_message(id: &str, timestamp: u64, text: &str) -> NewMessage {
    NewMessage::assistant(
        MessageId(id.to_string()),
        timestamp,
        MessageContent::Text(text.to_string()),
    )
    .with_origin("test")
}
